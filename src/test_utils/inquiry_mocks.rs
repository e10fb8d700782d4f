use std::sync::Mutex;

use async_trait::async_trait;

use crate::app_error::AppResult;
use crate::application::query::SortDirection;
use crate::use_cases::inquiry::{Inquiry, InquiryListRequest, InquiryRepo};

/// In-memory inquiry read model.
#[derive(Default)]
pub struct InMemoryInquiryRepo {
    inquiries: Mutex<Vec<Inquiry>>,
}

impl InMemoryInquiryRepo {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_inquiries(inquiries: Vec<Inquiry>) -> Self {
        Self {
            inquiries: Mutex::new(inquiries),
        }
    }
}

fn contains_ci(haystack: &str, needle: &str) -> bool {
    haystack.to_lowercase().contains(&needle.to_lowercase())
}

#[async_trait]
impl InquiryRepo for InMemoryInquiryRepo {
    async fn list(&self, request: &InquiryListRequest) -> AppResult<(Vec<Inquiry>, i64)> {
        let inquiries = self.inquiries.lock().unwrap();
        let filter = &request.filter;

        let mut matches: Vec<Inquiry> = inquiries
            .iter()
            .filter(|i| filter.email.as_deref().is_none_or(|e| contains_ci(&i.email, e)))
            .filter(|i| {
                filter.company.as_deref().is_none_or(|c| {
                    i.company_name
                        .as_deref()
                        .is_some_and(|name| contains_ci(name, c))
                })
            })
            .filter(|i| {
                filter.q.as_deref().is_none_or(|q| {
                    contains_ci(&i.first_name, q)
                        || contains_ci(&i.last_name, q)
                        || contains_ci(&i.email, q)
                        || i.company_name
                            .as_deref()
                            .is_some_and(|name| contains_ci(name, q))
                        || contains_ci(&i.question, q)
                })
            })
            .cloned()
            .collect();

        matches.sort_by(|a, b| {
            let ordering = match request.sort.key {
                "id" => a.id.cmp(&b.id),
                "display_name" => (&a.first_name, &a.last_name).cmp(&(&b.first_name, &b.last_name)),
                "email" => a.email.cmp(&b.email),
                "company_name" => a.company_name.cmp(&b.company_name),
                _ => a.submitted_at.cmp(&b.submitted_at),
            };
            match request.sort.direction {
                SortDirection::Asc => ordering,
                SortDirection::Desc => ordering.reverse(),
            }
        });

        let total = matches.len() as i64;
        let page: Vec<Inquiry> = matches
            .into_iter()
            .skip(request.pagination.offset() as usize)
            .take(request.pagination.limit() as usize)
            .collect();

        Ok((page, total))
    }
}
