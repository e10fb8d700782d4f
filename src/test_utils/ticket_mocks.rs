use std::sync::Mutex;

use async_trait::async_trait;

use crate::app_error::AppResult;
use crate::application::query::SortDirection;
use crate::use_cases::ticket::{
    Ticket, TicketListRequest, TicketRepo, TicketReply, TicketWithReplies,
};

/// In-memory ticket read model.
#[derive(Default)]
pub struct InMemoryTicketRepo {
    tickets: Mutex<Vec<Ticket>>,
    replies: Mutex<Vec<TicketReply>>,
}

impl InMemoryTicketRepo {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_tickets(tickets: Vec<Ticket>) -> Self {
        Self {
            tickets: Mutex::new(tickets),
            replies: Mutex::new(Vec::new()),
        }
    }
}

#[async_trait]
impl TicketRepo for InMemoryTicketRepo {
    async fn list(&self, request: &TicketListRequest) -> AppResult<(Vec<Ticket>, i64)> {
        let tickets = self.tickets.lock().unwrap();
        let filter = &request.filter;

        let mut matches: Vec<Ticket> = tickets
            .iter()
            .filter(|t| filter.status.is_none_or(|s| t.status == s))
            .filter(|t| filter.priority.is_none_or(|p| t.priority == p))
            .filter(|t| filter.is_deleted.is_none_or(|d| t.is_deleted == d))
            .filter(|t| {
                filter
                    .q
                    .as_deref()
                    .is_none_or(|q| t.subject.to_lowercase().contains(&q.to_lowercase()))
            })
            .cloned()
            .collect();

        matches.sort_by(|a, b| {
            let ordering = match request.sort.key {
                "id" => a.id.cmp(&b.id),
                "updated_at" => a.updated_at.cmp(&b.updated_at),
                "status" => a.status.cmp(&b.status),
                "priority" => a.priority.cmp(&b.priority),
                "subject" => a.subject.cmp(&b.subject),
                _ => a.created_at.cmp(&b.created_at),
            };
            match request.sort.direction {
                SortDirection::Asc => ordering,
                SortDirection::Desc => ordering.reverse(),
            }
        });

        let total = matches.len() as i64;
        let page: Vec<Ticket> = matches
            .into_iter()
            .skip(request.pagination.offset() as usize)
            .take(request.pagination.limit() as usize)
            .collect();

        Ok((page, total))
    }

    async fn get_with_replies(&self, ticket_id: i64) -> AppResult<Option<TicketWithReplies>> {
        let ticket = self
            .tickets
            .lock()
            .unwrap()
            .iter()
            .find(|t| t.id == ticket_id && !t.is_deleted)
            .cloned();

        let Some(ticket) = ticket else {
            return Ok(None);
        };

        let mut replies: Vec<TicketReply> = self
            .replies
            .lock()
            .unwrap()
            .iter()
            .filter(|r| r.ticket_id == ticket_id)
            .cloned()
            .collect();
        replies.sort_by(|a, b| a.created_at.cmp(&b.created_at));

        Ok(Some(TicketWithReplies { ticket, replies }))
    }
}
