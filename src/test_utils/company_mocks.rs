use std::collections::{HashMap, HashSet};
use std::sync::Mutex;
use std::sync::atomic::{AtomicBool, AtomicI64, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Days, Utc};
use uuid::Uuid;

use crate::app_error::{AppError, AppResult};
use crate::application::query::SortDirection;
use crate::domain::entities::schema_name::SchemaName;
use crate::use_cases::company::{
    Company, CompanyListRequest, CompanyRepo, CompanyUpdate, NewCompany,
};
use crate::use_cases::company_user::{
    CompanyUserRepo, CompanyUserView, CreatedCompanyUser, NewCompanyUser,
};

/// In-memory tenant registry honoring the two-step provisioning contract:
/// `provision` creates the row and schema, `populate` seeds it, and the two
/// are independently fallible.
#[derive(Default)]
pub struct InMemoryCompanyRepo {
    companies: Mutex<HashMap<Uuid, Company>>,
    populated: Mutex<HashSet<String>>,
    fail_populate: AtomicBool,
}

impl InMemoryCompanyRepo {
    pub fn new() -> Self {
        Self::default()
    }

    /// Makes every subsequent `populate` call fail.
    pub fn fail_populate(&self) {
        self.fail_populate.store(true, Ordering::SeqCst);
    }

    pub fn all(&self) -> Vec<Company> {
        self.companies.lock().unwrap().values().cloned().collect()
    }

    pub fn is_populated(&self, schema: &str) -> bool {
        self.populated.lock().unwrap().contains(schema)
    }

    /// Provisions and populates a tenant in one call, for test setup.
    pub async fn seed(&self, input: NewCompany) -> Company {
        let schema = SchemaName::new(&input.database).unwrap();
        let expires_at = input
            .expires_at
            .unwrap_or_else(|| Utc::now() + Days::new(365));
        let company = CompanyRepo::provision(self, &input, &schema, expires_at)
            .await
            .unwrap();
        CompanyRepo::populate(self, &schema).await.unwrap();
        company
    }
}

#[async_trait]
impl CompanyRepo for InMemoryCompanyRepo {
    async fn list(&self, request: &CompanyListRequest) -> AppResult<(Vec<Company>, i64)> {
        let companies = self.companies.lock().unwrap();

        let mut matches: Vec<Company> = companies
            .values()
            .filter(|company| match &request.search {
                Some(term) => {
                    let term = term.to_lowercase();
                    company.company_name.to_lowercase().contains(&term)
                        || company
                            .company_code
                            .as_deref()
                            .is_some_and(|code| code.to_lowercase().contains(&term))
                }
                None => true,
            })
            .cloned()
            .collect();

        matches.sort_by(|a, b| {
            let ordering = match request.sort.key {
                "company_name" => a.company_name.cmp(&b.company_name),
                "company_code" => a.company_code.cmp(&b.company_code),
                "subscription_expires_at" => {
                    a.subscription_expires_at.cmp(&b.subscription_expires_at)
                }
                _ => a.created_at.cmp(&b.created_at),
            };
            match request.sort.direction {
                SortDirection::Asc => ordering,
                SortDirection::Desc => ordering.reverse(),
            }
        });

        let total = matches.len() as i64;
        let page: Vec<Company> = matches
            .into_iter()
            .skip(request.pagination.offset() as usize)
            .take(request.pagination.limit() as usize)
            .collect();

        Ok((page, total))
    }

    async fn get(&self, company_id: Uuid) -> AppResult<Option<Company>> {
        Ok(self.companies.lock().unwrap().get(&company_id).cloned())
    }

    async fn provision(
        &self,
        input: &NewCompany,
        schema: &SchemaName,
        expires_at: DateTime<Utc>,
    ) -> AppResult<Company> {
        let mut companies = self.companies.lock().unwrap();

        if companies
            .values()
            .any(|c| c.database_name == schema.as_str())
        {
            return Err(AppError::Conflict(
                "a tenant schema with this name already exists".into(),
            ));
        }

        let company = Company {
            company_id: Uuid::new_v4(),
            company_name: input.name.clone(),
            company_code: Some(input.code.clone()),
            database_name: schema.as_str().to_string(),
            subscription_expires_at: expires_at,
            is_active: true,
            created_at: Utc::now(),
        };
        companies.insert(company.company_id, company.clone());
        Ok(company)
    }

    async fn populate(&self, schema: &SchemaName) -> AppResult<()> {
        if self.fail_populate.load(Ordering::SeqCst) {
            return Err(AppError::Database("seed insert failed".into()));
        }
        self.populated
            .lock()
            .unwrap()
            .insert(schema.as_str().to_string());
        Ok(())
    }

    async fn update(&self, company_id: Uuid, update: &CompanyUpdate) -> AppResult<()> {
        let mut companies = self.companies.lock().unwrap();
        let Some(company) = companies.get_mut(&company_id) else {
            return Err(AppError::NotFound);
        };

        if let Some(name) = &update.name {
            company.company_name = name.clone();
        }
        if let Some(code) = &update.code {
            company.company_code = Some(code.clone());
        }
        if let Some(database) = &update.database {
            company.database_name = database.clone();
        }
        if let Some(expires_at) = update.expires_at {
            company.subscription_expires_at = expires_at;
        }
        if let Some(is_active) = update.is_active {
            company.is_active = is_active;
        }
        Ok(())
    }

    async fn delete(&self, company_id: Uuid) -> AppResult<String> {
        let mut companies = self.companies.lock().unwrap();
        let Some(company) = companies.remove(&company_id) else {
            return Err(AppError::NotFound);
        };
        self.populated.lock().unwrap().remove(&company.database_name);
        Ok(company.database_name)
    }
}

/// In-memory tenant-user store. Creation is all-or-nothing, mirroring the
/// transactional contract of the Postgres implementation.
pub struct InMemoryCompanyUserRepo {
    companies: Arc<InMemoryCompanyRepo>,
    users: Mutex<Vec<CompanyUserView>>,
    next_user_id: AtomicI64,
    fail_role_assignment: AtomicBool,
}

impl InMemoryCompanyUserRepo {
    pub fn new(companies: Arc<InMemoryCompanyRepo>) -> Self {
        Self {
            companies,
            users: Mutex::new(Vec::new()),
            next_user_id: AtomicI64::new(1),
            fail_role_assignment: AtomicBool::new(false),
        }
    }

    /// Makes the final step of user creation fail.
    pub fn fail_role_assignment(&self) {
        self.fail_role_assignment.store(true, Ordering::SeqCst);
    }

    pub fn global_user_count(&self) -> usize {
        self.users.lock().unwrap().len()
    }
}

#[async_trait]
impl CompanyUserRepo for InMemoryCompanyUserRepo {
    async fn list_for_company(&self, company_id: Uuid) -> AppResult<Vec<CompanyUserView>> {
        if self.companies.get(company_id).await?.is_none() {
            return Err(AppError::NotFound);
        }
        Ok(self
            .users
            .lock()
            .unwrap()
            .iter()
            .filter(|user| user.company_id == company_id)
            .cloned()
            .collect())
    }

    async fn create(
        &self,
        company_id: Uuid,
        user: &NewCompanyUser,
    ) -> AppResult<CreatedCompanyUser> {
        // uniqueness is checked before the company lookup, matching the
        // statement order of the real transaction
        {
            let users = self.users.lock().unwrap();
            if users
                .iter()
                .any(|existing| existing.username == user.username || existing.email == user.email)
            {
                return Err(AppError::Conflict(
                    "a record with this value already exists".into(),
                ));
            }
        }

        let Some(company) = self.companies.get(company_id).await? else {
            return Err(AppError::NotFound);
        };

        // the failure injection point mirrors the last insert of the real
        // transaction; nothing is stored when it trips
        if self.fail_role_assignment.load(Ordering::SeqCst) {
            return Err(AppError::Database("database operation failed".into()));
        }

        let created = CreatedCompanyUser {
            user_uuid: Uuid::new_v4(),
            user_id: self.next_user_id.fetch_add(1, Ordering::SeqCst),
        };

        self.users.lock().unwrap().push(CompanyUserView {
            user_uuid: created.user_uuid,
            user_id: created.user_id,
            user_external_id: None,
            fullname: user.display_name.clone(),
            username: user.username.clone(),
            email: user.email.clone(),
            avatar: None,
            company_id,
            company_name: company.company_name,
            database_name: company.database_name,
            is_active: true,
            is_email_verified: false,
            created_at: Utc::now(),
        });

        Ok(created)
    }
}
