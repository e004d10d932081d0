//! Worker and organization lookup-or-create keyed by phone number, plus the
//! account edits each side can make to its own record.

pub mod handlers;

use chrono::Utc;
use serde::Deserialize;
use tracing::info;
use uuid::Uuid;

use crate::db::{is_unique_violation, OrganizationExt, Store, WorkerExt};
use crate::errors::AppError;
use crate::models::language::Language;
use crate::models::organization::OrganizationProfile;
use crate::models::worker::WorkerProfile;
use crate::validation::{normalize_indian_phone, sanitize_input};

/// Loads the worker a session points at. A missing row invalidates the session.
pub async fn current_worker(store: &dyn Store, worker_id: Uuid) -> Result<WorkerProfile, AppError> {
    store.get_worker(worker_id).await?.ok_or(AppError::SessionExpired)
}

/// Loads the organization a session points at. A missing row invalidates the session.
pub async fn current_organization(store: &dyn Store, org_id: Uuid) -> Result<OrganizationProfile, AppError> {
    store.get_organization(org_id).await?.ok_or(AppError::SessionExpired)
}

fn canonical_phone(raw: &str) -> Result<String, AppError> {
    normalize_indian_phone(&sanitize_input(raw))
        .ok_or_else(|| AppError::Validation("Invalid phone number".to_string()))
}

fn parse_language(raw: Option<&str>) -> Result<Language, AppError> {
    match raw.map(sanitize_input).filter(|code| !code.is_empty()) {
        None => Ok(Language::default()),
        Some(code) => Language::from_code(&code)
            .ok_or_else(|| AppError::Validation(format!("Unsupported language: {code}"))),
    }
}

/// Finds the worker for `phone` or creates one. An existing worker only has
/// its language preference changed.
pub async fn start_worker_session(
    store: &dyn Store,
    phone: &str,
    language: Option<&str>,
) -> Result<WorkerProfile, AppError> {
    let phone = canonical_phone(phone)?;
    let language = parse_language(language)?;

    if let Some(mut existing) = store.get_worker_by_phone(&phone).await? {
        store.update_worker_language(existing.id, language).await?;
        existing.language = language;
        return Ok(existing);
    }

    let worker = WorkerProfile::new(phone, language);
    match store.insert_worker(&worker).await {
        Ok(()) => {
            info!(worker_id = %worker.id, "Created worker profile");
            Ok(worker)
        }
        // Lost a race with a concurrent first login for the same number.
        Err(e) if is_unique_violation(&e) => {
            let mut existing = store
                .get_worker_by_phone(&worker.phone)
                .await?
                .ok_or(AppError::Database(e))?;
            store.update_worker_language(existing.id, language).await?;
            existing.language = language;
            Ok(existing)
        }
        Err(e) => Err(e.into()),
    }
}

/// Finds the organization for `phone` or creates one. The stored name of an
/// existing organization is never replaced here.
pub async fn start_employer_session(
    store: &dyn Store,
    phone: &str,
    name: Option<&str>,
) -> Result<OrganizationProfile, AppError> {
    let phone = canonical_phone(phone)?;

    if let Some(existing) = store.get_organization_by_phone(&phone).await? {
        return Ok(existing);
    }

    let name = name.map(sanitize_input).unwrap_or_default();
    if name.is_empty() {
        return Err(AppError::MissingFields(vec!["name".to_string()]));
    }

    let org = OrganizationProfile::new(phone, name);
    match store.insert_organization(&org).await {
        Ok(()) => {
            info!(org_id = %org.id, "Created organization profile");
            Ok(org)
        }
        Err(e) if is_unique_violation(&e) => store
            .get_organization_by_phone(&org.phone)
            .await?
            .ok_or(AppError::Database(e)),
        Err(e) => Err(e.into()),
    }
}

/// Sanitized value if the field was sent and is not blank.
fn provided(value: Option<&str>) -> Option<String> {
    value.map(sanitize_input).filter(|v| !v.is_empty())
}

#[derive(Debug, Default, Deserialize)]
pub struct WorkerAccountUpdate {
    pub name: Option<String>,
    pub location: Option<String>,
    pub trade: Option<String>,
}

impl WorkerAccountUpdate {
    pub fn apply_to(&self, worker: &mut WorkerProfile) {
        if let Some(name) = provided(self.name.as_deref()) {
            worker.name = Some(name);
        }
        if let Some(location) = provided(self.location.as_deref()) {
            worker.location = Some(location);
        }
        if let Some(trade) = provided(self.trade.as_deref()) {
            worker.trade = Some(trade);
        }
        worker.updated_at = Utc::now();
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct OrganizationAccountUpdate {
    pub name: Option<String>,
    pub email: Option<String>,
    pub location: Option<String>,
    pub industry: Option<String>,
    pub description: Option<String>,
}

impl OrganizationAccountUpdate {
    pub fn apply_to(&self, org: &mut OrganizationProfile) {
        if let Some(name) = provided(self.name.as_deref()) {
            org.name = name;
        }
        if let Some(email) = provided(self.email.as_deref()) {
            org.email = Some(email);
        }
        if let Some(location) = provided(self.location.as_deref()) {
            org.location = Some(location);
        }
        if let Some(industry) = provided(self.industry.as_deref()) {
            org.industry = Some(industry);
        }
        if let Some(description) = provided(self.description.as_deref()) {
            org.description = Some(description);
        }
        org.updated_at = Utc::now();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::memory::MemoryStore;

    #[tokio::test]
    async fn test_new_worker_is_created_with_language() {
        let store = MemoryStore::new();
        let worker = start_worker_session(&store, "9123456780", Some("en")).await.unwrap();

        assert_eq!(worker.phone, "9123456780");
        assert_eq!(worker.language, Language::English);
        assert!(!worker.resume_complete());
        assert!(store.get_worker_by_phone("9123456780").await.unwrap().is_some());
    }

    #[tokio::test]
    async fn test_returning_worker_only_changes_language() {
        let store = MemoryStore::new();
        let first = start_worker_session(&store, "9876543210", Some("en")).await.unwrap();

        let mut stored = store.get_worker(first.id).await.unwrap().unwrap();
        stored.name = Some("Ravi".to_string());
        stored.trade = Some("Electrician".to_string());
        stored.skills = vec!["wiring".to_string()];
        store.save_worker(&stored).await.unwrap();

        let again = start_worker_session(&store, "98765-43210", Some("hi")).await.unwrap();

        assert_eq!(again.id, first.id);
        let reloaded = store.get_worker(first.id).await.unwrap().unwrap();
        assert_eq!(reloaded.language, Language::Hindi);
        assert_eq!(reloaded.name.as_deref(), Some("Ravi"));
        assert_eq!(reloaded.trade.as_deref(), Some("Electrician"));
        assert_eq!(reloaded.skills, vec!["wiring"]);
    }

    #[tokio::test]
    async fn test_invalid_phone_creates_nothing() {
        let store = MemoryStore::new();
        let result = start_worker_session(&store, "1234567890", None).await;
        assert!(matches!(result, Err(AppError::Validation(_))));
        assert!(store.get_worker_by_phone("1234567890").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_unknown_language_is_rejected_and_absent_defaults() {
        let store = MemoryStore::new();
        let rejected = start_worker_session(&store, "9123456780", Some("fr")).await;
        assert!(matches!(rejected, Err(AppError::Validation(_))));

        let worker = start_worker_session(&store, "9123456780", None).await.unwrap();
        assert_eq!(worker.language, Language::English);
    }

    #[tokio::test]
    async fn test_organization_name_first_write_wins() {
        let store = MemoryStore::new();
        let first = start_employer_session(&store, "9000000001", Some("Sharma Builders"))
            .await
            .unwrap();
        let again = start_employer_session(&store, "9000000001", Some("Other Name"))
            .await
            .unwrap();

        assert_eq!(again.id, first.id);
        let stored = store.get_organization(first.id).await.unwrap().unwrap();
        assert_eq!(stored.name, "Sharma Builders");
    }

    #[tokio::test]
    async fn test_new_organization_requires_name() {
        let store = MemoryStore::new();
        let result = start_employer_session(&store, "9000000001", Some("  ")).await;
        match result {
            Err(AppError::MissingFields(fields)) => assert_eq!(fields, vec!["name"]),
            other => panic!("expected missing name, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_missing_session_entity_expires_session() {
        let store = MemoryStore::new();
        let result = current_worker(&store, Uuid::new_v4()).await;
        assert!(matches!(result, Err(AppError::SessionExpired)));
    }

    #[test]
    fn test_account_update_skips_blank_fields() {
        let mut worker = WorkerProfile::new("9123456780", Language::English);
        worker.trade = Some("Plumber".to_string());

        WorkerAccountUpdate {
            name: Some("<b>Anil</b>".to_string()),
            location: Some("   ".to_string()),
            trade: None,
        }
        .apply_to(&mut worker);

        assert_eq!(worker.name.as_deref(), Some("Anil"));
        assert_eq!(worker.location, None);
        assert_eq!(worker.trade.as_deref(), Some("Plumber"));
    }

    #[test]
    fn test_org_update_can_rename() {
        let mut org = OrganizationProfile::new("9000000001", "Old");
        OrganizationAccountUpdate {
            name: Some("New".to_string()),
            email: Some(String::new()),
            ..Default::default()
        }
        .apply_to(&mut org);
        assert_eq!(org.name, "New");
        assert_eq!(org.email, None);
    }
}
