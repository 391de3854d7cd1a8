use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::error::Result;
use crate::models::{DiseaseReport, DiseaseReportFilter, SoilReport, User};

// ---------------------------------------------------------------------------
// Individual store traits
// ---------------------------------------------------------------------------

/// CRUD operations for farmer accounts.
#[async_trait]
pub trait UserStore: Send + Sync {
    async fn create_user(&self, user: &User) -> Result<()>;
    async fn get_user_by_id(&self, id: &str) -> Result<Option<User>>;
    async fn get_user_by_email(&self, email: &str) -> Result<Option<User>>;
    async fn update_last_login(&self, id: &str, at: DateTime<Utc>) -> Result<()>;
}

/// CRUD and query operations for disease reports.
#[async_trait]
pub trait DiseaseReportStore: Send + Sync {
    async fn create_disease_report(&self, report: &DiseaseReport) -> Result<()>;

    /// List a user's reports matching the filter, newest diagnosis first.
    async fn list_disease_reports(
        &self,
        user_id: &str,
        filter: &DiseaseReportFilter,
    ) -> Result<Vec<DiseaseReport>>;

    /// Delete one of the user's reports. Returns false when the report
    /// does not exist or belongs to someone else.
    async fn delete_disease_report(&self, user_id: &str, id: &str) -> Result<bool>;
}

/// CRUD operations for soil test measurements.
#[async_trait]
pub trait SoilReportStore: Send + Sync {
    async fn create_soil_report(&self, report: &SoilReport) -> Result<()>;
    async fn list_soil_reports(&self, user_id: &str) -> Result<Vec<SoilReport>>;
}

// ---------------------------------------------------------------------------
// Unified backend supertrait
// ---------------------------------------------------------------------------

/// A complete database backend that combines all store traits plus lifecycle
/// operations (initialization, sync).
#[async_trait]
pub trait DatabaseBackend: UserStore + DiseaseReportStore + SoilReportStore {
    /// Sync with remote (e.g. Turso replication). No-op for local-only backends.
    async fn sync(&self) -> Result<()>;
}
