use crate::db::connection::Database;
use crate::db::repository::{DiseaseReportRepository, SoilReportRepository, UserRepository};
use crate::db::traits::{DatabaseBackend, DiseaseReportStore, SoilReportStore, UserStore};
use crate::error::Result;
use crate::models::{DiseaseReport, DiseaseReportFilter, SoilReport, User};
use async_trait::async_trait;
use chrono::{DateTime, Utc};

pub struct LibSqlBackend {
    db: Database,
}

impl LibSqlBackend {
    pub fn new(db: Database) -> Self {
        Self { db }
    }
}

#[async_trait]
impl UserStore for LibSqlBackend {
    async fn create_user(&self, user: &User) -> Result<()> {
        let conn = self.db.connect()?;
        UserRepository::create(&conn, user).await
    }
    async fn get_user_by_id(&self, id: &str) -> Result<Option<User>> {
        let conn = self.db.connect()?;
        UserRepository::get_by_id(&conn, id).await
    }
    async fn get_user_by_email(&self, email: &str) -> Result<Option<User>> {
        let conn = self.db.connect()?;
        UserRepository::get_by_email(&conn, email).await
    }
    async fn update_last_login(&self, id: &str, at: DateTime<Utc>) -> Result<()> {
        let conn = self.db.connect()?;
        UserRepository::update_last_login(&conn, id, at).await
    }
}

#[async_trait]
impl DiseaseReportStore for LibSqlBackend {
    async fn create_disease_report(&self, report: &DiseaseReport) -> Result<()> {
        let conn = self.db.connect()?;
        DiseaseReportRepository::create(&conn, report).await
    }
    async fn list_disease_reports(
        &self,
        user_id: &str,
        filter: &DiseaseReportFilter,
    ) -> Result<Vec<DiseaseReport>> {
        let conn = self.db.connect()?;
        DiseaseReportRepository::list(&conn, user_id, filter).await
    }
    async fn delete_disease_report(&self, user_id: &str, id: &str) -> Result<bool> {
        let conn = self.db.connect()?;
        DiseaseReportRepository::delete(&conn, user_id, id).await
    }
}

#[async_trait]
impl SoilReportStore for LibSqlBackend {
    async fn create_soil_report(&self, report: &SoilReport) -> Result<()> {
        let conn = self.db.connect()?;
        SoilReportRepository::create(&conn, report).await
    }
    async fn list_soil_reports(&self, user_id: &str) -> Result<Vec<SoilReport>> {
        let conn = self.db.connect()?;
        SoilReportRepository::list(&conn, user_id).await
    }
}

#[async_trait]
impl DatabaseBackend for LibSqlBackend {
    async fn sync(&self) -> Result<()> {
        self.db.sync().await
    }
}
