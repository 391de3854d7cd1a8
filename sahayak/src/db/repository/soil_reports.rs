use libsql::{params, Connection};

use crate::error::Result;
use crate::models::SoilReport;

use super::users::parse_timestamp;

pub struct SoilReportRepository;

impl SoilReportRepository {
    pub async fn create(conn: &Connection, report: &SoilReport) -> Result<()> {
        conn.execute(
            r#"
            INSERT INTO soil_reports (
                id, user_id, ph, nitrogen, phosphorus, potassium,
                organic_matter, texture, moisture, recorded_at
            ) VALUES (
                ?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10
            )
            "#,
            params![
                report.id.clone(),
                report.user_id.clone(),
                report.ph,
                report.nitrogen,
                report.phosphorus,
                report.potassium,
                report.organic_matter,
                report.texture.clone(),
                report.moisture,
                report.recorded_at.to_rfc3339(),
            ],
        )
        .await?;

        Ok(())
    }

    pub async fn list(conn: &Connection, user_id: &str) -> Result<Vec<SoilReport>> {
        let mut rows = conn
            .query(
                r#"
                SELECT id, user_id, ph, nitrogen, phosphorus, potassium,
                       organic_matter, texture, moisture, recorded_at
                FROM soil_reports
                WHERE user_id = ?1
                ORDER BY recorded_at DESC
                "#,
                params![user_id],
            )
            .await?;

        let mut results = Vec::new();
        while let Some(row) = rows.next().await? {
            results.push(Self::row_to_report(&row)?);
        }

        Ok(results)
    }

    fn row_to_report(row: &libsql::Row) -> Result<SoilReport> {
        Ok(SoilReport {
            id: row.get(0)?,
            user_id: row.get(1)?,
            ph: row.get(2)?,
            nitrogen: row.get(3)?,
            phosphorus: row.get(4)?,
            potassium: row.get(5)?,
            organic_matter: row.get(6)?,
            texture: row.get(7)?,
            moisture: row.get(8)?,
            recorded_at: parse_timestamp(&row.get::<String>(9)?),
        })
    }
}
