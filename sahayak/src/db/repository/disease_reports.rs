use libsql::{params, Connection, Value};

use crate::error::Result;
use crate::models::{DiseaseReport, DiseaseReportFilter};

use super::users::parse_timestamp;

pub struct DiseaseReportRepository;

impl DiseaseReportRepository {
    pub async fn create(conn: &Connection, report: &DiseaseReport) -> Result<()> {
        conn.execute(
            r#"
            INSERT INTO disease_reports (
                id, user_id, crop_name, disease_detected, region, severity, diagnosis_date
            ) VALUES (
                ?1, ?2, ?3, ?4, ?5, ?6, ?7
            )
            "#,
            params![
                report.id.clone(),
                report.user_id.clone(),
                report.crop_name.clone(),
                report.disease_detected.clone(),
                report.region.clone(),
                report.severity.clone(),
                report.diagnosis_date.to_rfc3339(),
            ],
        )
        .await?;

        Ok(())
    }

    /// Filtered listing scoped to one user, newest diagnosis first.
    /// Crop and region comparisons are case-insensitive; date bounds
    /// compare lexically, which is sound for RFC 3339 UTC timestamps.
    pub async fn list(
        conn: &Connection,
        user_id: &str,
        filter: &DiseaseReportFilter,
    ) -> Result<Vec<DiseaseReport>> {
        let mut sql = String::from(
            r#"
            SELECT id, user_id, crop_name, disease_detected, region, severity, diagnosis_date
            FROM disease_reports
            WHERE user_id = ?1
            "#,
        );
        let mut args: Vec<Value> = vec![Value::from(user_id.to_string())];

        if let Some(crop) = &filter.crop {
            args.push(Value::from(crop.clone()));
            sql.push_str(&format!(" AND LOWER(crop_name) = LOWER(?{})", args.len()));
        }
        if let Some(region) = &filter.region {
            args.push(Value::from(region.clone()));
            sql.push_str(&format!(" AND LOWER(region) = LOWER(?{})", args.len()));
        }
        if let Some(start) = &filter.start_date {
            args.push(Value::from(start.to_rfc3339()));
            sql.push_str(&format!(" AND diagnosis_date >= ?{}", args.len()));
        }
        if let Some(end) = &filter.end_date {
            args.push(Value::from(end.to_rfc3339()));
            sql.push_str(&format!(" AND diagnosis_date <= ?{}", args.len()));
        }

        sql.push_str(" ORDER BY diagnosis_date DESC");

        let mut rows = conn.query(&sql, args).await?;
        let mut results = Vec::new();
        while let Some(row) = rows.next().await? {
            results.push(Self::row_to_report(&row)?);
        }

        Ok(results)
    }

    pub async fn delete(conn: &Connection, user_id: &str, id: &str) -> Result<bool> {
        let affected = conn
            .execute(
                "DELETE FROM disease_reports WHERE id = ?1 AND user_id = ?2",
                params![id, user_id],
            )
            .await?;

        Ok(affected > 0)
    }

    fn row_to_report(row: &libsql::Row) -> Result<DiseaseReport> {
        Ok(DiseaseReport {
            id: row.get(0)?,
            user_id: row.get(1)?,
            crop_name: row.get(2)?,
            disease_detected: row.get(3)?,
            region: row.get(4)?,
            severity: row.get(5)?,
            diagnosis_date: parse_timestamp(&row.get::<String>(6)?),
        })
    }
}
