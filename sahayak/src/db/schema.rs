use libsql::Connection;

use crate::error::Result;

pub async fn init_schema(conn: &Connection) -> Result<()> {
    conn.execute_batch(
        r#"
        -- Farmer accounts
        CREATE TABLE IF NOT EXISTS users (
            id TEXT PRIMARY KEY,
            full_name TEXT NOT NULL,
            email TEXT NOT NULL UNIQUE,
            phone TEXT,
            password_hash TEXT NOT NULL,
            created_at TEXT NOT NULL,
            last_login_at TEXT
        );

        CREATE INDEX IF NOT EXISTS idx_users_email ON users(email);

        -- Logged plant-disease diagnoses
        CREATE TABLE IF NOT EXISTS disease_reports (
            id TEXT PRIMARY KEY,
            user_id TEXT NOT NULL,
            crop_name TEXT NOT NULL,
            disease_detected TEXT NOT NULL,
            region TEXT NOT NULL,
            severity TEXT NOT NULL,
            diagnosis_date TEXT NOT NULL,
            FOREIGN KEY (user_id) REFERENCES users(id) ON DELETE CASCADE
        );

        CREATE INDEX IF NOT EXISTS idx_disease_reports_user_id ON disease_reports(user_id);
        CREATE INDEX IF NOT EXISTS idx_disease_reports_diagnosis_date ON disease_reports(diagnosis_date);

        -- Soil test measurements
        CREATE TABLE IF NOT EXISTS soil_reports (
            id TEXT PRIMARY KEY,
            user_id TEXT NOT NULL,
            ph REAL NOT NULL,
            nitrogen INTEGER NOT NULL,
            phosphorus INTEGER NOT NULL,
            potassium INTEGER NOT NULL,
            organic_matter REAL NOT NULL,
            texture TEXT NOT NULL,
            moisture INTEGER NOT NULL,
            recorded_at TEXT NOT NULL,
            FOREIGN KEY (user_id) REFERENCES users(id) ON DELETE CASCADE
        );

        CREATE INDEX IF NOT EXISTS idx_soil_reports_user_id ON soil_reports(user_id);
        "#,
    )
    .await?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_init_schema_is_idempotent() {
        let conn = libsql::Builder::new_local(":memory:")
            .build()
            .await
            .unwrap()
            .connect()
            .unwrap();

        init_schema(&conn).await.unwrap();
        init_schema(&conn).await.unwrap();

        let mut rows = conn
            .query(
                "SELECT name FROM sqlite_master WHERE type='table' ORDER BY name",
                (),
            )
            .await
            .unwrap();

        let mut tables = Vec::new();
        while let Some(row) = rows.next().await.unwrap() {
            tables.push(row.get::<String>(0).unwrap());
        }

        assert!(tables.contains(&"users".to_string()));
        assert!(tables.contains(&"disease_reports".to_string()));
        assert!(tables.contains(&"soil_reports".to_string()));
    }
}
