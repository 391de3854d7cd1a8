use chrono::{DateTime, Utc};
use libsql::{params, Connection};

use crate::error::Result;
use crate::models::User;

pub struct UserRepository;

impl UserRepository {
    pub async fn create(conn: &Connection, user: &User) -> Result<()> {
        conn.execute(
            r#"
            INSERT INTO users (
                id, full_name, email, phone, password_hash, created_at, last_login_at
            ) VALUES (
                ?1, ?2, ?3, ?4, ?5, ?6, ?7
            )
            "#,
            params![
                user.id.clone(),
                user.full_name.clone(),
                user.email.clone(),
                user.phone.clone(),
                user.password_hash.clone(),
                user.created_at.to_rfc3339(),
                user.last_login_at.map(|at| at.to_rfc3339()),
            ],
        )
        .await?;

        Ok(())
    }

    pub async fn get_by_id(conn: &Connection, id: &str) -> Result<Option<User>> {
        let mut rows = conn
            .query(
                r#"
                SELECT id, full_name, email, phone, password_hash, created_at, last_login_at
                FROM users
                WHERE id = ?1
                "#,
                params![id],
            )
            .await?;

        match rows.next().await? {
            Some(row) => Ok(Some(Self::row_to_user(&row)?)),
            None => Ok(None),
        }
    }

    pub async fn get_by_email(conn: &Connection, email: &str) -> Result<Option<User>> {
        let mut rows = conn
            .query(
                r#"
                SELECT id, full_name, email, phone, password_hash, created_at, last_login_at
                FROM users
                WHERE LOWER(email) = LOWER(?1)
                "#,
                params![email],
            )
            .await?;

        match rows.next().await? {
            Some(row) => Ok(Some(Self::row_to_user(&row)?)),
            None => Ok(None),
        }
    }

    pub async fn update_last_login(conn: &Connection, id: &str, at: DateTime<Utc>) -> Result<()> {
        conn.execute(
            "UPDATE users SET last_login_at = ?1 WHERE id = ?2",
            params![at.to_rfc3339(), id],
        )
        .await?;

        Ok(())
    }

    fn row_to_user(row: &libsql::Row) -> Result<User> {
        Ok(User {
            id: row.get(0)?,
            full_name: row.get(1)?,
            email: row.get(2)?,
            phone: row.get(3)?,
            password_hash: row.get(4)?,
            created_at: parse_timestamp(&row.get::<String>(5)?),
            last_login_at: row.get::<Option<String>>(6)?.map(|s| parse_timestamp(&s)),
        })
    }
}

pub(crate) fn parse_timestamp(value: &str) -> DateTime<Utc> {
    DateTime::parse_from_rfc3339(value)
        .map(|dt| dt.with_timezone(&Utc))
        .unwrap_or_else(|_| Utc::now())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::schema;

    async fn setup_test_db() -> Connection {
        let conn = libsql::Builder::new_local(":memory:")
            .build()
            .await
            .unwrap()
            .connect()
            .unwrap();
        schema::init_schema(&conn).await.unwrap();
        conn
    }

    fn test_user(id: &str, email: &str) -> User {
        User::new(
            id.to_string(),
            "Test Farmer".to_string(),
            email.to_string(),
            Some("+911234567890".to_string()),
            "hashed".to_string(),
        )
    }

    #[tokio::test]
    async fn test_create_and_get_by_id() {
        let conn = setup_test_db().await;
        let user = test_user("u1", "farmer@example.com");

        UserRepository::create(&conn, &user).await.unwrap();

        let fetched = UserRepository::get_by_id(&conn, "u1").await.unwrap().unwrap();
        assert_eq!(fetched.email, "farmer@example.com");
        assert_eq!(fetched.full_name, "Test Farmer");
        assert_eq!(fetched.phone, Some("+911234567890".to_string()));
    }

    #[tokio::test]
    async fn test_get_by_email_is_case_insensitive() {
        let conn = setup_test_db().await;
        UserRepository::create(&conn, &test_user("u1", "farmer@example.com"))
            .await
            .unwrap();

        let fetched = UserRepository::get_by_email(&conn, "Farmer@Example.COM")
            .await
            .unwrap();
        assert!(fetched.is_some());
    }

    #[tokio::test]
    async fn test_duplicate_email_rejected() {
        let conn = setup_test_db().await;
        UserRepository::create(&conn, &test_user("u1", "farmer@example.com"))
            .await
            .unwrap();

        let result = UserRepository::create(&conn, &test_user("u2", "farmer@example.com")).await;
        assert!(result.is_err());
    }

    #[tokio::test]
    async fn test_update_last_login() {
        let conn = setup_test_db().await;
        let mut user = test_user("u1", "farmer@example.com");
        user.last_login_at = None;
        UserRepository::create(&conn, &user).await.unwrap();

        let at = Utc::now();
        UserRepository::update_last_login(&conn, "u1", at).await.unwrap();

        let fetched = UserRepository::get_by_id(&conn, "u1").await.unwrap().unwrap();
        assert!(fetched.last_login_at.is_some());
    }
}
