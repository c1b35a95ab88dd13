// ABOUTME: User storage layer using SQLite
// ABOUTME: Handles creating and looking up dashboard users

use chrono::Utc;
use sqlx::{sqlite::SqliteRow, Row, SqlitePool};
use tracing::debug;

use super::types::{NewUser, Role, User};
use agentdesk_storage::StorageError;

pub struct UserStorage {
    pool: SqlitePool,
}

impl UserStorage {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    pub async fn create_user(&self, input: NewUser) -> Result<User, StorageError> {
        let email = input.email.trim().to_lowercase();
        if email.is_empty() || !email.contains('@') {
            return Err(StorageError::InvalidInput(
                "A valid email address is required".to_string(),
            ));
        }
        if input.name.trim().is_empty() {
            return Err(StorageError::InvalidInput("Name is required".to_string()));
        }

        debug!("Creating user: {}", email);

        let now = Utc::now();
        let result = sqlx::query(
            r#"
            INSERT INTO users (email, name, role, created_at, updated_at)
            VALUES (?, ?, ?, ?, ?)
            "#,
        )
        .bind(&email)
        .bind(input.name.trim())
        .bind(input.role.as_str())
        .bind(now)
        .bind(now)
        .execute(&self.pool)
        .await
        .map_err(|e| StorageError::from_constraint(e, "User"))?;

        self.get_user(result.last_insert_rowid()).await
    }

    /// Fetch a user, failing with `NotFound` when absent
    pub async fn get_user(&self, user_id: i64) -> Result<User, StorageError> {
        self.find_user(user_id).await?.ok_or(StorageError::NotFound)
    }

    pub async fn find_user(&self, user_id: i64) -> Result<Option<User>, StorageError> {
        let row = sqlx::query("SELECT * FROM users WHERE id = ?")
            .bind(user_id)
            .fetch_optional(&self.pool)
            .await
            .map_err(StorageError::Sqlx)?;

        row.as_ref().map(|r| self.row_to_user(r)).transpose()
    }

    pub async fn find_by_email(&self, email: &str) -> Result<Option<User>, StorageError> {
        let row = sqlx::query("SELECT * FROM users WHERE email = ?")
            .bind(email.trim().to_lowercase())
            .fetch_optional(&self.pool)
            .await
            .map_err(StorageError::Sqlx)?;

        row.as_ref().map(|r| self.row_to_user(r)).transpose()
    }

    pub async fn list_users(&self) -> Result<Vec<User>, StorageError> {
        let rows = sqlx::query("SELECT * FROM users ORDER BY id")
            .fetch_all(&self.pool)
            .await
            .map_err(StorageError::Sqlx)?;

        rows.iter().map(|row| self.row_to_user(row)).collect()
    }

    fn row_to_user(&self, row: &SqliteRow) -> Result<User, StorageError> {
        let role: String = row.try_get("role").map_err(StorageError::Sqlx)?;
        let role = role
            .parse::<Role>()
            .map_err(StorageError::Database)?;

        Ok(User {
            id: row.try_get("id").map_err(StorageError::Sqlx)?,
            email: row.try_get("email").map_err(StorageError::Sqlx)?,
            name: row.try_get("name").map_err(StorageError::Sqlx)?,
            role,
            created_at: row.try_get("created_at").map_err(StorageError::Sqlx)?,
            updated_at: row.try_get("updated_at").map_err(StorageError::Sqlx)?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use agentdesk_storage::connect_in_memory;

    fn new_user(email: &str, role: Role) -> NewUser {
        NewUser {
            email: email.to_string(),
            name: "Test User".to_string(),
            role,
        }
    }

    #[tokio::test]
    async fn test_create_and_get_user() {
        let pool = connect_in_memory().await.unwrap();
        let storage = UserStorage::new(pool);

        let user = storage
            .create_user(new_user("Admin@Example.com", Role::Admin))
            .await
            .unwrap();

        assert_eq!(user.email, "admin@example.com");
        assert!(user.is_admin());

        let fetched = storage.get_user(user.id).await.unwrap();
        assert_eq!(fetched.id, user.id);
        assert_eq!(fetched.role, Role::Admin);

        let by_email = storage.find_by_email("ADMIN@example.com").await.unwrap();
        assert_eq!(by_email.map(|u| u.id), Some(user.id));
    }

    #[tokio::test]
    async fn test_missing_user() {
        let pool = connect_in_memory().await.unwrap();
        let storage = UserStorage::new(pool);

        assert!(storage.find_user(42).await.unwrap().is_none());
        assert!(matches!(
            storage.get_user(42).await,
            Err(StorageError::NotFound)
        ));
    }

    #[tokio::test]
    async fn test_duplicate_email_is_conflict() {
        let pool = connect_in_memory().await.unwrap();
        let storage = UserStorage::new(pool);

        storage
            .create_user(new_user("dup@example.com", Role::User))
            .await
            .unwrap();
        let err = storage
            .create_user(new_user("dup@example.com", Role::Subscriber))
            .await
            .unwrap_err();

        assert!(matches!(err, StorageError::Conflict(_)));
    }

    #[tokio::test]
    async fn test_create_user_validates_input() {
        let pool = connect_in_memory().await.unwrap();
        let storage = UserStorage::new(pool);

        assert!(matches!(
            storage.create_user(new_user("not-an-email", Role::User)).await,
            Err(StorageError::InvalidInput(_))
        ));
        assert!(storage.list_users().await.unwrap().is_empty());
    }
}
