//! # User Repository
//!
//! Database operations for users.

use billing_core::{User, UserCategory, UserId};
use chrono::{DateTime, Utc};
use sqlx::{SqliteConnection, SqlitePool};
use tracing::debug;

use crate::error::DbResult;

/// Row shape of the `users` table.
#[derive(Debug, Clone, sqlx::FromRow)]
struct UserRow {
    id: i64,
    username: String,
    category: UserCategory,
    created_at: DateTime<Utc>,
}

impl From<UserRow> for User {
    fn from(row: UserRow) -> Self {
        User {
            id: row.id,
            username: row.username,
            category: row.category,
            created_at: row.created_at,
        }
    }
}

/// Repository for user database operations.
///
/// ## Usage
/// ```rust,ignore
/// let repo = UserRepository::new(pool);
/// let user = repo.find_by_id(1).await?;
/// ```
#[derive(Debug, Clone)]
pub struct UserRepository {
    pool: SqlitePool,
}

impl UserRepository {
    /// Creates a new UserRepository.
    pub fn new(pool: SqlitePool) -> Self {
        UserRepository { pool }
    }

    /// Gets a user by ID.
    pub async fn find_by_id(&self, id: UserId) -> DbResult<Option<User>> {
        debug!(user_id = id, "Fetching user");

        let row = sqlx::query_as::<_, UserRow>(
            r#"
            SELECT id, username, category, created_at
            FROM users
            WHERE id = ?1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(User::from))
    }

    /// Inserts a user.
    pub async fn insert(&self, user: &User) -> DbResult<()> {
        let mut conn = self.pool.acquire().await?;
        insert_user(&mut *conn, user).await
    }

    /// Counts users.
    pub async fn count(&self) -> DbResult<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM users")
            .fetch_one(&self.pool)
            .await?;
        Ok(count)
    }
}

/// Inserts a user on an existing connection (used inside seeding transactions).
pub(crate) async fn insert_user(conn: &mut SqliteConnection, user: &User) -> DbResult<()> {
    debug!(user_id = user.id, category = %user.category, "Inserting user");

    sqlx::query(
        r#"
        INSERT INTO users (id, username, category, created_at)
        VALUES (?1, ?2, ?3, ?4)
        "#,
    )
    .bind(user.id)
    .bind(&user.username)
    .bind(user.category)
    .bind(user.created_at)
    .execute(&mut *conn)
    .await?;

    Ok(())
}

/// Removes every user. Bills cascade.
pub(crate) async fn delete_all_users(conn: &mut SqliteConnection) -> DbResult<u64> {
    let result = sqlx::query("DELETE FROM users").execute(&mut *conn).await?;
    Ok(result.rows_affected())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::DbError;
    use crate::pool::{Database, DbConfig};
    use chrono::TimeZone;

    fn ada() -> User {
        User {
            id: 1,
            username: "ada".to_string(),
            category: UserCategory::Affiliate,
            created_at: Utc.with_ymd_and_hms(2021, 3, 4, 5, 6, 7).unwrap(),
        }
    }

    #[tokio::test]
    async fn test_insert_and_find() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        db.users().insert(&ada()).await.unwrap();

        let found = db.users().find_by_id(1).await.unwrap();
        assert_eq!(found, Some(ada()));
        assert_eq!(db.users().count().await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_missing_user_is_none() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        assert!(db.users().find_by_id(42).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_duplicate_id_is_unique_violation() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        db.users().insert(&ada()).await.unwrap();

        let err = db.users().insert(&ada()).await.unwrap_err();
        assert!(matches!(err, DbError::UniqueViolation { .. }));
    }
}
