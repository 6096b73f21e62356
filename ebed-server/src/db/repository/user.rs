//! User Repository
//!
//! Identity lookups fail with `UserNotFound`, never with a default role.

use super::{RepoError, RepoResult};
use shared::error::ErrorCode;
use shared::models::{User, UserRole, UserStatus};
use sqlx::SqlitePool;

const USER_SELECT: &str =
    "SELECT id, full_name, email, password_hash, status, role, image_url, created_at FROM users";

/// Validated input for a new account. `email` is expected normalized.
#[derive(Debug, Clone)]
pub struct NewUser {
    pub full_name: String,
    pub email: String,
    /// Empty for accounts created by the external sign-in bridge
    pub password_hash: String,
}

fn user_not_found(id: i64) -> RepoError {
    RepoError::Business(ErrorCode::UserNotFound, format!("User {id} not found"))
}

pub async fn find_by_id(pool: &SqlitePool, id: i64) -> RepoResult<Option<User>> {
    let sql = format!("{USER_SELECT} WHERE id = ?");
    let row = sqlx::query_as::<_, User>(&sql)
        .bind(id)
        .fetch_optional(pool)
        .await?;
    Ok(row)
}

pub async fn find_by_email(pool: &SqlitePool, email: &str) -> RepoResult<Option<User>> {
    let sql = format!("{USER_SELECT} WHERE email = ?");
    let row = sqlx::query_as::<_, User>(&sql)
        .bind(email)
        .fetch_optional(pool)
        .await?;
    Ok(row)
}

/// Load a user or fail with `UserNotFound`
pub async fn get(pool: &SqlitePool, id: i64) -> RepoResult<User> {
    find_by_id(pool, id).await?.ok_or_else(|| user_not_found(id))
}

/// Create a PENDING/USER account
pub async fn create(pool: &SqlitePool, data: NewUser, now: i64) -> RepoResult<User> {
    let id = shared::util::snowflake_id();
    let result = sqlx::query(
        "INSERT INTO users (id, full_name, email, password_hash, status, role, created_at) VALUES (?1, ?2, ?3, ?4, 'PENDING', 'USER', ?5)",
    )
    .bind(id)
    .bind(&data.full_name)
    .bind(&data.email)
    .bind(&data.password_hash)
    .bind(now)
    .execute(pool)
    .await;

    match result {
        Ok(_) => {}
        Err(e) => {
            return Err(match RepoError::from(e) {
                RepoError::Duplicate(_) => RepoError::business(ErrorCode::EmailAlreadyRegistered),
                other => other,
            });
        }
    }

    tracing::info!(user_id = id, "User registered");
    get(pool, id).await
}

/// First external sign-in creates the account; later ones return it unchanged
pub async fn find_or_create_external(
    pool: &SqlitePool,
    email: &str,
    full_name: &str,
    now: i64,
) -> RepoResult<User> {
    let id = shared::util::snowflake_id();
    let inserted = sqlx::query(
        "INSERT INTO users (id, full_name, email, password_hash, status, role, created_at) VALUES (?1, ?2, ?3, '', 'PENDING', 'USER', ?4) ON CONFLICT(email) DO NOTHING",
    )
    .bind(id)
    .bind(full_name)
    .bind(email)
    .bind(now)
    .execute(pool)
    .await?;

    if inserted.rows_affected() > 0 {
        tracing::info!(user_id = id, "User created by external sign-in");
    }

    find_by_email(pool, email)
        .await?
        .ok_or_else(|| RepoError::Database("User vanished after upsert".into()))
}

pub async fn get_user_role(pool: &SqlitePool, id: i64) -> RepoResult<UserRole> {
    let row: Option<(UserRole,)> = sqlx::query_as("SELECT role FROM users WHERE id = ?")
        .bind(id)
        .fetch_optional(pool)
        .await?;
    row.map(|(role,)| role).ok_or_else(|| user_not_found(id))
}

/// Status as text; empty string when unset
pub async fn get_user_status(pool: &SqlitePool, id: i64) -> RepoResult<String> {
    let row: Option<(Option<String>,)> = sqlx::query_as("SELECT status FROM users WHERE id = ?")
        .bind(id)
        .fetch_optional(pool)
        .await?;
    row.map(|(status,)| status.unwrap_or_default())
        .ok_or_else(|| user_not_found(id))
}

/// Image URL; empty string when unset
pub async fn get_user_image(pool: &SqlitePool, id: i64) -> RepoResult<String> {
    let row: Option<(Option<String>,)> =
        sqlx::query_as("SELECT image_url FROM users WHERE id = ?")
            .bind(id)
            .fetch_optional(pool)
            .await?;
    row.map(|(image,)| image.unwrap_or_default())
        .ok_or_else(|| user_not_found(id))
}

/// Accounts waiting for approval, oldest first
pub async fn list_pending(pool: &SqlitePool) -> RepoResult<Vec<User>> {
    let sql = format!("{USER_SELECT} WHERE status = 'PENDING' ORDER BY created_at, id");
    let rows = sqlx::query_as::<_, User>(&sql).fetch_all(pool).await?;
    Ok(rows)
}

pub async fn set_status(pool: &SqlitePool, id: i64, status: UserStatus) -> RepoResult<User> {
    let rows = sqlx::query("UPDATE users SET status = ? WHERE id = ?")
        .bind(status)
        .bind(id)
        .execute(pool)
        .await?;
    if rows.rows_affected() == 0 {
        return Err(user_not_found(id));
    }
    tracing::info!(user_id = id, status = status.as_str(), "User status changed");
    get(pool, id).await
}

/// Roles are assigned by operators, there is no self-service path
pub async fn set_role(pool: &SqlitePool, id: i64, role: UserRole) -> RepoResult<User> {
    let rows = sqlx::query("UPDATE users SET role = ? WHERE id = ?")
        .bind(role)
        .bind(id)
        .execute(pool)
        .await?;
    if rows.rows_affected() == 0 {
        return Err(user_not_found(id));
    }
    tracing::info!(user_id = id, role = role.as_str(), "User role changed");
    get(pool, id).await
}

pub async fn update_image(pool: &SqlitePool, id: i64, image_url: &str) -> RepoResult<User> {
    let rows = sqlx::query("UPDATE users SET image_url = ? WHERE id = ?")
        .bind(image_url)
        .bind(id)
        .execute(pool)
        .await?;
    if rows.rows_affected() == 0 {
        return Err(user_not_found(id));
    }
    get(pool, id).await
}
