//! Users and profiles repository

use chrono::Utc;
use sqlx::{Pool, Postgres};

use super::map_unique_violation;
use crate::{
    error::{AppError, AppResult},
    models::user::{CreateUser, Profile, ProfileData, UpdateUser, User, UserQuery},
};

#[derive(Clone)]
pub struct UsersRepository {
    pool: Pool<Postgres>,
}

impl UsersRepository {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }

    /// Get user by ID
    pub async fn get_by_id(&self, id: i32) -> AppResult<User> {
        sqlx::query_as::<_, User>("SELECT * FROM users WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("User {} not found", id)))
    }

    /// Look up by id without treating a miss as an error (reference resolution)
    pub async fn find_by_id(&self, id: i32) -> AppResult<Option<User>> {
        let user = sqlx::query_as::<_, User>("SELECT * FROM users WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(user)
    }

    /// Get user by username or email (login accepts either)
    pub async fn get_by_username_or_email(&self, login: &str) -> AppResult<Option<User>> {
        let user = sqlx::query_as::<_, User>(
            "SELECT * FROM users WHERE LOWER(username) = LOWER($1) OR LOWER(email) = LOWER($1)",
        )
        .bind(login)
        .fetch_optional(&self.pool)
        .await?;
        Ok(user)
    }

    /// List users ordered by id, optionally filtered by username/email substring
    pub async fn list(&self, query: &UserQuery) -> AppResult<Vec<User>> {
        let users = if let Some(ref term) = query.search {
            sqlx::query_as::<_, User>(
                r#"
                SELECT * FROM users
                WHERE username ILIKE $1 OR email ILIKE $1
                ORDER BY id
                "#,
            )
            .bind(format!("%{}%", term))
            .fetch_all(&self.pool)
            .await?
        } else {
            sqlx::query_as::<_, User>("SELECT * FROM users ORDER BY id")
                .fetch_all(&self.pool)
                .await?
        };
        Ok(users)
    }

    /// Create an authentication identity. The caller runs the profile hook
    /// right after this returns.
    pub async fn create(&self, data: &CreateUser, password_hash: &str) -> AppResult<User> {
        sqlx::query_as::<_, User>(
            r#"
            INSERT INTO users (username, email, password_hash, first_name, last_name, is_staff, is_active)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            RETURNING *
            "#,
        )
        .bind(&data.username)
        .bind(&data.email)
        .bind(password_hash)
        .bind(&data.first_name)
        .bind(&data.last_name)
        .bind(data.is_staff)
        .bind(data.is_active)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| map_unique_violation(e, "Username already exists"))
    }

    /// Update an identity; only provided fields are changed
    pub async fn update(
        &self,
        id: i32,
        data: &UpdateUser,
        password_hash: Option<String>,
    ) -> AppResult<User> {
        let mut sets = Vec::new();
        let mut idx = 0;

        macro_rules! add_field {
            ($field:expr, $name:expr) => {
                if $field.is_some() {
                    idx += 1;
                    sets.push(format!("{} = ${}", $name, idx));
                }
            };
        }

        add_field!(data.username, "username");
        add_field!(data.email, "email");
        add_field!(password_hash, "password_hash");
        add_field!(data.first_name, "first_name");
        add_field!(data.last_name, "last_name");
        add_field!(data.is_staff, "is_staff");
        add_field!(data.is_active, "is_active");

        if sets.is_empty() {
            return self.get_by_id(id).await;
        }

        idx += 1;
        let query = format!(
            "UPDATE users SET {} WHERE id = ${} RETURNING *",
            sets.join(", "),
            idx
        );

        let mut builder = sqlx::query_as::<_, User>(&query);

        macro_rules! bind_field {
            ($field:expr) => {
                if let Some(ref val) = $field {
                    builder = builder.bind(val);
                }
            };
        }

        bind_field!(data.username);
        bind_field!(data.email);
        bind_field!(password_hash);
        bind_field!(data.first_name);
        bind_field!(data.last_name);
        bind_field!(data.is_staff);
        bind_field!(data.is_active);

        builder
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| map_unique_violation(e, "Username already exists"))?
            .ok_or_else(|| AppError::NotFound(format!("User {} not found", id)))
    }

    /// Delete an identity (profile cascades)
    pub async fn delete(&self, id: i32) -> AppResult<()> {
        let result = sqlx::query("DELETE FROM users WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        if result.rows_affected() == 0 {
            return Err(AppError::NotFound(format!("User {} not found", id)));
        }
        Ok(())
    }

    /// Stamp last_login on successful authentication
    pub async fn touch_last_login(&self, id: i32) -> AppResult<()> {
        sqlx::query("UPDATE users SET last_login = $1 WHERE id = $2")
            .bind(Utc::now())
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    // --- Profiles ---

    /// Make sure the one-to-one profile row exists for a user.
    /// Idempotent; safe to run after every identity save.
    pub async fn ensure_profile(&self, user_id: i32) -> AppResult<()> {
        sqlx::query("INSERT INTO profiles (user_id) VALUES ($1) ON CONFLICT (user_id) DO NOTHING")
            .bind(user_id)
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    /// Get the profile for a user
    pub async fn get_profile(&self, user_id: i32) -> AppResult<Profile> {
        sqlx::query_as::<_, Profile>("SELECT * FROM profiles WHERE user_id = $1")
            .bind(user_id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Profile for user {} not found", user_id)))
    }

    /// Apply profile fields for a user
    pub async fn update_profile(&self, user_id: i32, data: &ProfileData) -> AppResult<Profile> {
        sqlx::query_as::<_, Profile>(
            r#"
            UPDATE profiles
            SET national_id = COALESCE($1, national_id),
                area = COALESCE($2, area),
                occupation = COALESCE($3, occupation)
            WHERE user_id = $4
            RETURNING *
            "#,
        )
        .bind(&data.national_id)
        .bind(&data.area)
        .bind(&data.occupation)
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Profile for user {} not found", user_id)))
    }

    /// Store the handle of an uploaded profile photo
    pub async fn set_profile_photo(&self, user_id: i32, photo_path: &str) -> AppResult<Profile> {
        sqlx::query_as::<_, Profile>(
            "UPDATE profiles SET photo_path = $1 WHERE user_id = $2 RETURNING *",
        )
        .bind(photo_path)
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Profile for user {} not found", user_id)))
    }
}
