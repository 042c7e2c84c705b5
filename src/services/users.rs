//! Authentication and user management service.
//!
//! User mutations run the full pipeline: persist, sync the one-to-one
//! profile through an explicit post-write hook, record audit, fan out a
//! notification.

use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};
use chrono::Utc;
use validator::Validate;

use crate::{
    config::AuthConfig,
    error::{AppError, AppResult},
    models::user::{
        CreateUser, UpdateOwnProfile, UpdateUser, User, UserClaims, UserQuery, UserWithProfile,
    },
    repository::Repository,
    services::{audit::AuditService, notifications::NotificationsService},
};

#[derive(Clone)]
pub struct UsersService {
    repository: Repository,
    config: AuthConfig,
    audit: AuditService,
    notifications: NotificationsService,
}

impl UsersService {
    pub fn new(repository: Repository, config: AuthConfig) -> Self {
        Self {
            audit: AuditService::new(repository.clone()),
            notifications: NotificationsService::new(repository.clone()),
            repository,
            config,
        }
    }

    /// Authenticate by username or email and return a bearer token
    pub async fn authenticate(&self, login: &str, password: &str) -> AppResult<(String, User)> {
        let user = self
            .repository
            .users
            .get_by_username_or_email(login)
            .await?
            .ok_or_else(|| AppError::Authentication("Invalid credentials".to_string()))?;

        if !user.is_active {
            return Err(AppError::Authentication("Account is disabled".to_string()));
        }

        if !self.verify_password(&user, password)? {
            return Err(AppError::Authentication("Invalid credentials".to_string()));
        }

        self.repository.users.touch_last_login(user.id).await?;

        let token = self.create_token(&user)?;
        Ok((token, user))
    }

    fn create_token(&self, user: &User) -> AppResult<String> {
        let now = Utc::now().timestamp();
        let exp = now + (self.config.jwt_expiration_hours as i64 * 3600);

        let claims = UserClaims {
            sub: user.username.clone(),
            user_id: user.id,
            is_staff: user.is_staff,
            exp,
            iat: now,
        };

        claims
            .create_token(&self.config.jwt_secret)
            .map_err(|e| AppError::Internal(format!("Failed to create token: {}", e)))
    }

    fn verify_password(&self, user: &User, password: &str) -> AppResult<bool> {
        if let Some(ref hash) = user.password_hash {
            let parsed_hash = PasswordHash::new(hash)
                .map_err(|_| AppError::Internal("Invalid password hash".to_string()))?;
            return Ok(Argon2::default()
                .verify_password(password.as_bytes(), &parsed_hash)
                .is_ok());
        }
        Ok(false)
    }

    /// Hash a password using Argon2
    pub fn hash_password(&self, password: &str) -> AppResult<String> {
        let salt = SaltString::generate(&mut OsRng);
        let argon2 = Argon2::default();
        let hash = argon2
            .hash_password(password.as_bytes(), &salt)
            .map_err(|e| AppError::Internal(format!("Failed to hash password: {}", e)))?;
        Ok(hash.to_string())
    }

    async fn with_profile(&self, user: User) -> AppResult<UserWithProfile> {
        let profile = self.repository.users.get_profile(user.id).await?;
        Ok(UserWithProfile { user, profile })
    }

    /// Get user with profile by ID
    pub async fn get_by_id(&self, id: i32) -> AppResult<UserWithProfile> {
        let user = self.repository.users.get_by_id(id).await?;
        self.with_profile(user).await
    }

    /// List users with their profiles
    pub async fn list(&self, query: &UserQuery) -> AppResult<Vec<UserWithProfile>> {
        let users = self.repository.users.list(query).await?;
        let mut result = Vec::with_capacity(users.len());
        for user in users {
            result.push(self.with_profile(user).await?);
        }
        Ok(result)
    }

    /// Create an identity. Pipeline: persist, profile hook, audit, notify.
    pub async fn create(&self, actor: &UserClaims, data: CreateUser) -> AppResult<UserWithProfile> {
        data.validate()
            .map_err(|e| AppError::Validation(e.to_string()))?;

        let password_hash = self.hash_password(&data.password)?;
        let user = self.repository.users.create(&data, &password_hash).await?;

        // Profile hook: runs after every identity save
        self.repository.users.ensure_profile(user.id).await?;
        self.repository
            .users
            .update_profile(user.id, &data.profile)
            .await?;

        self.audit
            .record(
                Some(actor.user_id),
                "create",
                "user",
                &format!("ID: {} - {}", user.id, user.username),
            )
            .await?;

        self.notifications
            .notify(
                Some(actor.user_id),
                "User created",
                &format!("You created user {}", user.username),
            )
            .await;

        self.with_profile(user).await
    }

    /// Update an identity. Same pipeline as create.
    pub async fn update(
        &self,
        actor: &UserClaims,
        id: i32,
        data: UpdateUser,
    ) -> AppResult<UserWithProfile> {
        data.validate()
            .map_err(|e| AppError::Validation(e.to_string()))?;

        let password_hash = match data.password {
            Some(ref password) => Some(self.hash_password(password)?),
            None => None,
        };

        let user = self.repository.users.update(id, &data, password_hash).await?;

        self.repository.users.ensure_profile(user.id).await?;
        if let Some(ref profile) = data.profile {
            self.repository.users.update_profile(user.id, profile).await?;
        }

        self.audit
            .record(
                Some(actor.user_id),
                "update",
                "user",
                &format!("ID: {} - {}", user.id, user.username),
            )
            .await?;

        self.notifications
            .notify(
                Some(actor.user_id),
                "User updated",
                &format!("You modified {}", user.username),
            )
            .await;

        self.with_profile(user).await
    }

    /// Delete an identity. The identifying detail is captured before the
    /// delete; the row is unreadable afterwards.
    pub async fn delete(&self, actor: &UserClaims, id: i32) -> AppResult<()> {
        let user = self.repository.users.get_by_id(id).await?;
        let snapshot = format!("ID: {} - {}", user.id, user.username);

        self.repository.users.delete(id).await?;

        self.audit
            .record(Some(actor.user_id), "delete", "user", &snapshot)
            .await?;

        self.notifications
            .notify(
                Some(actor.user_id),
                "User deleted",
                &format!("Deleted: {}", snapshot),
            )
            .await;

        Ok(())
    }

    /// Update the caller's own account and profile fields
    pub async fn update_own_profile(
        &self,
        user_id: i32,
        data: UpdateOwnProfile,
    ) -> AppResult<UserWithProfile> {
        data.validate()
            .map_err(|e| AppError::Validation(e.to_string()))?;

        let user = self.repository.users.get_by_id(user_id).await?;

        // Changing the password requires proving the current one
        let password_hash = if let Some(ref new_password) = data.new_password {
            let current = data.current_password.as_ref().ok_or_else(|| {
                AppError::Validation("Current password required to change password".to_string())
            })?;
            if !self.verify_password(&user, current)? {
                return Err(AppError::Authentication(
                    "Current password is incorrect".to_string(),
                ));
            }
            Some(self.hash_password(new_password)?)
        } else {
            None
        };

        let account_update = UpdateUser {
            username: None,
            email: data.email.clone(),
            password: None,
            first_name: data.first_name.clone(),
            last_name: data.last_name.clone(),
            is_staff: None,
            is_active: None,
            profile: None,
        };
        let user = self
            .repository
            .users
            .update(user_id, &account_update, password_hash)
            .await?;

        self.repository.users.ensure_profile(user.id).await?;
        self.repository
            .users
            .update_profile(
                user.id,
                &crate::models::user::ProfileData {
                    national_id: data.national_id.clone(),
                    area: data.area.clone(),
                    occupation: data.occupation.clone(),
                },
            )
            .await?;

        self.with_profile(user).await
    }

    /// Store the handle of an uploaded profile photo
    pub async fn set_profile_photo(&self, user_id: i32, photo_path: &str) -> AppResult<UserWithProfile> {
        let user = self.repository.users.get_by_id(user_id).await?;
        self.repository
            .users
            .set_profile_photo(user_id, photo_path)
            .await?;
        self.with_profile(user).await
    }
}
