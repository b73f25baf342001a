use std::sync::Arc;

use serde::Serialize;
use tracing::{info, warn};
use uuid::Uuid;

use super::{is_blank, remove_stale_file, ServiceError, ServiceResult};
use crate::auth::password::{hash_password, verify_password};
use crate::auth::{Claims, TokenKeys};
use crate::database::models::{NewUser, PublicUser};
use crate::database::{DatabaseError, UserStore};
use crate::storage::{generate_file_name, FileStore, UploadedFile};

/// Same message for unknown email and wrong password.
const INVALID_CREDENTIALS: &str = "Invalid credentials";
const MIN_PASSWORD_LEN: usize = 6;

#[derive(Debug, Clone, Default)]
pub struct Registration {
    pub name: String,
    pub email: String,
    pub password: String,
    pub confirm_password: String,
}

#[derive(Debug, Clone, Default)]
pub struct ProfileUpdate {
    pub name: String,
    pub email: String,
    pub current_password: String,
    pub new_password: String,
    pub confirm_new_password: String,
}

/// Issued on successful login.
#[derive(Debug, Clone, Serialize)]
pub struct LoginSession {
    pub token: String,
    pub id: Uuid,
    pub name: String,
}

/// Registration, login and profile management over the credential and file stores
pub struct IdentityService {
    users: Arc<dyn UserStore>,
    files: Arc<dyn FileStore>,
    tokens: TokenKeys,
    max_avatar_bytes: usize,
}

impl IdentityService {
    pub fn new(
        users: Arc<dyn UserStore>,
        files: Arc<dyn FileStore>,
        tokens: TokenKeys,
        max_avatar_bytes: usize,
    ) -> Self {
        Self {
            users,
            files,
            tokens,
            max_avatar_bytes,
        }
    }

    /// Create an account and return its normalized email.
    pub async fn register(&self, input: Registration) -> ServiceResult<String> {
        if is_blank(&input.name) || is_blank(&input.email) || is_blank(&input.password) {
            return Err(ServiceError::validation("Fill in all fields."));
        }

        let email = normalize_email(&input.email);
        if self.users.find_by_email(&email).await?.is_some() {
            return Err(ServiceError::conflict("Email already exists."));
        }

        if input.password.trim().chars().count() < MIN_PASSWORD_LEN {
            return Err(ServiceError::validation(
                "Password should be at least 6 characters.",
            ));
        }

        if input.password != input.confirm_password {
            return Err(ServiceError::validation("Passwords do not match."));
        }

        let password_hash = hash_password(&input.password)?;
        let user = self
            .users
            .insert(NewUser {
                name: input.name.trim().to_string(),
                email,
                password_hash,
            })
            .await
            .map_err(|e| match e {
                // Lost a race with a concurrent registration
                DatabaseError::UniqueViolation(_) => ServiceError::conflict("Email already exists."),
                other => other.into(),
            })?;

        info!("Registered user {} ({})", user.id, user.email);
        Ok(user.email)
    }

    pub async fn login(&self, email: &str, password: &str) -> ServiceResult<LoginSession> {
        if is_blank(email) || is_blank(password) {
            return Err(ServiceError::validation("Fill in all fields."));
        }

        let Some(user) = self.users.find_by_email(&normalize_email(email)).await? else {
            warn!("Rejected login attempt");
            return Err(ServiceError::InvalidCredentials(INVALID_CREDENTIALS.to_string()));
        };

        if !verify_password(password, &user.password_hash)? {
            warn!("Rejected login attempt");
            return Err(ServiceError::InvalidCredentials(INVALID_CREDENTIALS.to_string()));
        }

        let token = self.tokens.issue(&Claims::new(user.id, user.name.clone()))?;
        info!("User {} logged in", user.id);

        Ok(LoginSession {
            token,
            id: user.id,
            name: user.name,
        })
    }

    pub async fn get_user(&self, id: Uuid) -> ServiceResult<PublicUser> {
        self.users
            .find_by_id(id)
            .await?
            .map(PublicUser::from)
            .ok_or_else(|| ServiceError::not_found("User not found."))
    }

    pub async fn list_authors(&self) -> ServiceResult<Vec<PublicUser>> {
        let users = self.users.list().await?;
        Ok(users.into_iter().map(PublicUser::from).collect())
    }

    /// Replace the user's avatar. The new file is validated and stored before
    /// the old one is touched; the old file is removed only once the record
    /// points at the new one.
    pub async fn change_avatar(
        &self,
        user_id: Uuid,
        avatar: Option<UploadedFile>,
    ) -> ServiceResult<PublicUser> {
        let avatar = avatar.ok_or_else(|| ServiceError::validation("Please choose an image."))?;

        if avatar.size() > self.max_avatar_bytes {
            return Err(ServiceError::validation(
                "Profile picture too big. Should be less than 500kb",
            ));
        }

        let user = self
            .users
            .find_by_id(user_id)
            .await?
            .ok_or_else(|| ServiceError::not_found("User not found."))?;

        let file_name = generate_file_name(&avatar.file_name);
        self.files.put(&file_name, avatar.bytes).await?;

        let updated = match self.users.set_avatar(user_id, &file_name).await {
            Ok(Some(updated)) => updated,
            Ok(None) => {
                remove_stale_file(self.files.as_ref(), &file_name).await;
                return Err(ServiceError::not_found("Avatar couldn't be changed."));
            }
            Err(e) => {
                remove_stale_file(self.files.as_ref(), &file_name).await;
                return Err(e.into());
            }
        };

        if let Some(previous) = user.avatar.as_deref() {
            remove_stale_file(self.files.as_ref(), previous).await;
        }

        info!("User {} changed avatar to {}", user_id, file_name);
        Ok(updated.into())
    }

    pub async fn edit_user(&self, user_id: Uuid, input: ProfileUpdate) -> ServiceResult<PublicUser> {
        if is_blank(&input.name)
            || is_blank(&input.email)
            || is_blank(&input.current_password)
            || is_blank(&input.new_password)
        {
            return Err(ServiceError::validation("Fill in all fields."));
        }

        let user = self
            .users
            .find_by_id(user_id)
            .await?
            .ok_or_else(|| ServiceError::not_found("User not found."))?;

        let email = normalize_email(&input.email);
        if let Some(owner) = self.users.find_by_email(&email).await? {
            if owner.id != user_id {
                return Err(ServiceError::conflict("Email already exists."));
            }
        }

        if !verify_password(&input.current_password, &user.password_hash)? {
            return Err(ServiceError::InvalidCredentials(
                "Invalid current password.".to_string(),
            ));
        }

        if input.new_password != input.confirm_new_password {
            return Err(ServiceError::validation("New passwords do not match."));
        }

        let password_hash = hash_password(&input.new_password)?;
        let updated = self
            .users
            .update_profile(user_id, input.name.trim(), &email, &password_hash)
            .await
            .map_err(|e| match e {
                DatabaseError::UniqueViolation(_) => ServiceError::conflict("Email already exists."),
                other => other.into(),
            })?
            .ok_or_else(|| ServiceError::not_found("User not found."))?;

        info!("User {} updated profile", user_id);
        Ok(updated.into())
    }
}

fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}
