//! Authentication and user management service

use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};
use chrono::Utc;

use crate::{
    config::AuthConfig,
    error::{AppError, AppResult},
    models::user::{CreateUser, RegisterUser, Role, UpdateProfile, UpdateUser, User, UserClaims, UserQuery},
    repository::Repository,
};

#[derive(Clone)]
pub struct UsersService {
    repository: Repository,
    config: AuthConfig,
}

impl UsersService {
    pub fn new(repository: Repository, config: AuthConfig) -> Self {
        Self { repository, config }
    }

    /// Authenticate by username/password and return (token, user)
    pub async fn authenticate(&self, username: &str, password: &str) -> AppResult<(String, User)> {
        let user = self
            .repository
            .users_get_by_username(username)
            .await?
            .ok_or_else(|| AppError::Authentication("Invalid username or password".to_string()))?;

        if !self.verify_password(&user, password)? {
            return Err(AppError::Authentication("Invalid username or password".to_string()));
        }

        let token = self.create_token_for_user(&user)?;
        Ok((token, user))
    }

    /// Create JWT token for a user
    fn create_token_for_user(&self, user: &User) -> AppResult<String> {
        let now = Utc::now().timestamp();
        let exp = now + (self.config.jwt_expiration_hours as i64 * 3600);

        let claims = UserClaims {
            sub: user.username.clone(),
            user_id: user.id,
            email: user.email.clone(),
            role: user.role,
            exp,
            iat: now,
        };

        claims
            .create_token(&self.config.jwt_secret)
            .map_err(|e| AppError::Internal(format!("Failed to create token: {}", e)))
    }

    /// Verify user password
    fn verify_password(&self, user: &User, password: &str) -> AppResult<bool> {
        let parsed_hash = PasswordHash::new(&user.password)
            .map_err(|_| AppError::Internal("Invalid password hash".to_string()))?;
        Ok(Argon2::default()
            .verify_password(password.as_bytes(), &parsed_hash)
            .is_ok())
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

    /// Get user by ID
    pub async fn get_by_id(&self, id: i32) -> AppResult<User> {
        self.repository.users_get_by_id(id).await
    }

    /// Search users
    pub async fn search_users(&self, query: &UserQuery) -> AppResult<(Vec<User>, i64)> {
        self.repository.users_search(query).await
    }

    /// Self-registration: new accounts start in the `pending` role
    pub async fn register(&self, data: RegisterUser) -> AppResult<User> {
        self.check_unique(&data.username, &data.email, None).await?;
        let password = self.hash_password(&data.password)?;
        self.repository
            .users_create(&data.username, &data.email, &password, data.full_name.as_deref(), Role::Pending)
            .await
    }

    /// Create a new user (admin path, role chosen by the caller)
    pub async fn create_user(&self, data: CreateUser) -> AppResult<User> {
        self.check_unique(&data.username, &data.email, None).await?;
        let password = self.hash_password(&data.password)?;
        let role = data.role.unwrap_or(Role::User);
        self.repository
            .users_create(&data.username, &data.email, &password, data.full_name.as_deref(), role)
            .await
    }

    /// Update an existing user
    pub async fn update_user(&self, id: i32, data: UpdateUser) -> AppResult<User> {
        self.repository.users_get_by_id(id).await?;

        if let Some(ref username) = data.username {
            if self.repository.users_username_exists(username, Some(id)).await? {
                return Err(AppError::Conflict("Username already exists".to_string()));
            }
        }
        if let Some(ref email) = data.email {
            if self.repository.users_email_exists(email, Some(id)).await? {
                return Err(AppError::Conflict("Email already exists".to_string()));
            }
        }

        let password = match data.password {
            Some(ref password) => Some(self.hash_password(password)?),
            None => None,
        };

        self.repository.users_update(id, &data, password).await
    }

    /// Update a user's own profile; password change requires the current one
    pub async fn update_profile(&self, user_id: i32, profile: UpdateProfile) -> AppResult<User> {
        let user = self.repository.users_get_by_id(user_id).await?;

        if let Some(ref email) = profile.email {
            if self.repository.users_email_exists(email, Some(user_id)).await? {
                return Err(AppError::Conflict("Email already exists".to_string()));
            }
        }

        if profile.new_password.is_some() {
            let current_password = profile.current_password.as_ref().ok_or_else(|| {
                AppError::Validation("Current password required to change password".to_string())
            })?;
            if !self.verify_password(&user, current_password)? {
                return Err(AppError::Authentication("Current password is incorrect".to_string()));
            }
        }

        let password = match profile.new_password {
            Some(ref new_password) => Some(self.hash_password(new_password)?),
            None => None,
        };

        let update = UpdateUser {
            username: None,
            email: profile.email,
            password: None,
            full_name: profile.full_name,
        };
        self.repository.users_update(user_id, &update, password).await
    }

    /// Change a user's role. Demoting the last admin is refused.
    pub async fn update_role(&self, user_id: i32, role: Role) -> AppResult<User> {
        let user = self.repository.users_get_by_id(user_id).await?;

        if user.role == Role::Admin && role != Role::Admin {
            let admins = self.repository.users_count_by_role(Role::Admin).await?;
            if admins <= 1 {
                return Err(AppError::Conflict(
                    "Cannot demote the last remaining admin".to_string(),
                ));
            }
        }

        self.repository.users_update_role(user_id, role).await
    }

    /// Delete a user. The last admin cannot be deleted, and users holding
    /// borrowed items must return them first.
    pub async fn delete_user(&self, user_id: i32) -> AppResult<()> {
        let user = self.repository.users_get_by_id(user_id).await?;

        if user.role == Role::Admin {
            let admins = self.repository.users_count_by_role(Role::Admin).await?;
            if admins <= 1 {
                return Err(AppError::Conflict(
                    "Cannot delete the last remaining admin".to_string(),
                ));
            }
        }

        let open_borrows = self.repository.items_borrowed_count(user_id).await?;
        if open_borrows > 0 {
            return Err(AppError::Conflict(format!(
                "User still holds {} borrowed item(s)",
                open_borrows
            )));
        }

        self.repository.users_delete(user_id).await
    }

    /// Bootstrap the first admin account on an empty installation
    ///
    /// Runs once at startup. The default credentials are meant to be changed
    /// right after the first login.
    pub async fn ensure_admin(&self) -> AppResult<()> {
        let admins = self.repository.users_count_by_role(Role::Admin).await?;
        if admins > 0 {
            return Ok(());
        }

        let password = self.hash_password("admin123")?;
        let admin = self
            .repository
            .users_create("admin", "admin@toolshed.local", &password, Some("Administrator"), Role::Admin)
            .await?;
        tracing::warn!(
            user_id = admin.id,
            "created default admin account, change its password"
        );
        Ok(())
    }

    async fn check_unique(&self, username: &str, email: &str, exclude_id: Option<i32>) -> AppResult<()> {
        if self.repository.users_username_exists(username, exclude_id).await? {
            return Err(AppError::Conflict("Username already exists".to_string()));
        }
        if self.repository.users_email_exists(email, exclude_id).await? {
            return Err(AppError::Conflict("Email already exists".to_string()));
        }
        Ok(())
    }
}
