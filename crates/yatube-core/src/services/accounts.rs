//! Sign-up and credential checks.

use std::sync::Arc;

use crate::domain::User;
use crate::error::{DomainError, RepoError};
use crate::forms::{FormErrors, SignupForm, SignupInput};
use crate::ports::{PasswordService, UserRepository};

/// Account service backed by the user store and a password hasher.
#[derive(Clone)]
pub struct Accounts {
    users: Arc<dyn UserRepository>,
    passwords: Arc<dyn PasswordService>,
}

impl Accounts {
    pub fn new(users: Arc<dyn UserRepository>, passwords: Arc<dyn PasswordService>) -> Self {
        Self { users, passwords }
    }

    /// Register a new user from a sign-up form.
    pub async fn register(&self, input: &SignupInput) -> Result<User, DomainError> {
        let cleaned = SignupForm::clean(input).map_err(DomainError::Validation)?;

        if self.users.find_by_username(&cleaned.username).await?.is_some() {
            return Err(Self::username_taken());
        }

        let hash = self
            .passwords
            .hash(&cleaned.password)
            .map_err(|e| DomainError::Internal(e.to_string()))?;

        let user = match self.users.create(User::new(cleaned.username, hash)).await {
            Ok(user) => user,
            // Lost a race against another sign-up with the same name.
            Err(RepoError::Duplicate(_)) => return Err(Self::username_taken()),
            Err(e) => return Err(e.into()),
        };

        tracing::info!(username = %user.username, "User registered");
        Ok(user)
    }

    /// Check a username/password pair. Unknown users and wrong passwords fail alike.
    pub async fn authenticate(&self, username: &str, password: &str) -> Result<User, DomainError> {
        let Some(user) = self.users.find_by_username(username.trim()).await? else {
            tracing::debug!(username, "Login for unknown user");
            return Err(DomainError::Unauthorized);
        };

        let valid = self
            .passwords
            .verify(password, &user.password_hash)
            .map_err(|e| DomainError::Internal(e.to_string()))?;

        if !valid {
            tracing::warn!(username = %user.username, "Wrong password");
            return Err(DomainError::Unauthorized);
        }

        Ok(user)
    }

    fn username_taken() -> DomainError {
        let mut errors = FormErrors::default();
        errors.add(
            SignupForm::USERNAME.name,
            "Пользователь с таким именем уже существует.",
        );
        DomainError::Validation(errors)
    }
}
