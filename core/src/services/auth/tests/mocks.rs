//! Shared mocks for authentication service tests

use async_trait::async_trait;
use std::collections::HashMap;

use crate::errors::DomainResult;
use crate::services::auth::{AuthenticatedUser, CredentialValidator};

/// Credential validator backed by a fixed user table
pub struct MockCredentialValidator {
    users: HashMap<(String, String), AuthenticatedUser>,
}

impl MockCredentialValidator {
    pub fn new() -> Self {
        Self {
            users: HashMap::new(),
        }
    }

    /// Registers credentials that will validate successfully
    pub fn accepting(mut self, email: &str, password: &str, id: i64) -> Self {
        self.users.insert(
            (email.to_string(), password.to_string()),
            AuthenticatedUser {
                id,
                email: email.to_string(),
            },
        );
        self
    }
}

#[async_trait]
impl CredentialValidator for MockCredentialValidator {
    async fn validate(
        &self,
        email: &str,
        password: &str,
    ) -> DomainResult<Option<AuthenticatedUser>> {
        Ok(self
            .users
            .get(&(email.to_string(), password.to_string()))
            .cloned())
    }
}
