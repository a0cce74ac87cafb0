//! Shared authentication state.
//!
//! One `AuthState` is created per process and handed to the `ApiClient` and
//! the view-models behind an `Arc`. Every read and write goes through a
//! single lock. The client snapshots the token when it builds a request, so
//! a logout racing an in-flight request does not change that request's
//! header; only requests built afterwards go out without it.

use std::sync::{PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

#[derive(Debug, Clone, Default)]
struct Credentials {
    token: Option<String>,
    email: Option<String>,
}

#[derive(Debug, Default)]
pub struct AuthState {
    inner: RwLock<Credentials>,
}

impl AuthState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_token(token: impl Into<String>) -> Self {
        let state = Self::new();
        state.set_token(token);
        state
    }

    /// Store the token and user email issued by a successful login.
    pub fn login(&self, token: impl Into<String>, email: impl Into<String>) {
        let mut creds = self.write();
        creds.token = non_empty(token.into());
        creds.email = non_empty(email.into());
    }

    pub fn set_token(&self, token: impl Into<String>) {
        self.write().token = non_empty(token.into());
    }

    /// Forget both the token and the user email.
    pub fn clear_token(&self) {
        let mut creds = self.write();
        creds.token = None;
        creds.email = None;
    }

    pub fn token(&self) -> Option<String> {
        self.read().token.clone()
    }

    pub fn is_logged_in(&self) -> bool {
        self.read().token.is_some()
    }

    pub fn user_email(&self) -> Option<String> {
        self.read().email.clone()
    }

    // The guarded data is plain strings, so a poisoned lock still holds a
    // usable value.
    fn read(&self) -> RwLockReadGuard<'_, Credentials> {
        self.inner.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, Credentials> {
        self.inner.write().unwrap_or_else(PoisonError::into_inner)
    }
}

fn non_empty(value: String) -> Option<String> {
    if value.trim().is_empty() {
        None
    } else {
        Some(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn starts_logged_out() {
        let auth = AuthState::new();
        assert!(!auth.is_logged_in());
        assert_eq!(auth.token(), None);
        assert_eq!(auth.user_email(), None);
    }

    #[test]
    fn login_sets_token_and_email() {
        let auth = AuthState::new();
        auth.login("jwt-123", "ana@example.com");
        assert!(auth.is_logged_in());
        assert_eq!(auth.token().as_deref(), Some("jwt-123"));
        assert_eq!(auth.user_email().as_deref(), Some("ana@example.com"));
    }

    #[test]
    fn clear_token_forgets_everything() {
        let auth = AuthState::new();
        auth.login("jwt-123", "ana@example.com");
        auth.clear_token();
        assert!(!auth.is_logged_in());
        assert_eq!(auth.user_email(), None);
    }

    #[test]
    fn blank_token_counts_as_logged_out() {
        let auth = AuthState::with_token("   ");
        assert!(!auth.is_logged_in());
    }

    #[test]
    fn set_token_keeps_email() {
        let auth = AuthState::new();
        auth.login("a", "ana@example.com");
        auth.set_token("b");
        assert_eq!(auth.token().as_deref(), Some("b"));
        assert_eq!(auth.user_email().as_deref(), Some("ana@example.com"));
    }
}
