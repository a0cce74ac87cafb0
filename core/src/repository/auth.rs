use std::sync::Arc;
use std::time::Duration;

use super::AuthRepository;
use crate::auth::AuthState;
use crate::error::ApiError;
use crate::state::{request_stream, RequestStream};

/// Identity of the signed-in customer, read from the shared `AuthState`.
#[derive(Debug, Clone)]
pub struct AuthRepositoryImpl {
    auth: Arc<AuthState>,
}

impl AuthRepositoryImpl {
    pub fn new(auth: Arc<AuthState>) -> Self {
        Self { auth }
    }
}

impl AuthRepository for AuthRepositoryImpl {
    fn current_user_email(&self) -> Option<String> {
        self.auth.user_email()
    }

    fn read_customer(&self) -> RequestStream<String> {
        let auth = self.auth.clone();
        request_stream(Duration::ZERO, move || async move {
            match (auth.is_logged_in(), auth.user_email()) {
                (true, Some(email)) => Ok(email),
                _ => Err(ApiError::NotFound("User is not available.".to_string())),
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use futures::StreamExt;

    use super::*;
    use crate::state::RequestState;

    #[tokio::test]
    async fn logged_in_customer_is_success() {
        let auth = Arc::new(AuthState::new());
        auth.login("jwt", "ana@example.com");
        let states: Vec<_> = AuthRepositoryImpl::new(auth).read_customer().collect().await;
        assert_eq!(
            states,
            vec![
                RequestState::Loading,
                RequestState::Success("ana@example.com".to_string())
            ]
        );
    }

    #[tokio::test]
    async fn customer_is_read_when_polled() {
        let auth = Arc::new(AuthState::new());
        let stream = AuthRepositoryImpl::new(auth.clone()).read_customer();
        auth.login("jwt", "late@example.com");
        let states: Vec<_> = stream.collect().await;
        assert_eq!(states[1], RequestState::Success("late@example.com".to_string()));
    }

    #[tokio::test]
    async fn anonymous_customer_is_error() {
        let repo = AuthRepositoryImpl::new(Arc::new(AuthState::new()));
        let states: Vec<_> = repo.read_customer().collect().await;
        assert_eq!(states[1], RequestState::Error("User is not available.".to_string()));
    }
}
