use std::sync::Arc;
use std::time::Duration;

use super::ProfileRepository;
use crate::service::ProfileService;
use crate::state::{request_stream, RequestStream};
use crate::types::{AddressUpdateRequest, AddressUpdateResponse, UsersMeResponse};

#[derive(Debug, Clone)]
pub struct ProfileRepositoryImpl {
    service: Arc<ProfileService>,
    min_loading: Duration,
}

impl ProfileRepositoryImpl {
    pub fn new(service: ProfileService) -> Self {
        Self {
            service: Arc::new(service),
            min_loading: Duration::ZERO,
        }
    }

    pub fn with_min_loading(mut self, delay: Duration) -> Self {
        self.min_loading = delay;
        self
    }
}

impl ProfileRepository for ProfileRepositoryImpl {
    fn get_users_me(&self) -> RequestStream<UsersMeResponse> {
        let service = self.service.clone();
        request_stream(self.min_loading, move || async move {
            service.get_users_me().await
        })
    }

    fn update_address(
        &self,
        document_id: String,
        request: AddressUpdateRequest,
    ) -> RequestStream<AddressUpdateResponse> {
        let service = self.service.clone();
        request_stream(self.min_loading, move || async move {
            service.update_address(&document_id, &request).await
        })
    }

    fn delete_address(&self, document_id: String) -> RequestStream<bool> {
        let service = self.service.clone();
        request_stream(self.min_loading, move || async move {
            service.delete_address(&document_id).await
        })
    }
}

#[cfg(test)]
mod tests {
    use futures::StreamExt;

    use super::*;
    use crate::auth::AuthState;
    use crate::client::ApiClient;
    use crate::http::HttpMethod;
    use crate::state::RequestState;
    use crate::transport::mock::MockTransport;

    fn repository(mock: Arc<MockTransport>) -> ProfileRepositoryImpl {
        let client = ApiClient::new(
            "http://localhost:1337/api",
            Arc::new(AuthState::with_token("jwt")),
            mock,
        );
        ProfileRepositoryImpl::new(ProfileService::new(client))
    }

    #[tokio::test]
    async fn get_users_me_unauthorized() {
        let mock = Arc::new(MockTransport::new());
        mock.respond(HttpMethod::Get, "/api/users/me", 401, "");
        let states: Vec<_> = repository(mock).get_users_me().collect().await;
        assert_eq!(
            states,
            vec![
                RequestState::Loading,
                RequestState::Error("Unauthorized: Invalid API token".to_string())
            ]
        );
    }

    #[tokio::test]
    async fn delete_address_success_is_true() {
        let mock = Arc::new(MockTransport::new());
        mock.respond(HttpMethod::Delete, "/api/addresses/a9", 204, "");
        let states: Vec<_> = repository(mock)
            .delete_address("a9".to_string())
            .collect()
            .await;
        assert_eq!(states, vec![RequestState::Loading, RequestState::Success(true)]);
    }

    #[tokio::test]
    async fn hung_request_stays_loading() {
        let mock = Arc::new(MockTransport::new());
        mock.hang(HttpMethod::Get, "/api/users/me");
        let mut stream = repository(mock).get_users_me();

        assert_eq!(stream.next().await, Some(RequestState::Loading));
        let next = tokio::time::timeout(Duration::from_millis(50), stream.next()).await;
        assert!(next.is_err(), "terminal state should never arrive");
    }
}
