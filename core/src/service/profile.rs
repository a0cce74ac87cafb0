//! Signed-in user profile and address endpoints.

use tracing::instrument;

use super::{check_status, parse_body, StatusMap};
use crate::client::ApiClient;
use crate::error::ApiError;
use crate::http::{HttpMethod, HttpRequest, HttpResponse};
use crate::types::{AddressUpdateRequest, AddressUpdateResponse, UsersMeResponse};

const USERS_ME: &str = "users/me?populate=*";
const ADDRESSES: &str = "addresses";

#[derive(Debug, Clone)]
pub struct ProfileService {
    client: ApiClient,
}

impl ProfileService {
    pub fn new(client: ApiClient) -> Self {
        Self { client }
    }

    pub fn build_get_users_me(&self) -> HttpRequest {
        self.client.build(HttpMethod::Get, USERS_ME, None)
    }

    pub fn build_update_address(
        &self,
        document_id: &str,
        request: &AddressUpdateRequest,
    ) -> Result<HttpRequest, ApiError> {
        self.client
            .build_json(HttpMethod::Put, &format!("{ADDRESSES}/{document_id}"), request)
    }

    pub fn build_delete_address(&self, document_id: &str) -> HttpRequest {
        self.client
            .build(HttpMethod::Delete, &format!("{ADDRESSES}/{document_id}"), None)
    }

    pub fn parse_get_users_me(&self, response: HttpResponse) -> Result<UsersMeResponse, ApiError> {
        let map = StatusMap::success(&[200]).not_found("User not found");
        parse_body(&response, &map)
    }

    pub fn parse_update_address(
        &self,
        document_id: &str,
        response: HttpResponse,
    ) -> Result<AddressUpdateResponse, ApiError> {
        let map = StatusMap::success(&[200])
            .not_found(address_not_found(document_id))
            .bad_request("Invalid address data");
        parse_body(&response, &map)
    }

    pub fn parse_delete_address(
        &self,
        document_id: &str,
        response: HttpResponse,
    ) -> Result<bool, ApiError> {
        let map = StatusMap::success(&[200, 204]).not_found(address_not_found(document_id));
        check_status(&response, &map).map(|()| true)
    }

    #[instrument(skip(self))]
    pub async fn get_users_me(&self) -> Result<UsersMeResponse, ApiError> {
        let response = self.client.execute(self.build_get_users_me()).await?;
        self.parse_get_users_me(response)
    }

    #[instrument(skip(self, request))]
    pub async fn update_address(
        &self,
        document_id: &str,
        request: &AddressUpdateRequest,
    ) -> Result<AddressUpdateResponse, ApiError> {
        let built = self.build_update_address(document_id, request)?;
        let response = self.client.execute(built).await?;
        self.parse_update_address(document_id, response)
    }

    #[instrument(skip(self))]
    pub async fn delete_address(&self, document_id: &str) -> Result<bool, ApiError> {
        let response = self.client.execute(self.build_delete_address(document_id)).await?;
        self.parse_delete_address(document_id, response)
    }
}

fn address_not_found(document_id: &str) -> String {
    format!("Address with ID {document_id} not found")
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::auth::AuthState;
    use crate::transport::mock::MockTransport;
    use crate::types::AddressData;

    fn service() -> ProfileService {
        ProfileService::new(ApiClient::new(
            "http://localhost:1337/api",
            Arc::new(AuthState::with_token("jwt")),
            Arc::new(MockTransport::new()),
        ))
    }

    #[test]
    fn build_get_users_me_populates_relations() {
        let req = service().build_get_users_me();
        assert_eq!(req.method, HttpMethod::Get);
        assert_eq!(req.path, "http://localhost:1337/api/users/me?populate=*");
        assert_eq!(req.header("authorization"), Some("Bearer jwt"));
    }

    #[test]
    fn build_update_address_wraps_data() {
        let request = AddressUpdateRequest {
            data: AddressData {
                city: "Porto".to_string(),
                ..Default::default()
            },
        };
        let req = service().build_update_address("a9", &request).unwrap();
        assert_eq!(req.method, HttpMethod::Put);
        assert_eq!(req.path, "http://localhost:1337/api/addresses/a9");
        let body: serde_json::Value = serde_json::from_str(req.body.as_deref().unwrap()).unwrap();
        assert_eq!(body["data"]["city"], "Porto");
    }

    #[test]
    fn parse_get_users_me_messages() {
        let s = service();
        assert_eq!(
            s.parse_get_users_me(HttpResponse::new(404, "")).unwrap_err().to_string(),
            "User not found"
        );
        assert_eq!(
            s.parse_get_users_me(HttpResponse::new(401, "")).unwrap_err().to_string(),
            "Unauthorized: Invalid API token"
        );
        assert_eq!(
            s.parse_get_users_me(HttpResponse::new(500, "")).unwrap_err().to_string(),
            "HTTP 500: Internal Server Error"
        );
    }

    #[test]
    fn parse_get_users_me_success() {
        let user = service()
            .parse_get_users_me(HttpResponse::new(
                200,
                r#"{"id":1,"username":"ana","email":"ana@example.com","addresses":[],"adverts":[]}"#,
            ))
            .unwrap();
        assert_eq!(user.username, "ana");
    }

    #[test]
    fn parse_update_address_messages() {
        let s = service();
        assert_eq!(
            s.parse_update_address("a9", HttpResponse::new(404, ""))
                .unwrap_err()
                .to_string(),
            "Address with ID a9 not found"
        );
        assert_eq!(
            s.parse_update_address("a9", HttpResponse::new(400, ""))
                .unwrap_err()
                .to_string(),
            "Bad request: Invalid address data"
        );
    }

    #[test]
    fn parse_delete_address_yields_true() {
        let s = service();
        assert_eq!(s.parse_delete_address("a9", HttpResponse::new(204, "")), Ok(true));
        assert_eq!(s.parse_delete_address("a9", HttpResponse::new(200, "{}")), Ok(true));
    }
}
