//! Post endpoints: list, get, create, update, delete.

use tracing::instrument;

use super::{check_status, parse_body, StatusMap};
use crate::client::ApiClient;
use crate::error::ApiError;
use crate::http::{HttpMethod, HttpRequest, HttpResponse};
use crate::types::{CreatePostRequest, PostsResponse, SinglePostResponse};

const POSTS: &str = "posts";
const POPULATE_ALL: &str = "populate=*";

#[derive(Debug, Clone)]
pub struct PostsService {
    client: ApiClient,
}

impl PostsService {
    pub fn new(client: ApiClient) -> Self {
        Self { client }
    }

    pub fn client(&self) -> &ApiClient {
        &self.client
    }

    pub fn build_get_posts(&self) -> HttpRequest {
        self.client
            .build(HttpMethod::Get, &format!("{POSTS}?{POPULATE_ALL}"), None)
    }

    pub fn build_get_post_by_id(&self, id: u64) -> HttpRequest {
        self.client.build(HttpMethod::Get, &format!("{POSTS}/{id}"), None)
    }

    pub fn build_create_post(&self, title: &str) -> Result<HttpRequest, ApiError> {
        self.client
            .build_json(HttpMethod::Post, POSTS, &CreatePostRequest::new(title))
    }

    pub fn build_update_post(&self, id: u64, title: &str) -> Result<HttpRequest, ApiError> {
        self.client.build_json(
            HttpMethod::Put,
            &format!("{POSTS}/{id}"),
            &CreatePostRequest::new(title),
        )
    }

    pub fn build_delete_post(&self, id: u64) -> HttpRequest {
        self.client.build(HttpMethod::Delete, &format!("{POSTS}/{id}"), None)
    }

    pub fn parse_get_posts(&self, response: HttpResponse) -> Result<PostsResponse, ApiError> {
        let map = StatusMap::success(&[200])
            .not_found("Posts endpoint not found")
            .server_error();
        parse_body(&response, &map)
    }

    pub fn parse_get_post_by_id(
        &self,
        id: u64,
        response: HttpResponse,
    ) -> Result<SinglePostResponse, ApiError> {
        let map = StatusMap::success(&[200]).not_found(post_not_found(id));
        parse_body(&response, &map)
    }

    pub fn parse_create_post(
        &self,
        response: HttpResponse,
    ) -> Result<SinglePostResponse, ApiError> {
        let map = StatusMap::success(&[200, 201]).bad_request("Invalid post data");
        parse_body(&response, &map)
    }

    pub fn parse_update_post(
        &self,
        id: u64,
        response: HttpResponse,
    ) -> Result<SinglePostResponse, ApiError> {
        let map = StatusMap::success(&[200])
            .not_found(post_not_found(id))
            .bad_request("Invalid post data");
        parse_body(&response, &map)
    }

    pub fn parse_delete_post(&self, id: u64, response: HttpResponse) -> Result<(), ApiError> {
        let map = StatusMap::success(&[200, 204]).not_found(post_not_found(id));
        check_status(&response, &map)
    }

    #[instrument(skip(self))]
    pub async fn get_posts(&self) -> Result<PostsResponse, ApiError> {
        let response = self.client.execute(self.build_get_posts()).await?;
        self.parse_get_posts(response)
    }

    #[instrument(skip(self))]
    pub async fn get_post_by_id(&self, id: u64) -> Result<SinglePostResponse, ApiError> {
        let response = self.client.execute(self.build_get_post_by_id(id)).await?;
        self.parse_get_post_by_id(id, response)
    }

    #[instrument(skip(self))]
    pub async fn create_post(&self, title: &str) -> Result<SinglePostResponse, ApiError> {
        let response = self.client.execute(self.build_create_post(title)?).await?;
        self.parse_create_post(response)
    }

    #[instrument(skip(self))]
    pub async fn update_post(&self, id: u64, title: &str) -> Result<SinglePostResponse, ApiError> {
        let response = self.client.execute(self.build_update_post(id, title)?).await?;
        self.parse_update_post(id, response)
    }

    #[instrument(skip(self))]
    pub async fn delete_post(&self, id: u64) -> Result<(), ApiError> {
        let response = self.client.execute(self.build_delete_post(id)).await?;
        self.parse_delete_post(id, response)
    }
}

fn post_not_found(id: u64) -> String {
    format!("Post with ID {id} not found")
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::auth::AuthState;
    use crate::transport::mock::MockTransport;

    const POST_BODY: &str =
        r#"{"data":{"id":5,"attributes":{"title":"New","createdAt":"t1","updatedAt":"t2"}}}"#;

    fn service() -> PostsService {
        service_with(Arc::new(MockTransport::new()))
    }

    fn service_with(mock: Arc<MockTransport>) -> PostsService {
        let auth = Arc::new(AuthState::with_token("tok"));
        PostsService::new(ApiClient::new("http://localhost:1337/api", auth, mock))
    }

    #[test]
    fn build_get_posts_includes_populate_query() {
        let req = service().build_get_posts();
        assert_eq!(req.method, HttpMethod::Get);
        assert_eq!(req.path, "http://localhost:1337/api/posts?populate=*");
        assert!(req.body.is_none());
        assert_eq!(req.header("authorization"), Some("Bearer tok"));
    }

    #[test]
    fn build_get_post_by_id_targets_item() {
        let req = service().build_get_post_by_id(99);
        assert_eq!(req.path, "http://localhost:1337/api/posts/99");
    }

    #[test]
    fn build_create_post_wraps_title() {
        let req = service().build_create_post("Hi").unwrap();
        assert_eq!(req.method, HttpMethod::Post);
        assert_eq!(req.path, "http://localhost:1337/api/posts");
        let body: serde_json::Value = serde_json::from_str(req.body.as_deref().unwrap()).unwrap();
        assert_eq!(body, serde_json::json!({"data": {"title": "Hi"}}));
    }

    #[test]
    fn build_update_post_uses_put() {
        let req = service().build_update_post(5, "Edited").unwrap();
        assert_eq!(req.method, HttpMethod::Put);
        assert_eq!(req.path, "http://localhost:1337/api/posts/5");
        let body: serde_json::Value = serde_json::from_str(req.body.as_deref().unwrap()).unwrap();
        assert_eq!(body["data"]["title"], "Edited");
    }

    #[test]
    fn build_delete_post_has_no_body() {
        let req = service().build_delete_post(5);
        assert_eq!(req.method, HttpMethod::Delete);
        assert!(req.body.is_none());
    }

    #[test]
    fn parse_get_posts_status_table() {
        let s = service();
        let msg = |status| {
            s.parse_get_posts(HttpResponse::new(status, ""))
                .unwrap_err()
                .to_string()
        };
        assert_eq!(msg(401), "Unauthorized: Invalid API token");
        assert_eq!(msg(404), "Posts endpoint not found");
        assert_eq!(msg(500), "Server error: Please try again later");
        assert_eq!(msg(503), "HTTP 503: Service Unavailable");
    }

    #[test]
    fn parse_get_post_by_id_not_found_names_the_id() {
        let err = service()
            .parse_get_post_by_id(99, HttpResponse::new(404, ""))
            .unwrap_err();
        assert_eq!(err.to_string(), "Post with ID 99 not found");
    }

    #[test]
    fn parse_get_post_by_id_500_is_generic() {
        let err = service()
            .parse_get_post_by_id(1, HttpResponse::new(500, ""))
            .unwrap_err();
        assert_eq!(err.to_string(), "HTTP 500: Internal Server Error");
    }

    #[test]
    fn parse_create_post_accepts_200_and_201() {
        let s = service();
        for status in [200, 201] {
            let post = s.parse_create_post(HttpResponse::new(status, POST_BODY)).unwrap();
            assert_eq!(post.data.attributes.title, "New");
        }
    }

    #[test]
    fn parse_create_post_bad_request() {
        let err = service()
            .parse_create_post(HttpResponse::new(400, "{}"))
            .unwrap_err();
        assert_eq!(err.to_string(), "Bad request: Invalid post data");
    }

    #[test]
    fn parse_create_post_404_is_generic() {
        let err = service()
            .parse_create_post(HttpResponse::new(404, ""))
            .unwrap_err();
        assert_eq!(err.to_string(), "HTTP 404: Not Found");
    }

    #[test]
    fn parse_delete_post_accepts_204_and_200() {
        let s = service();
        assert!(s.parse_delete_post(5, HttpResponse::new(204, "")).is_ok());
        assert!(s.parse_delete_post(5, HttpResponse::new(200, "{}")).is_ok());
        assert_eq!(
            s.parse_delete_post(5, HttpResponse::new(404, ""))
                .unwrap_err()
                .to_string(),
            "Post with ID 5 not found"
        );
    }

    #[tokio::test]
    async fn create_then_parse_recovers_title() {
        let mock = Arc::new(MockTransport::new());
        mock.respond(HttpMethod::Post, "/api/posts", 201, POST_BODY);
        let s = service_with(mock.clone());

        let created = s.create_post("New").await.unwrap();
        assert_eq!(created.data.attributes.title, "New");

        let sent = &mock.requests()[0];
        let body: CreatePostRequest = serde_json::from_str(sent.body.as_deref().unwrap()).unwrap();
        assert_eq!(body.data.title, created.data.attributes.title);
    }

    #[tokio::test]
    async fn transport_failure_is_network_error() {
        let mock = Arc::new(MockTransport::new());
        mock.fail(HttpMethod::Get, "/api/posts", "connection refused");
        let err = service_with(mock).get_posts().await.unwrap_err();
        assert_eq!(err.to_string(), "Network error: connection refused");
    }
}
