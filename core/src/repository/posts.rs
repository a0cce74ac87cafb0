use std::sync::Arc;
use std::time::Duration;

use super::PostRepository;
use crate::service::PostsService;
use crate::state::{request_stream, RequestStream};
use crate::types::{PostsResponse, SinglePostResponse};

/// `PostRepository` over the HTTP `PostsService`.
#[derive(Debug, Clone)]
pub struct PostRepositoryImpl {
    service: Arc<PostsService>,
    min_loading: Duration,
}

impl PostRepositoryImpl {
    pub fn new(service: PostsService) -> Self {
        Self {
            service: Arc::new(service),
            min_loading: Duration::ZERO,
        }
    }

    /// Keep each sequence in `Loading` for at least `delay`.
    pub fn with_min_loading(mut self, delay: Duration) -> Self {
        self.min_loading = delay;
        self
    }
}

impl PostRepository for PostRepositoryImpl {
    fn get_posts(&self) -> RequestStream<PostsResponse> {
        let service = self.service.clone();
        request_stream(self.min_loading, move || async move { service.get_posts().await })
    }

    fn get_post_by_id(&self, id: u64) -> RequestStream<SinglePostResponse> {
        let service = self.service.clone();
        request_stream(self.min_loading, move || async move {
            service.get_post_by_id(id).await
        })
    }

    fn create_post(&self, title: String) -> RequestStream<SinglePostResponse> {
        let service = self.service.clone();
        request_stream(self.min_loading, move || async move {
            service.create_post(&title).await
        })
    }

    fn update_post(&self, id: u64, title: String) -> RequestStream<SinglePostResponse> {
        let service = self.service.clone();
        request_stream(self.min_loading, move || async move {
            service.update_post(id, &title).await
        })
    }

    fn delete_post(&self, id: u64) -> RequestStream<()> {
        let service = self.service.clone();
        request_stream(self.min_loading, move || async move {
            service.delete_post(id).await
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

    const LIST_BODY: &str = r#"{"data":[{"id":1,"attributes":{"title":"Hello","createdAt":"t1","updatedAt":"t1"}}],"meta":{"pagination":{"page":1,"pageCount":1,"pageSize":10,"total":1}}}"#;

    fn repository(mock: Arc<MockTransport>, auth: Arc<AuthState>) -> PostRepositoryImpl {
        let client = ApiClient::new("http://localhost:1337/api", auth, mock);
        PostRepositoryImpl::new(PostsService::new(client))
    }

    #[tokio::test]
    async fn get_posts_yields_loading_then_success() {
        let mock = Arc::new(MockTransport::new());
        mock.respond(HttpMethod::Get, "/api/posts", 200, LIST_BODY);
        let repo = repository(mock, Arc::new(AuthState::new()));

        let states: Vec<_> = repo.get_posts().collect().await;
        assert_eq!(states.len(), 2);
        assert!(states[0].is_loading());
        let posts = states[1].success_data().unwrap();
        assert_eq!(posts.data[0].id, 1);
        assert_eq!(posts.data[0].attributes.title, "Hello");
    }

    #[tokio::test]
    async fn get_post_by_id_404() {
        let mock = Arc::new(MockTransport::new());
        mock.respond(HttpMethod::Get, "/api/posts/99", 404, "");
        let repo = repository(mock, Arc::new(AuthState::new()));

        let states: Vec<_> = repo.get_post_by_id(99).collect().await;
        assert_eq!(
            states,
            vec![
                RequestState::Loading,
                RequestState::Error("Post with ID 99 not found".to_string())
            ]
        );
    }

    #[tokio::test]
    async fn constructing_a_sequence_issues_no_request() {
        let mock = Arc::new(MockTransport::new());
        mock.respond(HttpMethod::Get, "/api/posts", 200, LIST_BODY);
        let repo = repository(mock.clone(), Arc::new(AuthState::new()));

        let stream = repo.get_posts();
        assert_eq!(mock.call_count(HttpMethod::Get, "/api/posts"), 0);
        drop(stream);
        assert_eq!(mock.call_count(HttpMethod::Get, "/api/posts"), 0);
    }

    #[tokio::test]
    async fn each_call_is_an_independent_request() {
        let mock = Arc::new(MockTransport::new());
        mock.respond(HttpMethod::Get, "/api/posts", 500, "")
            .respond(HttpMethod::Get, "/api/posts", 200, LIST_BODY);
        let repo = repository(mock.clone(), Arc::new(AuthState::new()));

        let first: Vec<_> = repo.get_posts().collect().await;
        let second: Vec<_> = repo.get_posts().collect().await;

        assert_eq!(
            first[1],
            RequestState::Error("Server error: Please try again later".to_string())
        );
        assert!(second[0].is_loading());
        assert!(second[1].is_success());
        assert_eq!(mock.call_count(HttpMethod::Get, "/api/posts"), 2);
    }

    #[tokio::test]
    async fn token_is_read_when_the_sequence_runs() {
        let mock = Arc::new(MockTransport::new());
        mock.respond(HttpMethod::Delete, "/api/posts/5", 204, "");
        let auth = Arc::new(AuthState::with_token("before"));
        let repo = repository(mock.clone(), auth.clone());

        let stream = repo.delete_post(5);
        auth.set_token("after");
        let states: Vec<_> = stream.collect().await;

        assert_eq!(states[1], RequestState::Success(()));
        assert_eq!(mock.requests()[0].header("authorization"), Some("Bearer after"));
    }
}
