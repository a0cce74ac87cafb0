use std::sync::Arc;

use super::{mirror, Observable, Scope};
use crate::repository::{AuthRepository, PostRepository};
use crate::state::RequestState;
use crate::types::PostsResponse;

/// Landing screen: who is signed in, and the latest posts.
pub struct HomeViewModel {
    customer: Arc<Observable<RequestState<String>>>,
    user_email: Observable<Option<String>>,
    auth: Arc<dyn AuthRepository>,
    posts: Arc<Observable<RequestState<PostsResponse>>>,
    scope: Scope,
}

impl HomeViewModel {
    pub fn new(auth: Arc<dyn AuthRepository>, posts: Arc<dyn PostRepository>) -> Self {
        let vm = Self {
            customer: Arc::new(Observable::new(RequestState::Loading)),
            user_email: Observable::new(auth.current_user_email()),
            auth: auth.clone(),
            posts: Arc::new(Observable::new(RequestState::Loading)),
            scope: Scope::new(),
        };

        let customer = vm.customer.clone();
        let customer_states = auth.read_customer();
        vm.scope.spawn(async move { mirror(customer_states, &customer).await });

        let target = vm.posts.clone();
        let post_states = posts.get_posts();
        vm.scope.spawn(async move { mirror(post_states, &target).await });
        vm
    }

    pub fn customer(&self) -> &Observable<RequestState<String>> {
        &self.customer
    }

    /// The signed-in email, read synchronously from the session.
    pub fn user_email(&self) -> &Observable<Option<String>> {
        &self.user_email
    }

    pub fn posts(&self) -> &Observable<RequestState<PostsResponse>> {
        &self.posts
    }

    /// Re-read the session after a login or logout elsewhere.
    pub fn update_auth_state(&self) {
        self.user_email.set(self.auth.current_user_email());
    }
}

impl Drop for HomeViewModel {
    fn drop(&mut self) {
        self.scope.cancel();
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::*;
    use crate::auth::AuthState;
    use crate::client::ApiClient;
    use crate::http::HttpMethod;
    use crate::repository::{AuthRepositoryImpl, PostRepositoryImpl};
    use crate::service::PostsService;
    use crate::transport::mock::MockTransport;

    #[tokio::test(start_paused = true)]
    async fn customer_and_posts_resolve_independently() {
        let mock = Arc::new(MockTransport::new());
        mock.hang(HttpMethod::Get, "/api/posts");
        let auth = Arc::new(AuthState::new());
        auth.login("jwt", "ana@example.com");
        let client = ApiClient::new("http://localhost:1337/api", auth.clone(), mock);
        let vm = HomeViewModel::new(
            Arc::new(AuthRepositoryImpl::new(auth.clone())),
            Arc::new(PostRepositoryImpl::new(PostsService::new(client))),
        );
        assert!(vm.customer().get().is_loading());
        assert_eq!(vm.user_email().get().as_deref(), Some("ana@example.com"));

        tokio::time::sleep(Duration::from_secs(1)).await;
        assert_eq!(
            vm.customer().get(),
            RequestState::Success("ana@example.com".to_string())
        );
        assert!(vm.posts().get().is_loading());

        auth.clear_token();
        vm.update_auth_state();
        assert_eq!(vm.user_email().get(), None);
    }
}
