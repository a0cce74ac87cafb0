use std::sync::Arc;

use futures::StreamExt;
use tracing::debug;

use super::{mirror, ModalState, Observable, Scope, Slot};
use crate::auth::AuthState;
use crate::config::TimingConfig;
use crate::repository::PostRepository;
use crate::state::RequestState;
use crate::types::PostsResponse;

/// State behind the posts list screen, including its create-post modal.
pub struct PostsViewModel {
    inner: Arc<Inner>,
}

struct Inner {
    repository: Arc<dyn PostRepository>,
    auth: Arc<AuthState>,
    timing: TimingConfig,
    posts: Observable<RequestState<PostsResponse>>,
    modal: Observable<ModalState>,
    is_logged_in: Observable<bool>,
    user_email: Observable<Option<String>>,
    loader: Slot,
    scope: Scope,
}

impl PostsViewModel {
    /// Start loading the list immediately.
    pub fn new(
        repository: Arc<dyn PostRepository>,
        auth: Arc<AuthState>,
        timing: TimingConfig,
    ) -> Self {
        let inner = Arc::new(Inner {
            is_logged_in: Observable::new(auth.is_logged_in()),
            user_email: Observable::new(auth.user_email()),
            repository,
            auth,
            timing,
            posts: Observable::new(RequestState::Loading),
            modal: Observable::new(ModalState::default()),
            loader: Slot::new(),
            scope: Scope::new(),
        });
        inner.refresh_posts();
        Self { inner }
    }

    pub fn posts(&self) -> &Observable<RequestState<PostsResponse>> {
        &self.inner.posts
    }

    pub fn modal(&self) -> &Observable<ModalState> {
        &self.inner.modal
    }

    pub fn is_logged_in(&self) -> &Observable<bool> {
        &self.inner.is_logged_in
    }

    pub fn user_email(&self) -> &Observable<Option<String>> {
        &self.inner.user_email
    }

    pub fn refresh_posts(&self) {
        self.inner.refresh_posts();
    }

    /// Submit a new post from the modal.
    ///
    /// On success the list is refreshed and the modal closes after the
    /// configured delay. On failure the modal stays open with the cause.
    pub fn create_post(&self, title: impl Into<String>) {
        let inner = self.inner.clone();
        let title = title.into();
        inner.modal.update(|modal| {
            modal.loading = true;
            modal.message = None;
        });
        self.inner.scope.spawn(async move {
            let mut states = inner.repository.create_post(title);
            while let Some(state) = states.next().await {
                match state {
                    RequestState::Loading => inner.modal.update(|modal| modal.loading = true),
                    RequestState::Success(created) => {
                        debug!(id = created.data.id, "post created");
                        inner.modal.update(|modal| {
                            modal.loading = false;
                            modal.message = Some("Post created successfully!".to_string());
                        });
                        inner.refresh_posts();
                        let closing = inner.clone();
                        let delay = inner.timing.modal_close_delay();
                        inner.scope.schedule(delay, move || closing.hide_modal());
                    }
                    RequestState::Error(message) => inner.modal.update(|modal| {
                        modal.loading = false;
                        modal.message = Some(format!("Failed to create post: {message}"));
                    }),
                    RequestState::Idle => inner.modal.update(|modal| modal.loading = false),
                }
            }
        });
    }

    pub fn show_modal(&self) {
        self.inner.modal.update(|modal| {
            modal.visible = true;
            modal.message = None;
        });
    }

    pub fn hide_modal(&self) {
        self.inner.hide_modal();
    }

    /// Forget the session and reload the public list.
    pub fn logout(&self) {
        self.inner.auth.clear_token();
        self.inner.is_logged_in.set(false);
        self.inner.user_email.set(None);
        self.inner.refresh_posts();
    }

    /// Re-read the login flags after the session changed elsewhere.
    pub fn update_auth_state(&self) {
        self.inner.is_logged_in.set(self.inner.auth.is_logged_in());
        self.inner.user_email.set(self.inner.auth.user_email());
    }
}

impl Inner {
    fn refresh_posts(self: &Arc<Self>) {
        self.posts.set(RequestState::Loading);
        let inner = self.clone();
        self.loader.replace(&self.scope, async move {
            mirror(inner.repository.get_posts(), &inner.posts).await;
        });
    }

    fn hide_modal(&self) {
        self.modal.update(|modal| {
            modal.visible = false;
            modal.message = None;
        });
    }
}

impl Drop for PostsViewModel {
    fn drop(&mut self) {
        self.inner.scope.cancel();
    }
}
