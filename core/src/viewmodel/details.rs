use std::sync::Arc;

use futures::StreamExt;

use super::{ModalState, Observable, Scope, Slot};
use crate::config::TimingConfig;
use crate::repository::PostRepository;
use crate::state::RequestState;
use crate::types::Post;

/// State behind the single-post screen: the post, its edit modal and the
/// navigate-home signal raised after a delete.
pub struct DetailsViewModel {
    inner: Arc<Inner>,
}

struct Inner {
    repository: Arc<dyn PostRepository>,
    timing: TimingConfig,
    post_id: Option<u64>,
    post: Observable<RequestState<Post>>,
    is_loading: Observable<bool>,
    error_message: Observable<Option<String>>,
    modal: Observable<ModalState>,
    navigate_home: Observable<bool>,
    loader: Slot,
    scope: Scope,
}

fn parse_post_id(raw: Option<&str>) -> Result<u64, &'static str> {
    match raw.map(str::trim) {
        None | Some("") => Err("No post ID provided"),
        Some(raw) => raw.parse().map_err(|_| "Invalid post ID format"),
    }
}

impl DetailsViewModel {
    /// `post_id` is the raw route argument. A missing or non-numeric id puts
    /// the screen straight into an error state without touching the network.
    pub fn new(
        post_id: Option<&str>,
        repository: Arc<dyn PostRepository>,
        timing: TimingConfig,
    ) -> Self {
        let (post_id, seed) = match parse_post_id(post_id) {
            Ok(id) => (Some(id), RequestState::Loading),
            Err(message) => (None, RequestState::Error(message.to_string())),
        };
        let inner = Arc::new(Inner {
            repository,
            timing,
            post_id,
            post: Observable::new(seed),
            is_loading: Observable::new(false),
            error_message: Observable::new(None),
            modal: Observable::new(ModalState::default()),
            navigate_home: Observable::new(false),
            loader: Slot::new(),
            scope: Scope::new(),
        });
        inner.load_post();
        Self { inner }
    }

    pub fn post_id(&self) -> Option<u64> {
        self.inner.post_id
    }

    pub fn post(&self) -> &Observable<RequestState<Post>> {
        &self.inner.post
    }

    /// True while a delete is in flight.
    pub fn is_loading(&self) -> &Observable<bool> {
        &self.inner.is_loading
    }

    pub fn error_message(&self) -> &Observable<Option<String>> {
        &self.inner.error_message
    }

    pub fn modal(&self) -> &Observable<ModalState> {
        &self.inner.modal
    }

    pub fn navigate_home(&self) -> &Observable<bool> {
        &self.inner.navigate_home
    }

    /// Drop the current fetch and start a fresh one.
    pub fn retry(&self) {
        self.inner.retry();
    }

    pub fn clear_error(&self) {
        self.inner.error_message.set(None);
    }

    pub fn update_post(&self, title: impl Into<String>) {
        let Some(id) = self.inner.post_id else {
            return;
        };
        let inner = self.inner.clone();
        let title = title.into();
        inner.modal.update(|modal| {
            modal.loading = true;
            modal.message = None;
        });
        self.inner.scope.spawn(async move {
            let mut states = inner.repository.update_post(id, title);
            while let Some(state) = states.next().await {
                match state {
                    RequestState::Loading => inner.modal.update(|modal| modal.loading = true),
                    RequestState::Success(_) => {
                        inner.modal.update(|modal| {
                            modal.loading = false;
                            modal.message = Some("Post updated successfully!".to_string());
                        });
                        inner.retry();
                        let closing = inner.clone();
                        let delay = inner.timing.modal_close_delay();
                        inner.scope.schedule(delay, move || closing.hide_modal());
                    }
                    RequestState::Error(message) => inner.modal.update(|modal| {
                        modal.loading = false;
                        modal.message = Some(format!("Failed to update post: {message}"));
                    }),
                    RequestState::Idle => inner.modal.update(|modal| modal.loading = false),
                }
            }
        });
    }

    /// Delete the post. After the confirmation has been visible for the
    /// configured delay, the navigate-home signal is raised once.
    pub fn delete_post(&self) {
        let Some(id) = self.inner.post_id else {
            return;
        };
        let inner = self.inner.clone();
        inner.is_loading.set(true);
        inner.error_message.set(None);
        self.inner.scope.spawn(async move {
            let mut states = inner.repository.delete_post(id);
            while let Some(state) = states.next().await {
                match state {
                    RequestState::Idle | RequestState::Loading => {}
                    RequestState::Success(()) => {
                        inner.is_loading.set(false);
                        inner.modal.update(|modal| {
                            modal.message = Some("Post deleted successfully!".to_string());
                        });
                        let leaving = inner.clone();
                        inner.scope.schedule(inner.timing.navigate_delay(), move || {
                            leaving.navigate_home.set(true);
                        });
                    }
                    RequestState::Error(message) => {
                        inner.is_loading.set(false);
                        inner
                            .error_message
                            .set(Some(format!("Failed to delete post: {message}")));
                    }
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

    /// Consume the navigate-home signal; later calls read `false` until the
    /// next successful delete.
    pub fn take_navigate_home(&self) -> bool {
        self.inner.navigate_home.replace(false)
    }

    pub fn on_navigated_to_home(&self) {
        self.inner.navigate_home.set(false);
    }
}

impl Inner {
    fn load_post(self: &Arc<Self>) {
        let Some(id) = self.post_id else {
            return;
        };
        self.post.set(RequestState::Loading);
        let inner = self.clone();
        self.loader.replace(&self.scope, async move {
            let mut states = inner.repository.get_post_by_id(id);
            while let Some(state) = states.next().await {
                inner.post.set(state.map(|single| single.data));
            }
        });
    }

    fn retry(self: &Arc<Self>) {
        self.load_post();
        self.error_message.set(None);
    }

    fn hide_modal(&self) {
        self.modal.update(|modal| {
            modal.visible = false;
            modal.message = None;
        });
    }
}

impl Drop for DetailsViewModel {
    fn drop(&mut self) {
        self.inner.scope.cancel();
    }
}
