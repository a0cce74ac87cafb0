use std::sync::Arc;

use futures::StreamExt;

use super::{mirror, Observable, Scope, Slot};
use crate::auth::AuthState;
use crate::repository::ProfileRepository;
use crate::state::{RequestState, RequestStream};
use crate::types::{AddressData, AddressUpdateRequest, UsersMeResponse};

/// State behind the profile screen.
///
/// The profile is only fetched while a session exists; a logged-out screen
/// holds `Idle`.
pub struct ProfileViewModel {
    inner: Arc<Inner>,
}

struct Inner {
    repository: Arc<dyn ProfileRepository>,
    auth: Arc<AuthState>,
    user: Observable<RequestState<UsersMeResponse>>,
    is_logged_in: Observable<bool>,
    user_email: Observable<Option<String>>,
    is_updating_address: Observable<bool>,
    address_message: Observable<Option<String>>,
    loader: Slot,
    scope: Scope,
}

impl ProfileViewModel {
    pub fn new(repository: Arc<dyn ProfileRepository>, auth: Arc<AuthState>) -> Self {
        let logged_in = auth.is_logged_in();
        let seed = if logged_in {
            RequestState::Loading
        } else {
            RequestState::Idle
        };
        let inner = Arc::new(Inner {
            repository,
            user: Observable::new(seed),
            is_logged_in: Observable::new(logged_in),
            user_email: Observable::new(auth.user_email()),
            auth,
            is_updating_address: Observable::new(false),
            address_message: Observable::new(None),
            loader: Slot::new(),
            scope: Scope::new(),
        });
        if logged_in {
            inner.load_profile();
        }
        Self { inner }
    }

    pub fn user(&self) -> &Observable<RequestState<UsersMeResponse>> {
        &self.inner.user
    }

    pub fn is_logged_in(&self) -> &Observable<bool> {
        &self.inner.is_logged_in
    }

    pub fn user_email(&self) -> &Observable<Option<String>> {
        &self.inner.user_email
    }

    pub fn is_updating_address(&self) -> &Observable<bool> {
        &self.inner.is_updating_address
    }

    pub fn address_message(&self) -> &Observable<Option<String>> {
        &self.inner.address_message
    }

    /// Refetch the profile; a no-op while logged out.
    pub fn refresh_profile(&self) {
        self.inner.refresh_profile();
    }

    /// Re-read the session and load the profile if it has never been loaded.
    pub fn update_auth_state(&self) {
        let inner = &self.inner;
        inner.is_logged_in.set(inner.auth.is_logged_in());
        inner.user_email.set(inner.auth.user_email());
        if inner.is_logged_in.get() && inner.user.get().is_idle() {
            inner.load_profile();
        }
    }

    pub fn logout(&self) {
        let inner = &self.inner;
        inner.auth.clear_token();
        inner.loader.clear();
        inner.is_logged_in.set(false);
        inner.user_email.set(None);
        inner.user.set(RequestState::Idle);
    }

    pub fn update_address(&self, document_id: impl Into<String>, address: AddressData) {
        let states = self
            .inner
            .repository
            .update_address(document_id.into(), AddressUpdateRequest { data: address });
        self.inner.run_address_change(
            states,
            "Address updated successfully!",
            "Failed to update address",
        );
    }

    pub fn delete_address(&self, document_id: impl Into<String>) {
        let states = self.inner.repository.delete_address(document_id.into());
        self.inner.run_address_change(
            states,
            "Address deleted successfully!",
            "Failed to delete address",
        );
    }

    pub fn clear_address_message(&self) {
        self.inner.address_message.set(None);
    }
}

impl Inner {
    fn load_profile(self: &Arc<Self>) {
        self.user.set(RequestState::Loading);
        let inner = self.clone();
        self.loader.replace(&self.scope, async move {
            mirror(inner.repository.get_users_me(), &inner.user).await;
        });
    }

    fn refresh_profile(self: &Arc<Self>) {
        if self.is_logged_in.get() {
            self.load_profile();
        }
    }

    /// Drive an address mutation and refresh the profile when it lands.
    fn run_address_change<T: Send + 'static>(
        self: &Arc<Self>,
        mut states: RequestStream<T>,
        success: &'static str,
        failure: &'static str,
    ) {
        self.is_updating_address.set(true);
        self.address_message.set(None);
        let inner = self.clone();
        self.scope.spawn(async move {
            while let Some(state) = states.next().await {
                match state {
                    RequestState::Idle | RequestState::Loading => {}
                    RequestState::Success(_) => {
                        inner.is_updating_address.set(false);
                        inner.address_message.set(Some(success.to_string()));
                        inner.refresh_profile();
                    }
                    RequestState::Error(message) => {
                        inner.is_updating_address.set(false);
                        inner.address_message.set(Some(format!("{failure}: {message}")));
                    }
                }
            }
        });
    }
}

impl Drop for ProfileViewModel {
    fn drop(&mut self) {
        self.inner.scope.cancel();
    }
}
