//! View-model layer: per-screen presentation state.
//!
//! A view-model mirrors repository sequences into [`Observable`] holders and
//! owns UI-only state such as modal visibility and navigation signals. All of
//! its background work runs on a [`Scope`] that is cancelled when the
//! view-model is dropped, so nothing mutates state after teardown.
//!
//! View-models spawn onto the ambient tokio runtime and must be created and
//! driven from inside one.

pub mod details;
pub mod home;
pub mod posts;
pub mod profile;

pub use details::DetailsViewModel;
pub use home::HomeViewModel;
pub use posts::PostsViewModel;
pub use profile::ProfileViewModel;

use std::future::Future;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use futures::StreamExt;
use tokio::runtime::Handle;
use tokio::sync::watch;
use tokio::task::AbortHandle;
use tracing::warn;

use crate::state::{RequestState, RequestStream};

/// Latest-value holder observed by the UI.
///
/// Readers always see a value: holders are seeded at construction and only
/// ever replaced wholesale.
#[derive(Debug)]
pub struct Observable<T> {
    tx: watch::Sender<T>,
}

impl<T: Clone> Observable<T> {
    pub fn new(initial: T) -> Self {
        let (tx, _rx) = watch::channel(initial);
        Self { tx }
    }

    pub fn get(&self) -> T {
        self.tx.borrow().clone()
    }

    /// Receiver that is notified on every change after subscribing.
    pub fn subscribe(&self) -> watch::Receiver<T> {
        self.tx.subscribe()
    }

    pub(crate) fn set(&self, value: T) {
        self.tx.send_replace(value);
    }

    pub(crate) fn update(&self, f: impl FnOnce(&mut T)) {
        self.tx.send_modify(f);
    }

    /// Swap in `value` and return what was there.
    pub(crate) fn replace(&self, value: T) -> T {
        self.tx.send_replace(value)
    }
}

/// Modal dialog state shared by the screens that edit a post.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ModalState {
    pub visible: bool,
    pub loading: bool,
    pub message: Option<String>,
}

/// Lifecycle-owned set of background tasks.
///
/// Once cancelled, every tracked task is aborted and further spawns are
/// refused.
#[derive(Debug, Default)]
pub struct Scope {
    tasks: Mutex<Vec<AbortHandle>>,
    cancelled: AtomicBool,
}

impl Scope {
    pub fn new() -> Self {
        Self::default()
    }

    fn tasks(&self) -> MutexGuard<'_, Vec<AbortHandle>> {
        self.tasks.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::SeqCst)
    }

    /// Run `task` on the current runtime, tied to this scope.
    ///
    /// Returns `None` when the scope is already cancelled or no runtime is
    /// available.
    pub fn spawn<F>(&self, task: F) -> Option<AbortHandle>
    where
        F: Future<Output = ()> + Send + 'static,
    {
        if self.is_cancelled() {
            return None;
        }
        let Ok(handle) = Handle::try_current() else {
            warn!("no tokio runtime, dropping view-model task");
            return None;
        };
        let abort = handle.spawn(task).abort_handle();
        let mut tasks = self.tasks();
        tasks.retain(|task| !task.is_finished());
        tasks.push(abort.clone());
        Some(abort)
    }

    /// Run `f` once after `delay`, unless the scope is cancelled first.
    pub fn schedule<F>(&self, delay: Duration, f: F) -> Option<AbortHandle>
    where
        F: FnOnce() + Send + 'static,
    {
        self.spawn(async move {
            tokio::time::sleep(delay).await;
            f();
        })
    }

    pub fn cancel(&self) {
        self.cancelled.store(true, Ordering::SeqCst);
        for task in self.tasks().drain(..) {
            task.abort();
        }
    }
}

/// A restartable subscription: starting a new one aborts the previous.
#[derive(Debug, Default)]
pub struct Slot {
    current: Mutex<Option<AbortHandle>>,
}

impl Slot {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn replace<F>(&self, scope: &Scope, task: F)
    where
        F: Future<Output = ()> + Send + 'static,
    {
        let mut current = self.current.lock().unwrap_or_else(PoisonError::into_inner);
        if let Some(previous) = current.take() {
            previous.abort();
        }
        *current = scope.spawn(task);
    }

    pub fn clear(&self) {
        let mut current = self.current.lock().unwrap_or_else(PoisonError::into_inner);
        if let Some(previous) = current.take() {
            previous.abort();
        }
    }
}

/// Forward every state of `stream` into `target`.
pub(crate) async fn mirror<T: Clone>(
    mut stream: RequestStream<T>,
    target: &Observable<RequestState<T>>,
) {
    while let Some(state) = stream.next().await {
        target.set(state);
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::AtomicUsize;
    use std::sync::Arc;

    use super::*;

    #[test]
    fn observable_get_and_replace() {
        let value = Observable::new(1);
        value.set(2);
        assert_eq!(value.get(), 2);
        assert_eq!(value.replace(3), 2);
        value.update(|v| *v += 1);
        assert_eq!(value.get(), 4);
    }

    #[tokio::test]
    async fn subscribers_see_changes() {
        let value = Observable::new("a".to_string());
        let mut rx = value.subscribe();
        value.set("b".to_string());
        rx.changed().await.unwrap();
        assert_eq!(*rx.borrow(), "b");
    }

    #[tokio::test(start_paused = true)]
    async fn schedule_runs_after_delay() {
        let scope = Scope::new();
        let hits = Arc::new(AtomicUsize::new(0));
        let counter = hits.clone();
        scope.schedule(Duration::from_millis(500), move || {
            counter.fetch_add(1, Ordering::SeqCst);
        });

        tokio::time::sleep(Duration::from_millis(499)).await;
        assert_eq!(hits.load(Ordering::SeqCst), 0);
        tokio::time::sleep(Duration::from_millis(2)).await;
        assert_eq!(hits.load(Ordering::SeqCst), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn cancel_aborts_pending_timers() {
        let scope = Scope::new();
        let hits = Arc::new(AtomicUsize::new(0));
        let counter = hits.clone();
        scope.schedule(Duration::from_millis(100), move || {
            counter.fetch_add(1, Ordering::SeqCst);
        });
        scope.cancel();

        tokio::time::sleep(Duration::from_secs(1)).await;
        assert_eq!(hits.load(Ordering::SeqCst), 0);
        assert!(scope.spawn(async {}).is_none());
    }

    #[tokio::test(start_paused = true)]
    async fn slot_replace_aborts_previous_task() {
        let scope = Scope::new();
        let slot = Slot::new();
        let value = Arc::new(Observable::new(0));

        let first = value.clone();
        slot.replace(&scope, async move {
            tokio::time::sleep(Duration::from_millis(100)).await;
            first.set(1);
        });
        let second = value.clone();
        slot.replace(&scope, async move {
            tokio::time::sleep(Duration::from_millis(200)).await;
            second.set(2);
        });

        tokio::time::sleep(Duration::from_millis(150)).await;
        assert_eq!(value.get(), 0);
        tokio::time::sleep(Duration::from_millis(100)).await;
        assert_eq!(value.get(), 2);
    }
}
