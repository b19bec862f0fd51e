//! Single-flight write operations.
//!
//! A [`Mutation`] wraps one server write. While a run is pending, further
//! calls are rejected without issuing a request. On resolution the state
//! is recorded, the matching callback runs, and on success the declared
//! cache keys are invalidated. Failed runs invalidate nothing and are
//! never retried.

use std::fmt;
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

use parking_lot::Mutex;
use thiserror::Error;

use crate::notify::Toasts;
use crate::query::cache::QueryClient;
use crate::query::key::KeyFilter;

type RunFn<In, Out> =
    Arc<dyn Fn(In) -> Pin<Box<dyn Future<Output = Result<Out, String>> + Send>> + Send + Sync>;
type SuccessHook<Out> = Arc<dyn Fn(&Out) + Send + Sync>;
type ErrorHook = Arc<dyn Fn(&str) + Send + Sync>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MutationStatus {
    Idle,
    Pending,
    Success,
    Error,
}

/// Observable state of a mutation.
#[derive(Debug, Clone, PartialEq)]
pub struct MutationState {
    pub status: MutationStatus,
    /// Present exactly when `status` is [`MutationStatus::Error`].
    pub error: Option<String>,
}

impl MutationState {
    fn idle() -> Self {
        Self {
            status: MutationStatus::Idle,
            error: None,
        }
    }

    pub fn is_pending(&self) -> bool {
        self.status == MutationStatus::Pending
    }
}

#[derive(Debug, Error)]
pub enum MutationError {
    /// A run is already in flight; this call was dropped without a request.
    #[error("operation already in progress")]
    Busy,
    #[error("{0}")]
    Failed(String),
}

struct MutationInner<In, Out> {
    run: RunFn<In, Out>,
    state: Mutex<MutationState>,
    on_success: Option<SuccessHook<Out>>,
    on_error: Option<ErrorHook>,
    invalidates: Vec<KeyFilter>,
    queries: QueryClient,
    toasts: Toasts,
    success_toast: Option<String>,
}

/// Handle to one write operation. Cheap to clone; clones share state,
/// so the single-flight guard holds across all of them.
pub struct Mutation<In, Out> {
    inner: Arc<MutationInner<In, Out>>,
}

impl<In, Out> Clone for Mutation<In, Out> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<In, Out> Mutation<In, Out>
where
    In: Send + 'static,
    Out: Send + 'static,
{
    pub fn builder<F, Fut, E>(
        queries: QueryClient,
        toasts: Toasts,
        run: F,
    ) -> MutationBuilder<In, Out>
    where
        F: Fn(In) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<Out, E>> + Send + 'static,
        E: fmt::Display,
    {
        let run: RunFn<In, Out> = Arc::new(move |input| {
            let fut = run(input);
            Box::pin(async move { fut.await.map_err(|e| e.to_string()) })
        });
        MutationBuilder {
            run,
            queries,
            toasts,
            invalidates: Vec::new(),
            on_success: None,
            on_error: None,
            success_toast: None,
        }
    }

    /// Run the write. Rejected with [`MutationError::Busy`] when a run is
    /// already pending; the server sees nothing in that case.
    ///
    /// On success: state flips to Success, `on_success` runs, declared
    /// keys are invalidated, then the optional success toast fires. On
    /// failure: state records the message, `on_error` runs, an error
    /// toast fires, and no invalidation happens.
    pub async fn mutate(&self, input: In) -> Result<Out, MutationError> {
        {
            let mut state = self.inner.state.lock();
            if state.status == MutationStatus::Pending {
                tracing::debug!("mutation already pending, rejecting call");
                return Err(MutationError::Busy);
            }
            state.status = MutationStatus::Pending;
            state.error = None;
        }

        match (self.inner.run)(input).await {
            Ok(out) => {
                {
                    let mut state = self.inner.state.lock();
                    state.status = MutationStatus::Success;
                    state.error = None;
                }
                if let Some(hook) = &self.inner.on_success {
                    hook(&out);
                }
                if !self.inner.invalidates.is_empty() {
                    self.inner.queries.invalidate(&self.inner.invalidates);
                }
                if let Some(text) = &self.inner.success_toast {
                    self.inner.toasts.success(text.clone());
                }
                Ok(out)
            }
            Err(message) => {
                {
                    let mut state = self.inner.state.lock();
                    state.status = MutationStatus::Error;
                    state.error = Some(message.clone());
                }
                if let Some(hook) = &self.inner.on_error {
                    hook(&message);
                }
                self.inner.toasts.error(message.clone());
                Err(MutationError::Failed(message))
            }
        }
    }

    pub fn state(&self) -> MutationState {
        self.inner.state.lock().clone()
    }

    pub fn is_pending(&self) -> bool {
        self.state().is_pending()
    }

    /// Back to Idle, forgetting any recorded outcome.
    pub fn reset(&self) {
        *self.inner.state.lock() = MutationState::idle();
    }
}

pub struct MutationBuilder<In, Out> {
    run: RunFn<In, Out>,
    queries: QueryClient,
    toasts: Toasts,
    invalidates: Vec<KeyFilter>,
    on_success: Option<SuccessHook<Out>>,
    on_error: Option<ErrorHook>,
    success_toast: Option<String>,
}

impl<In, Out> MutationBuilder<In, Out> {
    /// Invalidate these keys after every successful run.
    pub fn invalidate(mut self, filter: KeyFilter) -> Self {
        self.invalidates.push(filter);
        self
    }

    /// Runs after a successful write, before invalidation.
    pub fn on_success(mut self, hook: impl Fn(&Out) + Send + Sync + 'static) -> Self {
        self.on_success = Some(Arc::new(hook));
        self
    }

    /// Runs after a failed write with the normalized message.
    pub fn on_error(mut self, hook: impl Fn(&str) + Send + Sync + 'static) -> Self {
        self.on_error = Some(Arc::new(hook));
        self
    }

    pub fn success_toast(mut self, text: impl Into<String>) -> Self {
        self.success_toast = Some(text.into());
        self
    }

    pub fn build(self) -> Mutation<In, Out> {
        Mutation {
            inner: Arc::new(MutationInner {
                run: self.run,
                state: Mutex::new(MutationState::idle()),
                on_success: self.on_success,
                on_error: self.on_error,
                invalidates: self.invalidates,
                queries: self.queries,
                toasts: self.toasts,
                success_toast: self.success_toast,
            }),
        }
    }
}
