//! # Closure-backed poll sources.
//!
//! [`PollFn`] wraps a closure in one of the three calling conventions and
//! presents it as a uniform [`PollSource`]. Fixed call arguments are closure
//! captures: whatever the closure closes over is replayed on every attempt.
//!
//! ```
//! use pollify::{Mode, PollFn, PollSource};
//!
//! let host = "db-1".to_string();
//! let source = PollFn::returning("db-check", move || Ok(format!("ping {host}")));
//! assert_eq!(source.mode(), Mode::Return);
//! ```

use std::borrow::Cow;
use std::future::Future;
use std::pin::Pin;

use async_trait::async_trait;

use crate::error::PollError;
use crate::poll::{Completion, Mode, PollSource, SourceRef};

/// Boxed future produced by a promise-mode closure.
pub type BoxPollFuture<T> = Pin<Box<dyn Future<Output = Result<T, PollError>> + Send>>;

type ReturnFn<T> = Box<dyn Fn() -> Result<T, PollError> + Send + Sync>;
type CallbackFn<T> = Box<dyn Fn(Completion<T>) + Send + Sync>;
type PromiseFn<T> = Box<dyn Fn() -> BoxPollFuture<T> + Send + Sync>;

/// The normalized shape of one calling convention.
enum Adapter<T> {
    Return(ReturnFn<T>),
    Callback(CallbackFn<T>),
    Promise(PromiseFn<T>),
}

/// A poll source built from a closure.
pub struct PollFn<T> {
    name: Cow<'static, str>,
    adapter: Adapter<T>,
}

impl<T> PollFn<T>
where
    T: Send + 'static,
{
    /// Wraps a plain function: the attempt is the returned value.
    pub fn returning<F>(name: impl Into<Cow<'static, str>>, f: F) -> Self
    where
        F: Fn() -> Result<T, PollError> + Send + Sync + 'static,
    {
        Self { name: name.into(), adapter: Adapter::Return(Box::new(f)) }
    }

    /// Wraps a callback function: the attempt settles when the closure (or
    /// whatever it handed the [`Completion`] to) resolves or rejects it.
    pub fn callback<F>(name: impl Into<Cow<'static, str>>, f: F) -> Self
    where
        F: Fn(Completion<T>) + Send + Sync + 'static,
    {
        Self { name: name.into(), adapter: Adapter::Callback(Box::new(f)) }
    }

    /// Wraps a future-returning function: the attempt is the awaited output.
    pub fn promise<F, Fut>(name: impl Into<Cow<'static, str>>, f: F) -> Self
    where
        F: Fn() -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<T, PollError>> + Send + 'static,
    {
        Self {
            name: name.into(),
            adapter: Adapter::Promise(Box::new(move || Box::pin(f()))),
        }
    }

    /// Moves the source behind a shared reference.
    pub fn arc(self) -> SourceRef<T> {
        std::sync::Arc::new(self)
    }
}

#[async_trait]
impl<T> PollSource<T> for PollFn<T>
where
    T: Send + 'static,
{
    fn name(&self) -> &str {
        &self.name
    }

    fn mode(&self) -> Mode {
        match &self.adapter {
            Adapter::Return(_) => Mode::Return,
            Adapter::Callback(_) => Mode::Callback,
            Adapter::Promise(_) => Mode::Promise,
        }
    }

    async fn attempt(&self) -> Result<T, PollError> {
        match &self.adapter {
            Adapter::Return(f) => f(),
            Adapter::Callback(f) => {
                let (completion, settled) = Completion::new();
                f(completion);
                match settled.await {
                    Ok(result) => result,
                    // The handle went away without resolve/reject.
                    Err(_) => Err(PollError::CompletionDropped),
                }
            }
            Adapter::Promise(f) => f().await,
        }
    }
}
