//! # Poll source abstraction.
//!
//! Anything the scheduler can poll implements [`PollSource`]. One attempt is
//! one call to [`attempt`](PollSource::attempt); the scheduler guarantees
//! attempts never overlap, so implementations may keep interior state without
//! worrying about concurrent entry.
//!
//! Most sources are built from closures via [`PollFn`](crate::PollFn); the
//! trait exists so hand-written sources plug into the same machinery.

use std::sync::Arc;

use async_trait::async_trait;

use crate::error::PollError;
use crate::poll::Mode;

/// Shared reference to a poll source.
pub type SourceRef<T> = Arc<dyn PollSource<T>>;

/// A pollable producer of `T`.
#[async_trait]
pub trait PollSource<T>: Send + Sync + 'static
where
    T: Send + 'static,
{
    /// Stable name used in events and log lines.
    fn name(&self) -> &str;

    /// The calling convention this source was built with.
    fn mode(&self) -> Mode;

    /// Runs one attempt to completion.
    ///
    /// Called at most once at a time. A panic inside is caught at the poll
    /// boundary and reported as [`PollError::Panicked`].
    async fn attempt(&self) -> Result<T, PollError>;
}

#[async_trait]
impl<T> PollSource<T> for Arc<dyn PollSource<T>>
where
    T: Send + 'static,
{
    fn name(&self) -> &str {
        (**self).name()
    }

    fn mode(&self) -> Mode {
        (**self).mode()
    }

    async fn attempt(&self) -> Result<T, PollError> {
        (**self).attempt().await
    }
}
