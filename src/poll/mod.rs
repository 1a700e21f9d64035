//! # Sources and calling conventions.
//!
//! - [`Mode`]: the three calling conventions a source may use.
//! - [`PollSource`]: the trait the scheduler polls.
//! - [`PollFn`]: closure-backed source covering all three modes.
//! - [`Completion`]: settlement handle for callback-mode sources.

mod completion;
mod mode;
mod poll_fn;
mod source;

pub use completion::Completion;
pub use mode::Mode;
pub use poll_fn::{BoxPollFuture, PollFn};
pub use source::{PollSource, SourceRef};
