//! Retry handling for spreadsheet writes

pub mod retry;

pub use retry::{RetryConfig, RetryPolicy, RetryableError, TransientFailure};
