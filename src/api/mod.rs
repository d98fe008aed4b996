//! Google Sheets Web API access
//!
//! A thin REST client for the handful of Sheets v4 calls the store needs,
//! plus the retry policy used around writes.

pub mod client;
pub mod resilience;

pub use client::{DEFAULT_API_BASE, SheetsApiError, SheetsClient};
pub use resilience::{RetryConfig, RetryPolicy, RetryableError, TransientFailure};
