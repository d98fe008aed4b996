//! Retry policies for spreadsheet writes
//!
//! Transient failures (network hiccups, 5xx, 429, a workbook file briefly
//! locked by another program) are retried a bounded number of times.

use anyhow::Result;
use log::{debug, info, warn};
use rand::Rng;
use std::fmt;
use std::future::Future;
use std::time::Duration;

use crate::api::client::SheetsApiError;

/// Configuration for retry behavior
#[derive(Debug, Clone, PartialEq)]
pub struct RetryConfig {
    pub max_attempts: u32,
    pub base_delay: Duration,
    pub max_delay: Duration,
    pub backoff_multiplier: f64,
    pub jitter: bool,
}

impl Default for RetryConfig {
    /// Three attempts, one second apart
    fn default() -> Self {
        Self::fixed(3, Duration::from_secs(1))
    }
}

impl RetryConfig {
    /// Same delay between every attempt
    pub fn fixed(max_attempts: u32, delay: Duration) -> Self {
        Self {
            max_attempts: max_attempts.max(1),
            base_delay: delay,
            max_delay: delay,
            backoff_multiplier: 1.0,
            jitter: false,
        }
    }
}

/// Marker for failures known to be worth another attempt
#[derive(Debug, Clone)]
pub struct TransientFailure(pub String);

impl fmt::Display for TransientFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "transient failure: {}", self.0)
    }
}

impl std::error::Error for TransientFailure {}

/// Types of errors and their retry behavior
#[derive(Debug, Clone, PartialEq)]
pub enum RetryableError {
    /// Network-level errors (connection timeout, DNS, etc)
    Network,
    /// HTTP 5xx server errors
    ServerError(u16),
    /// HTTP 429 Too Many Requests
    RateLimited,
    /// HTTP 408 Request Timeout
    Timeout,
    /// Local file access failed (locked, interrupted)
    Io,
    /// Non-retryable client errors (4xx except 408, 429)
    ClientError(u16),
    /// Authentication/authorization errors
    AuthError,
    /// Unknown/other errors
    Unknown,
}

impl RetryableError {
    pub fn should_retry(&self) -> bool {
        match self {
            RetryableError::Network
            | RetryableError::ServerError(_)
            | RetryableError::RateLimited
            | RetryableError::Timeout
            | RetryableError::Io => true,
            RetryableError::ClientError(_) | RetryableError::AuthError | RetryableError::Unknown => {
                false
            }
        }
    }

    pub fn from_status_code(status: u16) -> Self {
        match status {
            401 | 403 => RetryableError::AuthError,
            408 => RetryableError::Timeout,
            429 => RetryableError::RateLimited,
            400..=499 => RetryableError::ClientError(status),
            500..=599 => RetryableError::ServerError(status),
            _ => RetryableError::Unknown,
        }
    }

    pub fn from_reqwest_error(error: &reqwest::Error) -> Self {
        if error.is_timeout() {
            RetryableError::Timeout
        } else if error.is_connect() || error.is_request() {
            RetryableError::Network
        } else if let Some(status) = error.status() {
            Self::from_status_code(status.as_u16())
        } else {
            RetryableError::Unknown
        }
    }

    /// Classify by the first recognised cause in the error chain
    pub fn classify(error: &anyhow::Error) -> Self {
        for cause in error.chain() {
            if let Some(e) = cause.downcast_ref::<TransientFailure>() {
                debug!("Classified as transient: {}", e);
                return RetryableError::Network;
            }
            if let Some(e) = cause.downcast_ref::<SheetsApiError>() {
                return Self::from_status_code(e.status);
            }
            if let Some(e) = cause.downcast_ref::<reqwest::Error>() {
                return Self::from_reqwest_error(e);
            }
            if cause.downcast_ref::<std::io::Error>().is_some() {
                return RetryableError::Io;
            }
        }
        RetryableError::Unknown
    }
}

#[derive(Debug, Clone)]
pub struct RetryPolicy {
    config: RetryConfig,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::new(RetryConfig::default())
    }
}

impl RetryPolicy {
    pub fn new(config: RetryConfig) -> Self {
        Self { config }
    }

    /// Execute an operation, retrying transient failures
    pub async fn execute<F, Fut, T>(&self, operation: F) -> Result<T>
    where
        F: Fn() -> Fut,
        Fut: Future<Output = Result<T>>,
    {
        let max_attempts = self.config.max_attempts.max(1);
        let mut attempt = 1;

        loop {
            debug!("Executing operation (attempt {}/{})", attempt, max_attempts);

            match operation().await {
                Ok(result) => {
                    if attempt > 1 {
                        info!("Operation succeeded after {} attempts", attempt);
                    }
                    return Ok(result);
                }
                Err(error) => {
                    let should_retry = RetryableError::classify(&error).should_retry();

                    if !should_retry || attempt >= max_attempts {
                        warn!(
                            "Operation failed permanently on attempt {} (should_retry: {}): {:#}",
                            attempt, should_retry, error
                        );
                        return Err(error);
                    }

                    warn!("Operation failed on attempt {} (retryable): {:#}", attempt, error);

                    let delay = self.calculate_delay(attempt);
                    debug!("Waiting {:?} before retry", delay);
                    tokio::time::sleep(delay).await;
                    attempt += 1;
                }
            }
        }
    }

    fn calculate_delay(&self, attempt: u32) -> Duration {
        let delay_ms = (self.config.base_delay.as_millis() as f64)
            * self.config.backoff_multiplier.powi(attempt as i32 - 1);

        let mut delay = Duration::from_millis(delay_ms as u64);

        if delay > self.config.max_delay {
            delay = self.config.max_delay;
        }

        if self.config.jitter {
            let jitter_factor = rand::thread_rng().gen_range(0.5..=1.5);
            let jittered_ms = (delay.as_millis() as f64 * jitter_factor) as u64;
            delay = Duration::from_millis(jittered_ms);
        }

        delay
    }
}
