//! Retry policies for backend calls.

use std::time::Duration;

use crate::endpoint::Endpoint;
use crate::error::ApiError;

/// Backoff strategy between retry attempts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BackoffStrategy {
    /// No delay between retries.
    None,
    /// Fixed delay between retries.
    Fixed(Duration),
    /// Exponential backoff with base and max.
    Exponential {
        /// Initial delay.
        base: Duration,
        /// Maximum delay.
        max: Duration,
    },
}

impl BackoffStrategy {
    /// Calculate delay for a given attempt number (0-indexed).
    pub fn delay_for_attempt(&self, attempt: u32) -> Duration {
        match self {
            Self::None => Duration::ZERO,
            Self::Fixed(d) => *d,
            Self::Exponential { base, max } => {
                let multiplier = 2u32.saturating_pow(attempt);
                std::cmp::min(base.saturating_mul(multiplier), *max)
            }
        }
    }
}

impl Default for BackoffStrategy {
    fn default() -> Self {
        Self::Exponential {
            base: Duration::from_millis(100),
            max: Duration::from_secs(2),
        }
    }
}

/// Conditions that trigger a retry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RetryCondition {
    /// Retry on specific HTTP status code.
    StatusCode(u16),
    /// Retry on any 5xx status.
    ServerError,
    /// Retry when no response arrived.
    ConnectionError,
}

impl RetryCondition {
    /// Check if an error matches this condition.
    pub fn matches(&self, error: &ApiError) -> bool {
        match (self, error.status()) {
            (Self::StatusCode(code), Some(status)) => status == *code,
            (Self::ServerError, Some(status)) => (500..600).contains(&status),
            (Self::ConnectionError, None) => error.is_network(),
            _ => false,
        }
    }
}

/// Retry policy configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Maximum number of retry attempts.
    pub max_attempts: u32,
    /// Backoff strategy.
    pub backoff: BackoffStrategy,
    /// Conditions that trigger retry.
    pub retry_on: Vec<RetryCondition>,
}

impl RetryPolicy {
    /// Create a new retry policy.
    pub fn new(max_attempts: u32) -> Self {
        Self {
            max_attempts,
            backoff: BackoffStrategy::default(),
            retry_on: vec![RetryCondition::ServerError, RetryCondition::ConnectionError],
        }
    }

    /// Create a policy with no retries.
    pub fn none() -> Self {
        Self {
            max_attempts: 0,
            backoff: BackoffStrategy::None,
            retry_on: Vec::new(),
        }
    }

    /// Default policy for an endpoint. Non-idempotent endpoints never retry.
    pub fn for_endpoint(endpoint: Endpoint) -> Self {
        if !endpoint.is_idempotent() || endpoint.default_max_retries() == 0 {
            return Self::none();
        }
        Self::new(endpoint.default_max_retries())
    }

    /// Set backoff strategy.
    pub fn with_backoff(mut self, strategy: BackoffStrategy) -> Self {
        self.backoff = strategy;
        self
    }

    /// Set retry conditions.
    pub fn with_conditions(mut self, conditions: Vec<RetryCondition>) -> Self {
        self.retry_on = conditions;
        self
    }

    /// Check if a failed attempt (0-indexed) should be retried.
    pub fn should_retry(&self, error: &ApiError, attempt: u32) -> bool {
        if attempt >= self.max_attempts {
            return false;
        }
        self.retry_on.iter().any(|c| c.matches(error))
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::new(1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn http(status: u16) -> ApiError {
        ApiError::Http {
            endpoint: "get_cart",
            status,
            reason: String::new(),
        }
    }

    #[test]
    fn test_exponential_backoff_capped() {
        let backoff = BackoffStrategy::Exponential {
            base: Duration::from_millis(100),
            max: Duration::from_millis(300),
        };
        assert_eq!(backoff.delay_for_attempt(0), Duration::from_millis(100));
        assert_eq!(backoff.delay_for_attempt(1), Duration::from_millis(200));
        assert_eq!(backoff.delay_for_attempt(5), Duration::from_millis(300));
        assert_eq!(backoff.delay_for_attempt(40), Duration::from_millis(300));
    }

    #[test]
    fn test_retries_server_errors_until_budget_spent() {
        let policy = RetryPolicy::new(2);
        assert!(policy.should_retry(&http(503), 0));
        assert!(policy.should_retry(&http(500), 1));
        assert!(!policy.should_retry(&http(500), 2));
        assert!(!policy.should_retry(&http(404), 0));
    }

    #[test]
    fn test_retries_connection_errors() {
        let policy = RetryPolicy::new(1);
        let err = ApiError::Network {
            endpoint: "get_cart",
            reason: "connection refused".to_string(),
        };
        assert!(policy.should_retry(&err, 0));
    }

    #[test]
    fn test_checkout_endpoints_get_no_retries() {
        let policy = RetryPolicy::for_endpoint(Endpoint::CheckoutCod);
        assert_eq!(policy, RetryPolicy::none());
        assert!(!policy.should_retry(&http(500), 0));

        let policy = RetryPolicy::for_endpoint(Endpoint::OrderHistory);
        assert_eq!(policy.max_attempts, 2);
    }
}
