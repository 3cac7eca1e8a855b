/*!
 * Mock oracle implementations for testing.
 *
 * This module provides mock oracles that simulate different behaviors:
 * - `MockOracle::working()` - Always succeeds with translated text
 * - `MockOracle::failing()` - Always fails with an error
 * - `MockOracle::failing_on()` - Fails only for requests containing a marker
 * - `MockOracle::flaky()` - Fails the first N requests, then succeeds
 */

use async_trait::async_trait;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use crate::errors::OracleError;
use crate::providers::{OracleRequest, TranslationOracle};

/// Behavior mode for the mock oracle
#[derive(Debug, Clone)]
pub enum MockBehavior {
    /// Always succeeds with a tagged translation
    Working,
    /// Always fails with an API error
    Failing,
    /// Fails only when the request text contains the marker
    FailingOn { marker: String },
    /// Fails the first `fail_first` requests, then succeeds
    Flaky { fail_first: usize },
}

/// Mock oracle for testing orchestration behavior
#[derive(Debug)]
pub struct MockOracle {
    /// Behavior mode
    behavior: MockBehavior,
    /// Shared request counter, survives cloning
    request_count: Arc<AtomicUsize>,
}

impl MockOracle {
    /// Create a new mock oracle with the specified behavior
    pub fn new(behavior: MockBehavior) -> Self {
        Self {
            behavior,
            request_count: Arc::new(AtomicUsize::new(0)),
        }
    }

    /// Create a working mock oracle that always succeeds
    pub fn working() -> Self {
        Self::new(MockBehavior::Working)
    }

    /// Create a failing mock oracle that always errors
    pub fn failing() -> Self {
        Self::new(MockBehavior::Failing)
    }

    /// Create a mock oracle that fails only for texts containing the marker
    pub fn failing_on(marker: impl Into<String>) -> Self {
        Self::new(MockBehavior::FailingOn {
            marker: marker.into(),
        })
    }

    /// Create a mock oracle that fails the first `fail_first` requests
    pub fn flaky(fail_first: usize) -> Self {
        Self::new(MockBehavior::Flaky { fail_first })
    }

    /// Handle to the shared request counter
    pub fn counter(&self) -> Arc<AtomicUsize> {
        Arc::clone(&self.request_count)
    }

    /// Number of translate calls made so far
    pub fn call_count(&self) -> usize {
        self.request_count.load(Ordering::SeqCst)
    }

    /// Canonical mock translation for a source text
    pub fn translated(text: &str, target_language: &str) -> String {
        format!("[{}] {}", target_language, text)
    }
}

impl Clone for MockOracle {
    fn clone(&self) -> Self {
        Self {
            behavior: self.behavior.clone(),
            request_count: Arc::clone(&self.request_count),
        }
    }
}

#[async_trait]
impl TranslationOracle for MockOracle {
    async fn translate(&self, request: &OracleRequest) -> Result<String, OracleError> {
        let count = self.request_count.fetch_add(1, Ordering::SeqCst);

        match &self.behavior {
            MockBehavior::Working => Ok(Self::translated(&request.text, &request.target_language)),

            MockBehavior::Failing => Err(OracleError::Api {
                status_code: 500,
                message: "Simulated oracle failure".to_string(),
            }),

            MockBehavior::FailingOn { marker } => {
                if request.text.contains(marker.as_str()) {
                    Err(OracleError::Api {
                        status_code: 503,
                        message: format!("Simulated failure for text containing {:?}", marker),
                    })
                } else {
                    Ok(Self::translated(&request.text, &request.target_language))
                }
            }

            MockBehavior::Flaky { fail_first } => {
                if count < *fail_first {
                    Err(OracleError::RequestFailed(format!(
                        "Simulated transient failure (request #{})",
                        count + 1
                    )))
                } else {
                    Ok(Self::translated(&request.text, &request.target_language))
                }
            }
        }
    }

    fn name(&self) -> &str {
        "mock"
    }
}
