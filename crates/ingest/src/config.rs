use std::str::FromStr;
use std::time::Duration;

use http::Method;
use thiserror::Error;

/// What to do when a body decoder fails.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum RecoveryPolicy {
    /// Log the failure and continue with an empty body
    #[default]
    SubstituteEmpty,
    /// Answer the request with a client error and do not continue
    SurfaceError,
}

impl RecoveryPolicy {
    pub fn as_str(&self) -> &'static str {
        match self {
            RecoveryPolicy::SubstituteEmpty => "substitute-empty",
            RecoveryPolicy::SurfaceError => "surface-error",
        }
    }
}

#[derive(Error, Debug)]
#[error("unknown recovery policy '{0}', expected 'substitute-empty' or 'surface-error'")]
pub struct UnknownPolicy(String);

impl FromStr for RecoveryPolicy {
    type Err = UnknownPolicy;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "substitute-empty" => Ok(RecoveryPolicy::SubstituteEmpty),
            "surface-error" => Ok(RecoveryPolicy::SurfaceError),
            other => Err(UnknownPolicy(other.to_string())),
        }
    }
}

/// Settings for a [`PipelineGate`](crate::PipelineGate).
///
/// The default ingests every method except `GET`, substitutes an empty body
/// on decode failure, and puts no bound on body size or wait time.
#[derive(Debug, Clone)]
pub struct IngestConfig {
    policy: RecoveryPolicy,
    max_body_size: Option<usize>,
    timeout: Option<Duration>,
    bypass_methods: Vec<Method>,
}

impl Default for IngestConfig {
    fn default() -> Self {
        Self { policy: RecoveryPolicy::default(), max_body_size: None, timeout: None, bypass_methods: vec![Method::GET] }
    }
}

impl IngestConfig {
    pub fn builder() -> IngestConfigBuilder {
        IngestConfigBuilder::new()
    }

    pub fn policy(&self) -> RecoveryPolicy {
        self.policy
    }

    pub fn max_body_size(&self) -> Option<usize> {
        self.max_body_size
    }

    pub fn timeout(&self) -> Option<Duration> {
        self.timeout
    }

    /// Returns true if requests with this method are never ingested
    pub fn bypasses(&self, method: &Method) -> bool {
        self.bypass_methods.contains(method)
    }
}

pub struct IngestConfigBuilder {
    config: IngestConfig,
}

impl IngestConfigBuilder {
    fn new() -> Self {
        Self { config: IngestConfig::default() }
    }

    pub fn policy(mut self, policy: RecoveryPolicy) -> Self {
        self.config.policy = policy;
        self
    }

    /// Bodies longer than `limit` bytes are rejected with 413
    pub fn max_body_size(mut self, limit: usize) -> Self {
        self.config.max_body_size = Some(limit);
        self
    }

    /// Bodies not complete within `timeout` are rejected with 408
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.config.timeout = Some(timeout);
        self
    }

    /// Adds a method whose requests skip ingestion entirely
    pub fn bypass_method(mut self, method: Method) -> Self {
        if !self.config.bypass_methods.contains(&method) {
            self.config.bypass_methods.push(method);
        }
        self
    }

    pub fn build(self) -> IngestConfig {
        self.config
    }
}
