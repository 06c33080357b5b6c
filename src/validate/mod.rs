//! validate
//!
//! Pluggable checks run against a fully enriched snapshot.
//!
//! # Contract
//!
//! Validators run strictly in list order. The first rejection aborts the load
//! and the remaining validators never run. Validators only read the snapshot.
//!
//! # Built-ins
//!
//! [`DimensionValidator`] enforces a minimum version for one item of the
//! schema, API, or component dimension. [`FnValidator`] wraps an arbitrary
//! predicate for caller-specific policy.
//!
//! ```
//! use verstamp::validate::{DimensionValidator, FnValidator};
//! use verstamp::core::errors::ValidationError;
//!
//! let min_db = DimensionValidator::min_schema("db", "45");
//! let tagged = FnValidator::new("release-tag", |_ctx, info| {
//!     if info.git().tag.is_empty() {
//!         Err(ValidationError::custom("release-tag", "production builds need a tag"))
//!     } else {
//!         Ok(())
//!     }
//! });
//! # let _ = (min_db, tagged);
//! ```
//!
//! # Context
//!
//! Every validator receives a [`ValidationContext`] carrying a cancellation
//! token, an optional deadline, and a tracing span. Built-ins never block and
//! ignore it. Validators doing blocking work should call
//! [`ValidationContext::check`] between steps.

use std::fmt;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

use crate::core::errors::ValidationError;
use crate::core::info::Info;
use crate::core::semver::SemVer;
use crate::core::types::Dimension;

/// A check against an enriched snapshot.
pub trait Validator: Send + Sync {
    /// Name used in logs.
    fn name(&self) -> &str;

    /// Accept or reject the snapshot.
    fn validate(&self, ctx: &ValidationContext, info: &Info) -> Result<(), ValidationError>;
}

/// Shared flag a caller can flip to ask running validators to stop.
#[derive(Debug, Clone, Default)]
pub struct CancelToken(Arc<AtomicBool>);

impl CancelToken {
    pub fn cancel(&self) {
        self.0.store(true, Ordering::Release);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::Acquire)
    }
}

/// Ambient state threaded through every validator.
#[derive(Debug, Clone)]
pub struct ValidationContext {
    cancel: CancelToken,
    deadline: Option<Instant>,
    span: tracing::Span,
}

impl Default for ValidationContext {
    fn default() -> Self {
        ValidationContext {
            cancel: CancelToken::default(),
            deadline: None,
            span: tracing::Span::none(),
        }
    }
}

impl ValidationContext {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_cancel_token(mut self, token: CancelToken) -> Self {
        self.cancel = token;
        self
    }

    pub fn with_deadline(mut self, deadline: Instant) -> Self {
        self.deadline = Some(deadline);
        self
    }

    pub fn with_timeout(self, timeout: Duration) -> Self {
        self.with_deadline(Instant::now() + timeout)
    }

    /// Span validators run inside.
    pub fn with_span(mut self, span: tracing::Span) -> Self {
        self.span = span;
        self
    }

    pub fn cancel_token(&self) -> &CancelToken {
        &self.cancel
    }

    pub fn deadline(&self) -> Option<Instant> {
        self.deadline
    }

    pub fn span(&self) -> &tracing::Span {
        &self.span
    }

    /// Time left before the deadline; `None` without a deadline.
    pub fn remaining(&self) -> Option<Duration> {
        self.deadline
            .map(|d| d.saturating_duration_since(Instant::now()))
    }

    /// Fail if the caller cancelled or the deadline passed.
    pub fn check(&self) -> Result<(), ValidationError> {
        if self.cancel.is_cancelled() {
            return Err(ValidationError::custom("context", "validation cancelled"));
        }
        if let Some(deadline) = self.deadline {
            if Instant::now() >= deadline {
                return Err(ValidationError::custom("context", "validation deadline exceeded"));
            }
        }
        Ok(())
    }
}

/// Requires an item of one dimension to be at least a minimum version.
#[derive(Debug, Clone)]
pub struct DimensionValidator {
    dimension: Dimension,
    item: String,
    minimum: String,
    name: String,
}

impl DimensionValidator {
    pub fn new(dimension: Dimension, item: impl Into<String>, minimum: impl Into<String>) -> Self {
        let item = item.into();
        let minimum = minimum.into();
        let name = format!("min_{}({item} >= {minimum})", dimension.manifest_key());
        DimensionValidator {
            dimension,
            item,
            minimum,
            name,
        }
    }

    pub fn min_schema(item: impl Into<String>, minimum: impl Into<String>) -> Self {
        Self::new(Dimension::Schema, item, minimum)
    }

    pub fn min_api(item: impl Into<String>, minimum: impl Into<String>) -> Self {
        Self::new(Dimension::Api, item, minimum)
    }

    pub fn min_component(item: impl Into<String>, minimum: impl Into<String>) -> Self {
        Self::new(Dimension::Component, item, minimum)
    }

    pub fn dimension(&self) -> Dimension {
        self.dimension
    }

    pub fn item(&self) -> &str {
        &self.item
    }

    pub fn minimum(&self) -> &str {
        &self.minimum
    }

    fn actual<'a>(&self, info: &'a Info) -> Option<&'a str> {
        match self.dimension {
            Dimension::Schema => info.schema_version(&self.item),
            Dimension::Api => info.api_version(&self.item),
            Dimension::Component => info.component_version(&self.item),
        }
    }
}

impl Validator for DimensionValidator {
    fn name(&self) -> &str {
        &self.name
    }

    fn validate(&self, _ctx: &ValidationContext, info: &Info) -> Result<(), ValidationError> {
        let actual = self
            .actual(info)
            .ok_or_else(|| ValidationError::NotFound {
                dimension: self.dimension,
                item: self.item.clone(),
            })?;

        let actual_version =
            SemVer::parse(actual).map_err(|source| ValidationError::InvalidActualVersion {
                dimension: self.dimension,
                item: self.item.clone(),
                value: actual.to_string(),
                source,
            })?;

        let minimum_version =
            SemVer::parse(&self.minimum).map_err(|source| ValidationError::InvalidMinimumVersion {
                dimension: self.dimension,
                item: self.item.clone(),
                value: self.minimum.clone(),
                source,
            })?;

        if actual_version.less_than(&minimum_version) {
            return Err(ValidationError::TooOld {
                dimension: self.dimension,
                item: self.item.clone(),
                actual: actual.to_string(),
                minimum: self.minimum.clone(),
            });
        }
        Ok(())
    }
}

type Predicate = dyn Fn(&ValidationContext, &Info) -> Result<(), ValidationError> + Send + Sync;

/// A validator backed by a caller-supplied predicate.
pub struct FnValidator {
    name: String,
    predicate: Box<Predicate>,
}

impl FnValidator {
    pub fn new<F>(name: impl Into<String>, predicate: F) -> Self
    where
        F: Fn(&ValidationContext, &Info) -> Result<(), ValidationError> + Send + Sync + 'static,
    {
        FnValidator {
            name: name.into(),
            predicate: Box::new(predicate),
        }
    }
}

impl fmt::Debug for FnValidator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FnValidator")
            .field("name", &self.name)
            .finish_non_exhaustive()
    }
}

impl Validator for FnValidator {
    fn name(&self) -> &str {
        &self.name
    }

    fn validate(&self, ctx: &ValidationContext, info: &Info) -> Result<(), ValidationError> {
        (self.predicate)(ctx, info)
    }
}

/// Run validators in order, stopping at the first rejection.
pub fn run_validators(
    validators: &[Arc<dyn Validator>],
    ctx: &ValidationContext,
    info: &Info,
) -> Result<(), ValidationError> {
    let _entered = ctx.span().enter();
    for validator in validators {
        if let Err(err) = validator.validate(ctx, info) {
            tracing::warn!(validator = validator.name(), error = %err, "validation failed");
            return Err(err);
        }
        tracing::debug!(validator = validator.name(), "validation passed");
    }
    Ok(())
}
