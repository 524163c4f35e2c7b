use crate::domain::value::ErrorCode;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{code}: {message}")]
/// Reason an operation did not succeed: a stable code plus a readable message.
pub struct Failure {
    code: ErrorCode,
    message: String,
}

impl Failure {
    /// Create a failure with an explicit code.
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
        }
    }

    /// `ERROR_INPUT`: the request was rejected before reaching the network.
    pub fn input(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::INPUT, message)
    }

    /// `ERROR_UNKNOWN`: a local transport or decode failure.
    pub fn unknown(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::UNKNOWN, message)
    }

    /// `ERROR_CSV`: the bulk export file could not be produced.
    pub fn csv(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::CSV, message)
    }

    /// Stable code suitable for branching.
    pub fn code(&self) -> &ErrorCode {
        &self.code
    }

    /// Human-readable message suitable for logs or UI.
    pub fn message(&self) -> &str {
        &self.message
    }
}

#[derive(Debug, Clone, PartialEq)]
#[must_use]
/// Result of a single API operation.
///
/// Unlike a bare `Option`, a missing value is never ambiguous: an operation either
/// produced data, succeeded without data, or failed with a code and message.
pub enum Outcome<T> {
    /// The operation succeeded and returned data.
    Success(T),
    /// The operation succeeded and the provider returned no body.
    SuccessEmpty,
    /// The operation failed.
    Failure(Failure),
}

impl<T> Outcome<T> {
    /// Whether this is [`Outcome::Success`] or [`Outcome::SuccessEmpty`].
    pub fn is_success(&self) -> bool {
        !matches!(self, Self::Failure(_))
    }

    /// Whether this is [`Outcome::Success`].
    pub fn has_data(&self) -> bool {
        matches!(self, Self::Success(_))
    }

    /// Borrow the data, if any.
    pub fn data(&self) -> Option<&T> {
        match self {
            Self::Success(data) => Some(data),
            _ => None,
        }
    }

    /// Take the data, if any.
    pub fn into_data(self) -> Option<T> {
        match self {
            Self::Success(data) => Some(data),
            _ => None,
        }
    }

    /// Borrow the failure, if any.
    pub fn failure(&self) -> Option<&Failure> {
        match self {
            Self::Failure(failure) => Some(failure),
            _ => None,
        }
    }

    /// Transform the data while keeping the outcome kind.
    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> Outcome<U> {
        match self {
            Self::Success(data) => Outcome::Success(f(data)),
            Self::SuccessEmpty => Outcome::SuccessEmpty,
            Self::Failure(failure) => Outcome::Failure(failure),
        }
    }

    /// Convert into a `Result` so callers can use `?`.
    pub fn into_result(self) -> Result<Option<T>, Failure> {
        match self {
            Self::Success(data) => Ok(Some(data)),
            Self::SuccessEmpty => Ok(None),
            Self::Failure(failure) => Err(failure),
        }
    }
}

impl<T> From<Failure> for Outcome<T> {
    fn from(failure: Failure) -> Self {
        Self::Failure(failure)
    }
}

#[derive(Debug, Clone, PartialEq)]
#[must_use]
/// Records gathered by a paginated listing.
///
/// When a page fails mid-way, the records of the pages already fetched are kept and
/// `failure` explains why the listing stopped early.
pub struct Listing<T> {
    records: Vec<T>,
    failure: Option<Failure>,
    requests: usize,
}

impl<T> Listing<T> {
    pub(crate) fn complete(records: Vec<T>, requests: usize) -> Self {
        Self {
            records,
            failure: None,
            requests,
        }
    }

    pub(crate) fn partial(records: Vec<T>, failure: Failure, requests: usize) -> Self {
        Self {
            records,
            failure: Some(failure),
            requests,
        }
    }

    /// Whether every page was fetched successfully.
    pub fn is_complete(&self) -> bool {
        self.failure.is_none()
    }

    /// Records gathered so far, in remote order.
    pub fn records(&self) -> &[T] {
        &self.records
    }

    /// Take the gathered records, discarding any failure.
    pub fn into_records(self) -> Vec<T> {
        self.records
    }

    /// Why the listing stopped early, if it did.
    pub fn failure(&self) -> Option<&Failure> {
        self.failure.as_ref()
    }

    /// Number of page requests issued.
    pub fn requests(&self) -> usize {
        self.requests
    }

    /// Split into records and the optional failure.
    pub fn into_parts(self) -> (Vec<T>, Option<Failure>) {
        (self.records, self.failure)
    }

    /// Collapse into an [`Outcome`], dropping partial records on failure.
    pub fn into_outcome(self) -> Outcome<Vec<T>> {
        match self.failure {
            Some(failure) => Outcome::Failure(failure),
            None => Outcome::Success(self.records),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
/// Totals reported by a batch-processing run.
pub struct BatchSummary {
    /// Number of times the callback was invoked.
    pub batches: usize,
    /// Number of records handed to the callback.
    pub records: usize,
}
