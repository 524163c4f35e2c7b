use std::borrow::Cow;
use std::fmt;

use crate::domain::validation::ValidationError;

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
/// dotmailer API user name (an API user, not the account login).
///
/// Invariant: non-empty after trimming.
pub struct Username(String);

impl Username {
    /// Field name used in validation errors.
    pub const FIELD: &'static str = "username";

    /// Create a validated [`Username`].
    pub fn new(value: impl Into<String>) -> Result<Self, ValidationError> {
        let value = value.into();
        let trimmed = value.trim();
        if trimmed.is_empty() {
            return Err(ValidationError::Empty { field: Self::FIELD });
        }
        Ok(Self(trimmed.to_owned()))
    }

    /// Borrow the validated user name.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

#[derive(Clone, PartialEq, Eq, Hash)]
/// dotmailer API user password.
///
/// Invariant: must not be empty (whitespace is preserved and allowed).
pub struct Password(String);

impl Password {
    /// Field name used in validation errors.
    pub const FIELD: &'static str = "password";

    /// Create a validated [`Password`].
    pub fn new(value: impl Into<String>) -> Result<Self, ValidationError> {
        let value = value.into();
        if value.is_empty() {
            return Err(ValidationError::Empty { field: Self::FIELD });
        }
        Ok(Self(value))
    }

    /// Borrow the password as provided.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for Password {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Password(***)")
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
/// Base URL of a dotmailer API region, e.g. `https://r1-api.dotmailer.com`.
///
/// Invariant: parses as an absolute `http`/`https` URL.
pub struct ApiUrl(String);

impl ApiUrl {
    /// Field name used in validation errors.
    pub const FIELD: &'static str = "api_url";

    /// Create a validated [`ApiUrl`]. Surrounding whitespace is trimmed.
    pub fn new(value: impl Into<String>) -> Result<Self, ValidationError> {
        let value = value.into();
        let trimmed = value.trim();
        if trimmed.is_empty() {
            return Err(ValidationError::Empty { field: Self::FIELD });
        }
        let parsed = url::Url::parse(trimmed).map_err(|_| ValidationError::InvalidUrl {
            input: trimmed.to_owned(),
        })?;
        if !matches!(parsed.scheme(), "http" | "https") {
            return Err(ValidationError::UnsupportedScheme {
                scheme: parsed.scheme().to_owned(),
            });
        }
        Ok(Self(trimmed.to_owned()))
    }

    /// Borrow the URL as provided (trimmed).
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
/// API version path segment, e.g. `/v2`.
///
/// Invariant: non-empty after trimming.
pub struct ApiVersion(String);

impl ApiVersion {
    /// Field name used in validation errors.
    pub const FIELD: &'static str = "version";

    /// Create a validated [`ApiVersion`].
    pub fn new(value: impl Into<String>) -> Result<Self, ValidationError> {
        let value = value.into();
        let trimmed = value.trim();
        if trimmed.is_empty() {
            return Err(ValidationError::Empty { field: Self::FIELD });
        }
        Ok(Self(trimmed.to_owned()))
    }

    /// Borrow the version segment.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
/// Stable, machine-readable failure code.
///
/// Codes produced locally are exposed as associated constants. Codes coming from the
/// provider (`"Error: <TOKEN>"` messages) are preserved verbatim.
pub struct ErrorCode(Cow<'static, str>);

impl ErrorCode {
    /// Caller input rejected before any request was made.
    pub const INPUT: Self = Self(Cow::Borrowed("ERROR_INPUT"));
    /// Local transport or decode failure.
    pub const UNKNOWN: Self = Self(Cow::Borrowed("ERROR_UNKNOWN"));
    /// Provider failure without a classifiable token.
    pub const UNKNOWN_PROVIDER: Self = Self(Cow::Borrowed("UNKNOWN_ERROR"));
    /// Bulk export could not be written.
    pub const CSV: Self = Self(Cow::Borrowed("ERROR_CSV"));

    /// Wrap a provider token.
    pub fn new(code: impl Into<String>) -> Self {
        Self(Cow::Owned(code.into()))
    }

    /// Borrow the code text.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Map this code to a locally produced kind, if it is one.
    pub fn known(&self) -> Option<KnownErrorCode> {
        KnownErrorCode::from_code(self.as_str())
    }

    /// Whether the code came from a provider `"Error: <TOKEN>"` message.
    pub fn is_provider_token(&self) -> bool {
        self.known().is_none()
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl PartialEq<str> for ErrorCode {
    fn eq(&self, other: &str) -> bool {
        self.as_str() == other
    }
}

impl PartialEq<&str> for ErrorCode {
    fn eq(&self, other: &&str) -> bool {
        self.as_str() == *other
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[non_exhaustive]
/// Failure codes produced by this crate rather than by the provider.
pub enum KnownErrorCode {
    Input,
    Unknown,
    UnknownProvider,
    Csv,
}

impl KnownErrorCode {
    /// Convert a code string into a known variant.
    pub fn from_code(code: &str) -> Option<Self> {
        Some(match code {
            "ERROR_INPUT" => Self::Input,
            "ERROR_UNKNOWN" => Self::Unknown,
            "UNKNOWN_ERROR" => Self::UnknownProvider,
            "ERROR_CSV" => Self::Csv,
            _ => return None,
        })
    }
}
