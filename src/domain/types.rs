//! Strongly-typed value objects used by domain entities.
//!
//! These wrappers enforce basic invariants (e.g., uppercase prefixes,
//! well-formed phone numbers, normalized email) so that once a value reaches
//! the domain layer it can be sent to the ticket API as-is.
use std::fmt::{Display, Formatter};
use std::ops::Deref;

use phonenumber::country;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use validator::ValidateEmail;

/// Largest batch the generation form accepts.
pub const MAX_BATCH_SIZE: u32 = 10_000;
/// Longest prefix the generation form accepts.
pub const MAX_PREFIX_LEN: usize = 20;
/// Length of the unique code printed on every ticket.
pub const TICKET_CODE_LEN: usize = 11;

/// Errors produced when attempting to construct a constrained value object.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum TypeConstraintError {
    /// Provided string contained no non-whitespace characters.
    #[error("value cannot be empty")]
    EmptyString,
    /// Provided email failed format validation.
    #[error("invalid email address")]
    InvalidEmail,
    /// Phone number did not match `(XX) XXXXX-XXXX`.
    #[error("invalid phone number")]
    InvalidPhone,
    /// Prefix contained something other than uppercase letters.
    #[error("prefix must contain only uppercase letters")]
    InvalidPrefix,
    /// Batch size outside `1..=MAX_BATCH_SIZE`.
    #[error("batch size must be between 1 and {MAX_BATCH_SIZE}")]
    BatchSizeOutOfRange,
    /// Value was shorter than required.
    #[error("value must have at least {0} characters")]
    TooShort(usize),
    /// Value was longer than allowed.
    #[error("value must have at most {0} characters")]
    TooLong(usize),
    /// Provided value failed custom validation.
    #[error("invalid value: {0}")]
    InvalidValue(String),
}

/// Normalizes and validates an email string.
fn normalize_email<S: Into<String>>(email: S) -> Result<String, TypeConstraintError> {
    let normalized = email.into().trim().to_lowercase();
    if normalized.validate_email() {
        Ok(normalized)
    } else {
        Err(TypeConstraintError::InvalidEmail)
    }
}

/// Wrapper for non-empty, trimmed strings.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub struct NonEmptyString(String);

impl NonEmptyString {
    /// Trims whitespace and rejects empty inputs.
    pub fn new<S: Into<String>>(value: S) -> Result<Self, TypeConstraintError> {
        let trimmed = value.into().trim().to_string();
        if trimmed.is_empty() {
            return Err(TypeConstraintError::EmptyString);
        }
        Ok(Self(trimmed))
    }

    /// Borrow the inner string.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Consume the wrapper returning the owned string.
    pub fn into_inner(self) -> String {
        self.0
    }
}

impl Display for NonEmptyString {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Shared accessors and conversions for string-backed value objects.
macro_rules! string_value_impls {
    ($name:ident) => {
        impl $name {
            /// Borrow the value as a string slice.
            pub fn as_str(&self) -> &str {
                &self.0
            }

            /// Consume the wrapper and return the owned string.
            pub fn into_inner(self) -> String {
                self.0
            }
        }

        impl Deref for $name {
            type Target = str;

            fn deref(&self) -> &Self::Target {
                &self.0
            }
        }

        impl Display for $name {
            fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl TryFrom<String> for $name {
            type Error = TypeConstraintError;

            fn try_from(value: String) -> Result<Self, Self::Error> {
                Self::new(value)
            }
        }

        impl TryFrom<&str> for $name {
            type Error = TypeConstraintError;

            fn try_from(value: &str) -> Result<Self, Self::Error> {
                Self::new(value)
            }
        }

        impl From<$name> for String {
            fn from(value: $name) -> Self {
                value.0
            }
        }
    };
}

macro_rules! non_empty_string_newtype {
    ($name:ident, $doc:expr) => {
        #[doc = $doc]
        #[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
        #[serde(transparent)]
        pub struct $name(String);

        impl $name {
            /// Constructs a trimmed, non-empty value.
            pub fn new<S: Into<String>>(value: S) -> Result<Self, TypeConstraintError> {
                let inner = NonEmptyString::new(value)?;
                Ok(Self(inner.into_inner()))
            }
        }

        string_value_impls!($name);
    };
}

non_empty_string_newtype!(
    AccessToken,
    "Bearer token issued by the ticket API on login."
);

/// Identifier assigned to a ticket by the API. Only characters that are safe
/// inside a URL path segment are accepted.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[serde(transparent)]
pub struct TicketId(String);

impl TicketId {
    pub fn new<S: Into<String>>(value: S) -> Result<Self, TypeConstraintError> {
        let inner = NonEmptyString::new(value)?.into_inner();
        if inner
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
        {
            Ok(Self(inner))
        } else {
            Err(TypeConstraintError::InvalidValue(inner))
        }
    }
}

string_value_impls!(TicketId);

/// Ticket code as typed by the holder, uppercased.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[serde(transparent)]
pub struct TicketCode(String);

impl TicketCode {
    const MAX_LEN: usize = 64;

    /// Trims and uppercases the code, accepting letters, digits, `-` and
    /// inner spaces (kept as typed, e.g. `GANHADOR 001`).
    pub fn new<S: Into<String>>(value: S) -> Result<Self, TypeConstraintError> {
        let inner = NonEmptyString::new(value)?.into_inner().to_uppercase();
        if inner.chars().count() > Self::MAX_LEN {
            return Err(TypeConstraintError::TooLong(Self::MAX_LEN));
        }
        if !inner
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == ' ')
        {
            return Err(TypeConstraintError::InvalidValue(inner));
        }
        Ok(Self(inner))
    }

    /// Whether the code has the shape of a generated unique code.
    pub fn is_standard_format(&self) -> bool {
        is_standard_code(&self.0)
    }
}

string_value_impls!(TicketCode);

/// Checks the `codigoUnico` shape: exactly [`TICKET_CODE_LEN`] uppercase
/// letters or digits.
pub fn is_standard_code(value: &str) -> bool {
    value.len() == TICKET_CODE_LEN
        && value
            .chars()
            .all(|c| c.is_ascii_uppercase() || c.is_ascii_digit())
}

/// Alphabetic label prepended to the sequential number of every ticket in a
/// batch.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[serde(transparent)]
pub struct Prefix(String);

impl Prefix {
    pub fn new<S: Into<String>>(value: S) -> Result<Self, TypeConstraintError> {
        let inner = NonEmptyString::new(value)?.into_inner();
        if inner.len() > MAX_PREFIX_LEN {
            return Err(TypeConstraintError::TooLong(MAX_PREFIX_LEN));
        }
        if !inner.chars().all(|c| c.is_ascii_uppercase()) {
            return Err(TypeConstraintError::InvalidPrefix);
        }
        Ok(Self(inner))
    }
}

string_value_impls!(Prefix);

/// Number of tickets requested in one generation call.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[serde(transparent)]
pub struct BatchSize(u32);

impl BatchSize {
    pub fn new(value: u32) -> Result<Self, TypeConstraintError> {
        if (1..=MAX_BATCH_SIZE).contains(&value) {
            Ok(Self(value))
        } else {
            Err(TypeConstraintError::BatchSizeOutOfRange)
        }
    }

    pub const fn get(self) -> u32 {
        self.0
    }
}

impl Display for BatchSize {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl TryFrom<u32> for BatchSize {
    type Error = TypeConstraintError;

    fn try_from(value: u32) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

/// Full name of a prize holder, sanitized of markup.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(transparent)]
pub struct HolderName(String);

impl HolderName {
    pub const MIN_LEN: usize = 3;

    pub fn new<S: Into<String>>(value: S) -> Result<Self, TypeConstraintError> {
        let sanitized = ammonia::clean(&value.into());
        let inner = NonEmptyString::new(sanitized)?.into_inner();
        if inner.chars().count() < Self::MIN_LEN {
            return Err(TypeConstraintError::TooShort(Self::MIN_LEN));
        }
        Ok(Self(inner))
    }
}

string_value_impls!(HolderName);

/// Checks the Brazilian display mask `(XX) XXXX-XXXX` / `(XX) XXXXX-XXXX`.
pub fn matches_phone_mask(value: &str) -> bool {
    let bytes = value.as_bytes();
    let local_len = match bytes.len() {
        14 => 4,
        15 => 5,
        _ => return false,
    };
    let digits = |range: std::ops::Range<usize>| bytes[range].iter().all(u8::is_ascii_digit);

    bytes[0] == b'('
        && digits(1..3)
        && bytes[3] == b')'
        && bytes[4] == b' '
        && digits(5..5 + local_len)
        && bytes[5 + local_len] == b'-'
        && digits(6 + local_len..bytes.len())
}

/// Phone number in the `(XX) XXXXX-XXXX` mask the API expects.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(transparent)]
pub struct PhoneNumber(String);

impl PhoneNumber {
    /// Requires the display mask and a number that parses as Brazilian.
    pub fn new<S: Into<String>>(value: S) -> Result<Self, TypeConstraintError> {
        let inner = NonEmptyString::new(value)?.into_inner();
        if !matches_phone_mask(&inner) {
            return Err(TypeConstraintError::InvalidPhone);
        }
        phonenumber::parse(Some(country::Id::BR), &inner)
            .map_err(|_| TypeConstraintError::InvalidPhone)?;
        Ok(Self(inner))
    }
}

string_value_impls!(PhoneNumber);

/// Lower-cased and validated contact email.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(transparent)]
pub struct ContactEmail(String);

impl ContactEmail {
    /// Validates and normalizes an email string.
    pub fn new<S: Into<String>>(email: S) -> Result<Self, TypeConstraintError> {
        let normalized = normalize_email(email)?;
        Ok(Self(normalized))
    }
}

string_value_impls!(ContactEmail);

/// PIX key used to pay out the prize (CPF, phone, email or random key).
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(transparent)]
pub struct PixKey(String);

impl PixKey {
    pub const MIN_LEN: usize = 11;
    pub const MAX_LEN: usize = 140;

    pub fn new<S: Into<String>>(value: S) -> Result<Self, TypeConstraintError> {
        let inner = NonEmptyString::new(value)?.into_inner();
        let len = inner.chars().count();
        if len < Self::MIN_LEN {
            return Err(TypeConstraintError::TooShort(Self::MIN_LEN));
        }
        if len > Self::MAX_LEN {
            return Err(TypeConstraintError::TooLong(Self::MAX_LEN));
        }
        Ok(Self(inner))
    }
}

string_value_impls!(PixKey);
