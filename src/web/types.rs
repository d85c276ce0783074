//! Request payloads of the `web` module, their parsing implementations and tests for those.

use lazy_regex::regex_is_match;
use serde_json::Value;

// ###################################
// ->   STRUCTS
// ###################################
/// The body of a subscribe request.
#[derive(Debug)]
pub struct SubscribeRequest {
    pub email: Option<String>,
}

impl SubscribeRequest {
    /// Parses the raw request body. Content type is not checked.
    ///
    /// Any JSON value other than `null` is accepted: non-objects and objects without an
    /// `email` carry no email. A present `email` must be a string or `null`.
    /// Duplicate keys keep the last value.
    pub fn from_body(body: &[u8]) -> Result<Self, BodyParsingError> {
        let value: Value = serde_json::from_slice(body)?;

        match value {
            Value::Null => Err(BodyParsingError::NullBody),
            Value::Object(mut fields) => match fields.remove("email") {
                None | Some(Value::Null) => Ok(Self { email: None }),
                Some(Value::String(email)) => Ok(Self { email: Some(email) }),
                Some(other) => Err(BodyParsingError::EmailNotAString(json_type(&other))),
            },
            _ => Ok(Self { email: None }),
        }
    }
}

fn json_type(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

/// Validated subscriber email, trimmed and lowercased.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubscriberEmail(String);

impl AsRef<str> for SubscriberEmail {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for SubscriberEmail {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl SubscriberEmail {
    /// Accepts anything shaped like `local@domain.tld` where no part contains whitespace
    /// or another `@`. Deliberately lenient, `a..b@example.com` passes.
    pub fn parse<S>(value: S) -> Result<Self, DataParsingError>
    where
        S: AsRef<str>,
    {
        let value = value.as_ref().trim().to_lowercase();

        if value.is_empty() {
            return Err(DataParsingError::EmailMissing);
        }

        if regex_is_match!(r"^[^\s@]+@[^\s@]+\.[^\s@]+$", &value) {
            Ok(SubscriberEmail(value))
        } else {
            Err(DataParsingError::EmailInvalid(value))
        }
    }
}

impl TryFrom<SubscribeRequest> for SubscriberEmail {
    type Error = DataParsingError;

    fn try_from(request: SubscribeRequest) -> Result<Self, Self::Error> {
        let email = request.email.ok_or(DataParsingError::EmailMissing)?;
        Self::parse(email)
    }
}

// ###################################
// ->   ERROR
// ###################################
#[derive(Debug, thiserror::Error)]
pub enum DataParsingError {
    #[error("email is missing")]
    EmailMissing,
    #[error("email is invalid: {0}")]
    EmailInvalid(String),
}

#[derive(Debug, thiserror::Error)]
pub enum BodyParsingError {
    #[error("request body is null")]
    NullBody,
    #[error("email field is a {0}, not a string")]
    EmailNotAString(&'static str),

    #[error("request body is not valid json: {0}")]
    Json(#[from] serde_json::Error),
}
