//! Attribute validators
//!
//! Pure checks run before any network call. Each returns a [`Validation`];
//! none of them emit warnings.

use crate::admin::types::{AuthAction, TopicDomain};
use crate::resource::data::AttrValue;

pub const PROCESSING_GUARANTEE_EFFECTIVELY_ONCE: &str = "EFFECTIVELY_ONCE";
pub const PROCESSING_GUARANTEE_ATLEAST_ONCE: &str = "ATLEAST_ONCE";
pub const PROCESSING_GUARANTEE_ATMOST_ONCE: &str = "ATMOST_ONCE";

pub const PROCESSING_GUARANTEES: &[&str] = &[
    PROCESSING_GUARANTEE_EFFECTIVELY_ONCE,
    PROCESSING_GUARANTEE_ATLEAST_ONCE,
    PROCESSING_GUARANTEE_ATMOST_ONCE,
];

pub const SUBSCRIPTION_POSITION_EARLIEST: &str = "Earliest";
pub const SUBSCRIPTION_POSITION_LATEST: &str = "Latest";

pub const SUBSCRIPTION_POSITIONS: &[&str] =
    &[SUBSCRIPTION_POSITION_EARLIEST, SUBSCRIPTION_POSITION_LATEST];

/// Outcome of a validator
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Validation {
    pub warnings: Vec<String>,
    pub errors: Vec<String>,
}

impl Validation {
    pub fn ok() -> Self {
        Self::default()
    }

    pub fn error(message: String) -> Self {
        Self {
            warnings: Vec::new(),
            errors: vec![message],
        }
    }

    pub fn is_ok(&self) -> bool {
        self.errors.is_empty()
    }
}

/// Strip surrounding whitespace, then surrounding double quotes
fn unquote(value: &str) -> &str {
    value.trim().trim_matches('"')
}

pub fn validate_not_blank(value: &str, key: &str) -> Validation {
    if unquote(value).is_empty() {
        return Validation::error(format!("{:?} must not be empty", key));
    }
    Validation::ok()
}

/// Request-URI check: an absolute URL, or an absolute path
pub fn validate_url(value: &str, key: &str) -> Validation {
    let candidate = unquote(value);
    if candidate.starts_with('/') {
        return Validation::ok();
    }
    match url::Url::parse(candidate) {
        Ok(_) => Validation::ok(),
        Err(e) => Validation::error(format!("{:?} must be a valid url: {}", key, e)),
    }
}

pub fn validate_gt_eq_0(value: i64, key: &str) -> Validation {
    if value < 0 {
        return Validation::error(format!("{:?} must be 0 or more, got: {}", key, value));
    }
    Validation::ok()
}

pub fn validate_topic_type(value: &str, key: &str) -> Validation {
    match value.parse::<TopicDomain>() {
        Ok(_) => Validation::ok(),
        Err(e) => Validation::error(format!(
            "{:?} must be a valid topic name (got: {}): {}",
            key, value, e
        )),
    }
}

pub fn validate_auth_action(value: &str, key: &str) -> Validation {
    match value.parse::<AuthAction>() {
        Ok(_) => Validation::ok(),
        Err(e) => Validation::error(format!(
            "{:?} must be a valid auth action (got: {}): {}",
            key, value, e
        )),
    }
}

/// Case-sensitive membership in a fixed set
pub fn validate_one_of(allowed: &[&str], value: &str) -> Validation {
    if allowed.contains(&value) {
        return Validation::ok();
    }
    Validation::error(format!(
        "must be one of {} and not {}",
        allowed.join(", "),
        value
    ))
}

/// Validator attached to a schema attribute
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Validator {
    NotBlank,
    Url,
    GtEq0,
    OneOf(&'static [&'static str]),
    TopicType,
    AuthAction,
}

impl Validator {
    pub fn check(&self, key: &str, value: &AttrValue) -> Validation {
        match self {
            Validator::GtEq0 => match value.as_int() {
                Some(v) => validate_gt_eq_0(v, key),
                None => Validation::error(format!("{:?} expected type int", key)),
            },
            Validator::NotBlank => check_str(key, value, |v| validate_not_blank(v, key)),
            Validator::Url => check_str(key, value, |v| validate_url(v, key)),
            Validator::OneOf(allowed) => check_str(key, value, |v| validate_one_of(allowed, v)),
            Validator::TopicType => check_str(key, value, |v| validate_topic_type(v, key)),
            Validator::AuthAction => check_str(key, value, |v| validate_auth_action(v, key)),
        }
    }
}

fn check_str(key: &str, value: &AttrValue, check: impl FnOnce(&str) -> Validation) -> Validation {
    match value.as_str() {
        Some(v) => check(v),
        None => Validation::error(format!("{:?} expected type string", key)),
    }
}
