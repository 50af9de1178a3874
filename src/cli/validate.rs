//! Pre-run validators.
//!
//! Validators read already-parsed flag state and never perform I/O. A command
//! runs its validators in declaration order and stops at the first failure,
//! before any options are assembled or any request is made.

use super::parsed::ParsedFlags;
use crate::error::CliError;

/// Allowed values for one flag on one command
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationRule {
    /// Flag the rule applies to
    pub flag: &'static str,
    /// Allowed values, in the order shown to the user
    pub allowed: Vec<&'static str>,
}

impl ValidationRule {
    /// Create a rule
    pub fn new(flag: &'static str, allowed: &[&'static str]) -> Self {
        Self {
            flag,
            allowed: allowed.to_vec(),
        }
    }
}

/// A single pre-run check
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Validator {
    /// String flag must be one of an enumerated set
    Enum(ValidationRule),
    /// String flag must be empty or a numeric ID
    Numeric(&'static str),
}

impl Validator {
    /// Flag the validator reads
    pub fn flag(&self) -> &'static str {
        match self {
            Validator::Enum(rule) => rule.flag,
            Validator::Numeric(flag) => flag,
        }
    }

    /// Run the check against parsed flags
    pub fn check(&self, flags: &ParsedFlags) -> Result<(), CliError> {
        match self {
            Validator::Enum(rule) => validate_enum(flags, rule),
            Validator::Numeric(flag) => validate_numeric(flags, flag),
        }
    }
}

/// Confirm an enumerated flag's value belongs to the rule's allowed set
pub fn validate_enum(flags: &ParsedFlags, rule: &ValidationRule) -> Result<(), CliError> {
    let value = flags.string(rule.flag)?;
    if rule.allowed.iter().any(|allowed| *allowed == value) {
        return Ok(());
    }
    Err(CliError::InvalidFlagValue {
        flag: rule.flag.to_string(),
        value,
        allowed: rule.allowed.iter().map(|s| s.to_string()).collect(),
    })
}

/// Confirm an ID flag is unset or a base-10 unsigned integer
pub fn validate_numeric(flags: &ParsedFlags, flag: &str) -> Result<(), CliError> {
    match flags.optional_string(flag)? {
        Some(value) => parse_numeric_id(flag, &value).map(|_| ()),
        None => Ok(()),
    }
}

/// Parse a base-10 ID made of ASCII digits only; signs and whitespace are rejected
pub fn parse_numeric_id(flag: &str, value: &str) -> Result<u64, CliError> {
    let malformed = || CliError::MalformedFlagValue {
        flag: flag.to_string(),
        value: value.to_string(),
        reason: "expected a numeric ID".to_string(),
    };
    if value.is_empty() || !value.bytes().all(|b| b.is_ascii_digit()) {
        return Err(malformed());
    }
    value.parse::<u64>().map_err(|_| malformed())
}

/// Run validators in order; the first failure wins
pub fn run_validators(flags: &ParsedFlags, validators: &[Validator]) -> Result<(), CliError> {
    for validator in validators {
        validator.check(flags)?;
    }
    Ok(())
}
