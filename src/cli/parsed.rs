//! Typed flag state for one invocation.
//!
//! [`ParsedFlags`] maps flag names to tagged values. It is filled from clap
//! matches against the command's registered [`FlagSpec`]s, with defaults for
//! flags that were not given. Lookups of an unknown name or of the wrong kind
//! return [`CliError::FlagAccess`], which only a broken registration can cause.

use super::flags::{FlagKind, FlagSpec, FlagValue};
use crate::error::CliError;
use clap::ArgMatches;
use std::collections::BTreeMap;

#[derive(Debug, Clone, PartialEq, Eq)]
struct Entry {
    value: FlagValue,
    explicit: bool,
}

/// Parsed flags and positional arguments of a leaf command
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedFlags {
    command: String,
    values: BTreeMap<String, Entry>,
    args: Vec<String>,
}

impl ParsedFlags {
    /// Empty state for the named command
    pub fn new(command: &str) -> Self {
        Self {
            command: command.to_string(),
            values: BTreeMap::new(),
            args: Vec::new(),
        }
    }

    /// Read every registered flag out of clap matches
    pub fn from_matches(
        command: &str,
        specs: &[&FlagSpec],
        matches: &ArgMatches,
    ) -> Result<Self, CliError> {
        let mut parsed = Self::new(command);

        for spec in specs {
            let access = |e: clap::parser::MatchesError| parsed_access_error(command, spec.name, e);
            let given = match spec.kind() {
                FlagKind::String => matches
                    .try_get_one::<String>(spec.name)
                    .map_err(access)?
                    .map(|s| FlagValue::String(s.clone())),
                FlagKind::Bool => matches
                    .try_get_one::<bool>(spec.name)
                    .map_err(access)?
                    .map(|b| FlagValue::Bool(*b)),
                FlagKind::StringSet => matches
                    .try_get_many::<String>(spec.name)
                    .map_err(access)?
                    .map(|values| {
                        let mut set: Vec<String> = Vec::new();
                        for value in values {
                            let value = value.trim();
                            if !value.is_empty() && !set.iter().any(|v| v == value) {
                                set.push(value.to_string());
                            }
                        }
                        FlagValue::StringSet(set)
                    }),
            };

            match given {
                Some(value) => parsed.insert(spec.name, value, true),
                None => parsed.insert(spec.name, spec.default.clone(), false),
            }
        }

        if let Some(args) = matches
            .try_get_many::<String>(super::tree::ARGS_ID)
            .map_err(|e| parsed_access_error(command, super::tree::ARGS_ID, e))?
        {
            parsed.args = args.cloned().collect();
        }

        Ok(parsed)
    }

    /// Record a value; `explicit` marks it as given on the command line
    pub fn insert(&mut self, name: &str, value: FlagValue, explicit: bool) {
        self.values
            .insert(name.to_string(), Entry { value, explicit });
    }

    /// Replace the positional arguments
    pub fn set_args(&mut self, args: Vec<String>) {
        self.args = args;
    }

    /// Command these flags belong to
    pub fn command(&self) -> &str {
        &self.command
    }

    /// Positional arguments
    pub fn args(&self) -> &[String] {
        &self.args
    }

    /// Whether the flag was given on the command line
    pub fn is_set(&self, name: &str) -> bool {
        self.values.get(name).is_some_and(|e| e.explicit)
    }

    fn entry(&self, name: &str, kind: FlagKind) -> Result<&Entry, CliError> {
        let entry = self
            .values
            .get(name)
            .ok_or_else(|| self.access_error(name, "flag is not registered".to_string()))?;
        if entry.value.kind() != kind {
            return Err(self.access_error(
                name,
                format!("flag is {:?}, read as {:?}", entry.value.kind(), kind),
            ));
        }
        Ok(entry)
    }

    /// String value, default included
    pub fn string(&self, name: &str) -> Result<String, CliError> {
        match &self.entry(name, FlagKind::String)?.value {
            FlagValue::String(s) => Ok(s.clone()),
            _ => Err(self.access_error(name, "kind mismatch".to_string())),
        }
    }

    /// String value, `None` when empty
    pub fn optional_string(&self, name: &str) -> Result<Option<String>, CliError> {
        Ok(Some(self.string(name)?).filter(|s| !s.is_empty()))
    }

    /// String value only if given on the command line and non-empty
    pub fn explicit_string(&self, name: &str) -> Result<Option<String>, CliError> {
        let value = self.optional_string(name)?;
        Ok(value.filter(|_| self.is_set(name)))
    }

    /// Bool value, default included
    pub fn bool(&self, name: &str) -> Result<bool, CliError> {
        match &self.entry(name, FlagKind::Bool)?.value {
            FlagValue::Bool(b) => Ok(*b),
            _ => Err(self.access_error(name, "kind mismatch".to_string())),
        }
    }

    /// Bool value only if given on the command line
    pub fn explicit_bool(&self, name: &str) -> Result<Option<bool>, CliError> {
        let value = self.bool(name)?;
        Ok(Some(value).filter(|_| self.is_set(name)))
    }

    /// String-set value, default included
    pub fn string_set(&self, name: &str) -> Result<Vec<String>, CliError> {
        match &self.entry(name, FlagKind::StringSet)?.value {
            FlagValue::StringSet(values) => Ok(values.clone()),
            _ => Err(self.access_error(name, "kind mismatch".to_string())),
        }
    }

    fn access_error(&self, name: &str, reason: String) -> CliError {
        CliError::FlagAccess {
            command: self.command.clone(),
            flag: name.to_string(),
            reason,
        }
    }
}

fn parsed_access_error(command: &str, flag: &str, e: clap::parser::MatchesError) -> CliError {
    CliError::FlagAccess {
        command: command.to_string(),
        flag: flag.to_string(),
        reason: e.to_string(),
    }
}
