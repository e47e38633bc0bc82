//! Caller-supplied checks.

use std::fmt;
use std::sync::Arc;

use validecor::{ArgMap, ArgName, ArgType, Cause, ValidecorError, Validator, Value};

/// Signature of a custom check: `Err(reason)` rejects the argument.
pub type CheckFn = dyn Fn(&Value) -> Result<(), String> + Send + Sync;

/// Runs a simple custom check against the argument.
#[derive(Clone)]
pub struct Custom {
    label: String,
    check: Arc<CheckFn>,
}

impl Custom {
    /// Wraps `check` under `label`; the label appears in the validator's
    /// `repr`.
    pub fn new(
        label: impl Into<String>,
        check: impl Fn(&Value) -> Result<(), String> + Send + Sync + 'static,
    ) -> Self {
        Self { label: label.into(), check: Arc::new(check) }
    }

    /// Wraps an already shared check.
    pub fn from_arc(label: impl Into<String>, check: Arc<CheckFn>) -> Self {
        Self { label: label.into(), check }
    }

    /// Wraps a boolean predicate; `false` rejects.
    pub fn predicate(
        label: impl Into<String>,
        predicate: impl Fn(&Value) -> bool + Send + Sync + 'static,
    ) -> Self {
        let label = label.into();
        let reason = format!("predicate '{label}' returned false");
        Self::new(label, move |v| if predicate(v) { Ok(()) } else { Err(reason.clone()) })
    }
}

impl fmt::Display for Custom {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Custom({})", self.label)
    }
}

impl fmt::Debug for Custom {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Custom").field("label", &self.label).finish_non_exhaustive()
    }
}

impl Validator for Custom {
    fn validate(
        &self,
        arg_name: &ArgName,
        arg_type: ArgType,
        _source: &ArgMap,
        target: &mut ArgMap,
    ) -> Result<(), ValidecorError> {
        let outcome = match target.get(arg_name.as_str()) {
            Some(arg) => (self.check)(arg).map_err(|reason| Cause::Rejected { reason }),
            None => Err(Cause::MissingKey { key: arg_name.to_string() }),
        };
        outcome.map_err(|cause| ValidecorError::rejected(arg_name, arg_type, self, Some(cause)))
    }
}
