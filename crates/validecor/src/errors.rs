//! Error types.
//!
//! [`ValidecorError`] is raised at call time: binding, mapping, and validation
//! failures. Every variant carries an [`ErrorType`] tag so callers can branch
//! on the kind of failure without matching on message text.
//!
//! [`SpecError`] is raised at decoration time, when a signature is checked or
//! loaded. A decorated function never runs with an invalid signature.
//!
//! [`Cause`] is the sub-error attached to mapping and validation failures.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::{ArgName, ArgType};

// ---------------------------------------------------------------------------
// Error tags
// ---------------------------------------------------------------------------

/// Kind of a call-time failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ErrorType {
    /// Too many positional or keyword arguments, or a malformed variadic entry.
    ArgCount,
    /// A [`crate::Map`] could not resolve its path and no default existed.
    ArgMap,
    /// A required parameter received no value.
    ArgMiss,
    /// A validator rejected the argument.
    ArgVal,
    /// An annotation carried metadata that is not a validator.
    BadMetadata,
}

impl ErrorType {
    /// Canonical human-readable message for this tag.
    pub fn message(self) -> &'static str {
        match self {
            Self::ArgCount => "Unexpected argument count",
            Self::ArgMap => "Argument map failed",
            Self::ArgMiss => "Argument missing",
            Self::ArgVal => "Argument validation failed",
            Self::BadMetadata => {
                "Invalid annotation metadata - only Validator instances are allowed"
            }
        }
    }

    /// Tag name (`"ArgCount"`, ...).
    pub fn name(self) -> &'static str {
        match self {
            Self::ArgCount => "ArgCount",
            Self::ArgMap => "ArgMap",
            Self::ArgMiss => "ArgMiss",
            Self::ArgVal => "ArgVal",
            Self::BadMetadata => "BadMetadata",
        }
    }
}

impl std::fmt::Display for ErrorType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

// ---------------------------------------------------------------------------
// Sub-errors
// ---------------------------------------------------------------------------

/// Why a map node or a validator failed.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum Cause {
    /// A key node found a dict without that key.
    #[error("key '{key}' not found")]
    MissingKey {
        /// The key that was looked up.
        key: String,
    },

    /// An index node was outside the list.
    #[error("index {index} out of range for list of length {len}")]
    IndexOutOfRange {
        /// The (possibly negative) index that was applied.
        index: i64,
        /// Length of the list it was applied to.
        len: usize,
    },

    /// A key or index node was applied to a value that cannot be subscripted
    /// that way.
    #[error("{found} value is not subscriptable by {node}")]
    NotSubscriptable {
        /// `repr` of the node.
        node: String,
        /// Type of the value the node was applied to.
        found: ArgType,
    },

    /// An attribute node found no such attribute.
    #[error("{found} value has no attribute '{name}'")]
    MissingAttribute {
        /// Attribute name.
        name: String,
        /// Type of the value the attribute was read from.
        found: ArgType,
    },

    /// Two values have no ordering relative to each other.
    #[error("'{found}' and '{bound}' values cannot be compared")]
    Incomparable {
        /// Type of the argument.
        found: ArgType,
        /// Type of the bound it was compared to.
        bound: ArgType,
    },

    /// A value could not be converted to the requested type.
    #[error("cannot convert {from} to {to}: {reason}")]
    Conversion {
        /// Source type.
        from: ArgType,
        /// Requested type.
        to: ArgType,
        /// What went wrong.
        reason: String,
    },

    /// A custom predicate or transform rejected the value.
    #[error("{reason}")]
    Rejected {
        /// Message returned by the predicate or transform.
        reason: String,
    },
}

// ---------------------------------------------------------------------------
// Call-time errors
// ---------------------------------------------------------------------------

/// A call-time failure, tagged by [`ErrorType`].
///
/// Rendered as `<message> (type: <Tag>, key: value, ...)`, listing the context
/// each variant carries.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ValidecorError {
    /// Surplus positional/keyword arguments, a value given twice, or a
    /// variadic entry of the wrong shape.
    #[error("Unexpected argument count (type: ArgCount, message: '{message}')")]
    ArgCount {
        /// Description of the count problem.
        message: String,
    },

    /// A map path failed and the target had no default to fall back on.
    #[error(
        "Argument map failed (type: ArgMap, arg_name: '{arg_name}', arg_type: {arg_type}, \
         arg_map: {arg_map}, last_node: {last_node}, sub_error: {sub_error})"
    )]
    ArgMap {
        /// Target parameter being mapped.
        arg_name: ArgName,
        /// Declared type of the target parameter.
        arg_type: ArgType,
        /// `repr` of the map.
        arg_map: String,
        /// `repr` of the node that failed.
        last_node: String,
        /// Why the node failed.
        #[source]
        sub_error: Cause,
    },

    /// A required parameter had neither an argument nor a default.
    #[error("Argument missing (type: ArgMiss, arg_name: '{arg_name}')")]
    ArgMiss {
        /// The missing parameter.
        arg_name: ArgName,
    },

    /// A validator rejected the argument.
    #[error(
        "Argument validation failed (type: ArgVal, arg_name: '{arg_name}', arg_type: {arg_type}, \
         validator: {validator}{})",
        render_val_context(.actual_type, .sub_error)
    )]
    ArgVal {
        /// The rejected parameter.
        arg_name: ArgName,
        /// Declared (or overriding) type used by the validator.
        arg_type: ArgType,
        /// `repr` of the validator.
        validator: String,
        /// Observed type, for type checks.
        actual_type: Option<ArgType>,
        /// Underlying failure, when the validator did not reject by itself.
        #[source]
        sub_error: Option<Cause>,
    },

    /// An annotation carried metadata that is not a validator.
    #[error("{} (type: BadMetadata, arg_name: '{arg_name}', metadata: {metadata})", ErrorType::BadMetadata.message())]
    BadMetadata {
        /// The annotated parameter.
        arg_name: ArgName,
        /// The offending metadata, rendered.
        metadata: String,
    },
}

fn render_val_context(actual_type: &Option<ArgType>, sub_error: &Option<Cause>) -> String {
    let mut out = String::new();
    if let Some(actual) = actual_type {
        out.push_str(&format!(", actual_type: {actual}"));
    }
    if let Some(cause) = sub_error {
        out.push_str(&format!(", sub_error: {cause}"));
    }
    out
}

impl ValidecorError {
    /// The tag of this error.
    pub fn error_type(&self) -> ErrorType {
        match self {
            Self::ArgCount { .. } => ErrorType::ArgCount,
            Self::ArgMap { .. } => ErrorType::ArgMap,
            Self::ArgMiss { .. } => ErrorType::ArgMiss,
            Self::ArgVal { .. } => ErrorType::ArgVal,
            Self::BadMetadata { .. } => ErrorType::BadMetadata,
        }
    }

    /// The parameter the error is about, if any.
    pub fn arg_name(&self) -> Option<&ArgName> {
        match self {
            Self::ArgCount { .. } => None,
            Self::ArgMap { arg_name, .. }
            | Self::ArgMiss { arg_name }
            | Self::ArgVal { arg_name, .. }
            | Self::BadMetadata { arg_name, .. } => Some(arg_name),
        }
    }

    /// Shorthand for an [`ValidecorError::ArgVal`] rejection with no
    /// observed type.
    pub fn rejected(
        arg_name: &ArgName,
        arg_type: ArgType,
        validator: &dyn std::fmt::Display,
        sub_error: Option<Cause>,
    ) -> Self {
        Self::ArgVal {
            arg_name: arg_name.clone(),
            arg_type,
            validator: validator.to_string(),
            actual_type: None,
            sub_error,
        }
    }
}

// ---------------------------------------------------------------------------
// Decoration-time errors
// ---------------------------------------------------------------------------

/// A signature that cannot be decorated.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SpecError {
    /// The same name is declared for two parameters.
    #[error("{function}: duplicate parameter '{name}'")]
    DuplicateParameter {
        /// Signature owner.
        function: String,
        /// Repeated name.
        name: ArgName,
    },

    /// A positional parameter without a default follows one with a default.
    #[error("{function}: parameter '{name}' without a default follows a parameter with a default")]
    DefaultOrder {
        /// Signature owner.
        function: String,
        /// Offending parameter.
        name: ArgName,
    },

    /// An annotation names a parameter that is not declared.
    #[error("{function}: annotation for undeclared parameter '{name}'")]
    UnknownParameter {
        /// Signature owner.
        function: String,
        /// Annotated name.
        name: ArgName,
    },

    /// A parameter is annotated twice.
    #[error("{function}: parameter '{name}' is annotated more than once")]
    DuplicateAnnotation {
        /// Signature owner.
        function: String,
        /// Annotated name.
        name: ArgName,
    },

    /// A declarative signature refers to a predicate or transform that is not
    /// registered.
    #[error("unknown {kind} '{name}'")]
    UnknownCallable {
        /// `"predicate"` or `"transform"`.
        kind: &'static str,
        /// Requested name.
        name: String,
    },

    /// A declarative signature could not be parsed.
    #[error("malformed signature document: {message}")]
    Malformed {
        /// Parser message.
        message: String,
    },
}
