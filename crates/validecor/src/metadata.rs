//! The annotation metadata protocol.
//!
//! A parameter annotation is a declared [`ArgType`] plus an ordered list of
//! [`Metadata`] entries. Each entry is either a [`Validator`] (which includes
//! [`crate::Map`]) or an opaque value that the decorator refuses at call time.

use std::fmt;
use std::sync::Arc;

use crate::{ArgMap, ArgName, ArgType, ValidecorError, Value};

/// Run-time check (or rewrite) of one argument.
///
/// Implementations fail with an appropriate [`ValidecorError`] on invalid
/// input. They may read the source map (arguments as bound against the
/// caller-facing signature) and read or rewrite the target map (arguments as
/// they will be passed to the wrapped function).
///
/// `Display` is the validator's `repr`, recorded in error context.
pub trait Validator: fmt::Display + Send + Sync {
    /// Validates `target[arg_name]`.
    ///
    /// - `arg_name`: declared parameter name.
    /// - `arg_type`: declared parameter type.
    /// - `source`: argument map according to the source signature.
    /// - `target`: argument map according to the target signature.
    fn validate(
        &self,
        arg_name: &ArgName,
        arg_type: ArgType,
        source: &ArgMap,
        target: &mut ArgMap,
    ) -> Result<(), ValidecorError>;
}

/// One entry of an annotation's metadata list.
#[derive(Clone)]
pub enum Metadata {
    /// A validator, run at call time.
    Validator(Arc<dyn Validator>),
    /// Anything else. Raises [`ValidecorError::BadMetadata`] when reached.
    Opaque(Value),
}

impl Metadata {
    /// Wraps a validator.
    pub fn validator(v: impl Validator + 'static) -> Self {
        Self::Validator(Arc::new(v))
    }
}

impl fmt::Display for Metadata {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Validator(v) => write!(f, "{v}"),
            Self::Opaque(value) => write!(f, "{value}"),
        }
    }
}

impl fmt::Debug for Metadata {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Validator(v) => f.debug_tuple("Validator").field(&format_args!("{v}")).finish(),
            Self::Opaque(value) => f.debug_tuple("Opaque").field(value).finish(),
        }
    }
}

impl<V: Validator + 'static> From<V> for Metadata {
    fn from(v: V) -> Self {
        Self::validator(v)
    }
}

/// Declared type plus metadata for one parameter.
#[derive(Debug, Clone, Default)]
pub struct Annotation {
    /// Declared type, passed to every validator.
    pub arg_type: ArgType,
    /// Metadata entries, run in order.
    pub metadata: Vec<Metadata>,
}

impl Annotation {
    /// Creates an annotation with no metadata.
    pub fn new(arg_type: ArgType) -> Self {
        Self { arg_type, metadata: Vec::new() }
    }

    /// Appends a metadata entry.
    pub fn with(mut self, metadata: impl Into<Metadata>) -> Self {
        self.metadata.push(metadata.into());
        self
    }

    /// Appends an opaque (non-validator) metadata entry.
    pub fn with_opaque(mut self, value: impl Into<Value>) -> Self {
        self.metadata.push(Metadata::Opaque(value.into()));
        self
    }
}
