//! The decorator: argument binding, mapping, and validation around a callable.
//!
//! ```text
//! CallArgs ──bind(source or target)──► source map
//!                                          │
//!            target map ◄── defaults ──────┤ (source spec given)
//!            target map ◄── source map ────┘ (no source spec)
//!                 │
//!       annotations, in order ──► Map / Validator / BadMetadata
//!                 │
//!   rebuild CallArgs from target map ──► wrapped function
//! ```

use tracing::{debug, debug_span, trace};

use crate::{ArgSpec, CallArgs, CallId, Metadata, SpecError, ValidecorError, Value};

/// Decorates callables described by a target [`ArgSpec`], optionally called
/// through a different source [`ArgSpec`].
#[derive(Debug, Clone)]
pub struct Validecor {
    target: ArgSpec,
    source: Option<ArgSpec>,
}

/// Starts a decoration for `target`, checking the signature.
pub fn validecor(target: ArgSpec) -> Result<Validecor, SpecError> {
    Validecor::new(target)
}

impl Validecor {
    /// Checks `target` and prepares the decoration.
    pub fn new(target: ArgSpec) -> Result<Self, SpecError> {
        target.check()?;
        Ok(Self { target, source: None })
    }

    /// Calls are bound against `source` instead of the target signature;
    /// target parameters start from their defaults and are filled by
    /// [`crate::Map`] annotations.
    pub fn with_source(mut self, source: ArgSpec) -> Result<Self, SpecError> {
        source.check()?;
        self.source = Some(source);
        Ok(self)
    }

    /// The signature of the wrapped callable.
    pub fn target(&self) -> &ArgSpec {
        &self.target
    }

    /// The caller-facing signature, if different from the target.
    pub fn source(&self) -> Option<&ArgSpec> {
        self.source.as_ref()
    }

    /// Binds, maps, and validates `call`, returning the call the wrapped
    /// function receives.
    pub fn resolve(&self, call: &CallArgs) -> Result<CallArgs, ValidecorError> {
        let source_spec = self.source().unwrap_or(&self.target);
        let source_map = source_spec.get_arg_map(call)?;
        trace!(?source_map, "bound source arguments");

        let mut target_map = match &self.source {
            None => source_map.clone(),
            Some(_) => {
                let mut defaults = self.target.get_arg_def();
                if let Some(name) = self.target.varargs_name() {
                    defaults.insert(name.to_string(), Value::Array(Vec::new()));
                }
                if let Some(name) = self.target.varkw_name() {
                    defaults.insert(name.to_string(), Value::Object(Default::default()));
                }
                defaults
            }
        };

        for (arg_name, annotation) in self.target.annotations() {
            for metadata in &annotation.metadata {
                match metadata {
                    Metadata::Validator(validator) => {
                        validator
                            .validate(arg_name, annotation.arg_type, &source_map, &mut target_map)
                            .inspect_err(|err| {
                                debug!(arg = %arg_name, validator = %validator, error = %err, "argument rejected");
                            })?;
                    }
                    Metadata::Opaque(value) => {
                        return Err(ValidecorError::BadMetadata {
                            arg_name: arg_name.clone(),
                            metadata: value.to_string(),
                        });
                    }
                }
            }
        }

        self.target.to_call_args(&target_map)
    }

    /// Wraps `f`, producing a callable that resolves every call first.
    pub fn wrap<F, R>(self, f: F) -> Decorated<F>
    where
        F: Fn(CallArgs) -> R,
    {
        Decorated { decor: self, f }
    }
}

/// A callable wrapped by [`Validecor`].
#[derive(Debug, Clone)]
pub struct Decorated<F> {
    decor: Validecor,
    f: F,
}

impl<F> Decorated<F> {
    /// Resolves `call` and invokes the wrapped callable with the result.
    ///
    /// The callable never runs when binding, mapping, or validation fails.
    pub fn call<R>(&self, call: CallArgs) -> Result<R, ValidecorError>
    where
        F: Fn(CallArgs) -> R,
    {
        let call_id = CallId::new_random();
        let span = debug_span!("validecor.call", function = %self.decor.target.name(), %call_id);
        let _guard = span.enter();

        let resolved = self.decor.resolve(&call)?;
        debug!("arguments resolved");
        Ok((self.f)(resolved))
    }
}
