//! Declared signatures and argument binding.
//!
//! An [`ArgSpec`] is the explicit counterpart of a function's parameter list:
//! positional-or-keyword parameters, an optional variadic-positional
//! collector, keyword-only parameters, an optional variadic-keyword collector,
//! and per-parameter [`Annotation`]s.
//!
//! [`ArgSpec::get_arg_map`] turns a [`CallArgs`] into the canonical name→value
//! map; [`ArgSpec::to_call_args`] is its inverse and rebuilds the call the
//! wrapped function receives.

use std::collections::HashSet;
use std::fmt;

use crate::{Annotation, ArgMap, ArgName, CallArgs, SpecError, ValidecorError, Value};

/// One named parameter with an optional default.
#[derive(Debug, Clone, PartialEq)]
pub struct Param {
    /// Parameter name.
    pub name: ArgName,
    /// Default used when the call supplies no value.
    pub default: Option<Value>,
}

/// Declared signature of a callable.
#[derive(Debug, Clone)]
pub struct ArgSpec {
    name: String,
    params: Vec<Param>,
    varargs: Option<ArgName>,
    kwonly: Vec<Param>,
    varkw: Option<ArgName>,
    annotations: Vec<(ArgName, Annotation)>,
}

impl ArgSpec {
    /// Creates an empty signature for the callable `name`.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            params: Vec::new(),
            varargs: None,
            kwonly: Vec::new(),
            varkw: None,
            annotations: Vec::new(),
        }
    }

    // -- builder ------------------------------------------------------------

    /// Adds a required positional-or-keyword parameter.
    pub fn param(mut self, name: ArgName) -> Self {
        self.params.push(Param { name, default: None });
        self
    }

    /// Adds a positional-or-keyword parameter with a default.
    pub fn param_default(mut self, name: ArgName, default: impl Into<Value>) -> Self {
        self.params.push(Param { name, default: Some(default.into()) });
        self
    }

    /// Names the variadic-positional collector.
    pub fn varargs(mut self, name: ArgName) -> Self {
        self.varargs = Some(name);
        self
    }

    /// Adds a required keyword-only parameter.
    pub fn kwonly(mut self, name: ArgName) -> Self {
        self.kwonly.push(Param { name, default: None });
        self
    }

    /// Adds a keyword-only parameter with a default.
    pub fn kwonly_default(mut self, name: ArgName, default: impl Into<Value>) -> Self {
        self.kwonly.push(Param { name, default: Some(default.into()) });
        self
    }

    /// Names the variadic-keyword collector.
    pub fn varkw(mut self, name: ArgName) -> Self {
        self.varkw = Some(name);
        self
    }

    /// Annotates a parameter. Annotations run in the order they are added.
    pub fn annotate(mut self, name: ArgName, annotation: Annotation) -> Self {
        self.annotations.push((name, annotation));
        self
    }

    // -- accessors ----------------------------------------------------------

    /// Name of the described callable.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Positional-or-keyword parameters, in order.
    pub fn params(&self) -> &[Param] {
        &self.params
    }

    /// Variadic-positional collector name.
    pub fn varargs_name(&self) -> Option<&ArgName> {
        self.varargs.as_ref()
    }

    /// Keyword-only parameters, in order.
    pub fn kwonly_params(&self) -> &[Param] {
        &self.kwonly
    }

    /// Variadic-keyword collector name.
    pub fn varkw_name(&self) -> Option<&ArgName> {
        self.varkw.as_ref()
    }

    /// Annotations, in declaration order.
    pub fn annotations(&self) -> &[(ArgName, Annotation)] {
        &self.annotations
    }

    fn all_names(&self) -> impl Iterator<Item = &ArgName> {
        self.params
            .iter()
            .map(|p| &p.name)
            .chain(self.varargs.iter())
            .chain(self.kwonly.iter().map(|p| &p.name))
            .chain(self.varkw.iter())
    }

    // -- decoration-time check ----------------------------------------------

    /// Checks the signature is well formed.
    ///
    /// Names must be unique, a required positional parameter may not follow
    /// a defaulted one, and every annotation must name a declared parameter
    /// at most once.
    pub fn check(&self) -> Result<(), SpecError> {
        let mut seen = HashSet::new();
        for name in self.all_names() {
            if !seen.insert(name.as_str()) {
                return Err(SpecError::DuplicateParameter {
                    function: self.name.clone(),
                    name: name.clone(),
                });
            }
        }

        let mut defaulted = false;
        for p in &self.params {
            match (&p.default, defaulted) {
                (Some(_), _) => defaulted = true,
                (None, true) => {
                    return Err(SpecError::DefaultOrder {
                        function: self.name.clone(),
                        name: p.name.clone(),
                    })
                }
                (None, false) => {}
            }
        }

        let mut annotated = HashSet::new();
        for (name, _) in &self.annotations {
            if !seen.contains(name.as_str()) {
                return Err(SpecError::UnknownParameter {
                    function: self.name.clone(),
                    name: name.clone(),
                });
            }
            if !annotated.insert(name.as_str()) {
                return Err(SpecError::DuplicateAnnotation {
                    function: self.name.clone(),
                    name: name.clone(),
                });
            }
        }
        Ok(())
    }

    // -- defaults -----------------------------------------------------------

    /// Defaults of positional-or-keyword parameters.
    pub fn map_defaults(&self) -> ArgMap {
        collect_defaults(&self.params)
    }

    /// Defaults of keyword-only parameters.
    pub fn map_kwdefaults(&self) -> ArgMap {
        collect_defaults(&self.kwonly)
    }

    /// All declared defaults.
    pub fn get_arg_def(&self) -> ArgMap {
        let mut defaults = self.map_defaults();
        defaults.extend(self.map_kwdefaults());
        defaults
    }

    // -- binding ------------------------------------------------------------

    /// Binds a call against this signature.
    ///
    /// Positional values fill positional parameters in order; a positional
    /// parameter may also be supplied by keyword. Missing parameters take
    /// their default or fail with `ArgMiss`. Surplus positional values go to
    /// the variadic-positional collector as a list, unconsumed keywords to
    /// the variadic-keyword collector as a dict; without a collector the
    /// surplus is `ArgCount`.
    pub fn get_arg_map(&self, call: &CallArgs) -> Result<ArgMap, ValidecorError> {
        let mut arg_map = ArgMap::new();
        let mut consumed: HashSet<&str> = HashSet::new();

        for (i, p) in self.params.iter().enumerate() {
            let by_keyword = call.keyword.get(p.name.as_str());
            let value = match (call.positional.get(i), by_keyword) {
                (Some(_), Some(_)) => {
                    return Err(ValidecorError::ArgCount {
                        message: format!("multiple values for argument '{}'", p.name),
                    })
                }
                (Some(v), None) => v.clone(),
                (None, Some(v)) => {
                    consumed.insert(p.name.as_str());
                    v.clone()
                }
                (None, None) => p
                    .default
                    .clone()
                    .ok_or_else(|| ValidecorError::ArgMiss { arg_name: p.name.clone() })?,
            };
            arg_map.insert(p.name.to_string(), value);
        }

        let surplus = call.positional.get(self.params.len()..).unwrap_or_default();
        match &self.varargs {
            Some(name) => {
                arg_map.insert(name.to_string(), Value::Array(surplus.to_vec()));
            }
            None if !surplus.is_empty() => {
                return Err(ValidecorError::ArgCount { message: "Too many args".into() });
            }
            None => {}
        }

        for p in &self.kwonly {
            let value = match call.keyword.get(p.name.as_str()) {
                Some(v) => {
                    consumed.insert(p.name.as_str());
                    v.clone()
                }
                None => p
                    .default
                    .clone()
                    .ok_or_else(|| ValidecorError::ArgMiss { arg_name: p.name.clone() })?,
            };
            arg_map.insert(p.name.to_string(), value);
        }

        let extra: ArgMap = call
            .keyword
            .iter()
            .filter(|(k, _)| !consumed.contains(k.as_str()))
            .map(|(k, v)| (k.clone(), v.clone()))
            .collect();
        match &self.varkw {
            Some(name) => {
                arg_map.insert(name.to_string(), Value::Object(extra));
            }
            None if !extra.is_empty() => {
                return Err(ValidecorError::ArgCount { message: "Too many kwargs".into() });
            }
            None => {}
        }

        Ok(arg_map)
    }

    /// Rebuilds the call for this signature from a resolved argument map.
    ///
    /// The variadic-positional entry must be a list and the variadic-keyword
    /// entry a dict whose keys do not repeat a keyword-only parameter; either
    /// may be absent from the map, in which case it contributes nothing.
    pub fn to_call_args(&self, arg_map: &ArgMap) -> Result<CallArgs, ValidecorError> {
        let lookup = |name: &ArgName| {
            arg_map
                .get(name.as_str())
                .cloned()
                .ok_or_else(|| ValidecorError::ArgMiss { arg_name: name.clone() })
        };

        let mut call = CallArgs::new();
        for p in &self.params {
            call.positional.push(lookup(&p.name)?);
        }
        if let Some(name) = &self.varargs {
            match arg_map.get(name.as_str()) {
                Some(Value::Array(rest)) => call.positional.extend(rest.iter().cloned()),
                Some(_) => {
                    return Err(ValidecorError::ArgCount {
                        message: format!("variadic argument '{name}' must resolve to a list"),
                    })
                }
                None => {}
            }
        }

        for p in &self.kwonly {
            call.keyword.insert(p.name.to_string(), lookup(&p.name)?);
        }
        if let Some(name) = &self.varkw {
            match arg_map.get(name.as_str()) {
                Some(Value::Object(extra)) => {
                    for (k, v) in extra {
                        if call.keyword.contains_key(k) {
                            return Err(ValidecorError::ArgCount {
                                message: format!("multiple values for argument '{k}'"),
                            });
                        }
                        call.keyword.insert(k.clone(), v.clone());
                    }
                }
                Some(_) => {
                    return Err(ValidecorError::ArgCount {
                        message: format!("variadic keyword argument '{name}' must resolve to a dict"),
                    })
                }
                None => {}
            }
        }
        Ok(call)
    }
}

/// Renders the parameter list, e.g. `f(a, b=1, *rest, k=null, **extra)`.
impl fmt::Display for ArgSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut parts = Vec::new();
        let render = |p: &Param| match &p.default {
            Some(d) => format!("{}={d}", p.name),
            None => p.name.to_string(),
        };
        parts.extend(self.params.iter().map(render));
        match &self.varargs {
            Some(name) => parts.push(format!("*{name}")),
            None if !self.kwonly.is_empty() => parts.push("*".to_string()),
            None => {}
        }
        parts.extend(self.kwonly.iter().map(render));
        if let Some(name) = &self.varkw {
            parts.push(format!("**{name}"));
        }
        write!(f, "{}({})", self.name, parts.join(", "))
    }
}

fn collect_defaults(params: &[Param]) -> ArgMap {
    params
        .iter()
        .filter_map(|p| p.default.clone().map(|d| (p.name.to_string(), d)))
        .collect()
}
