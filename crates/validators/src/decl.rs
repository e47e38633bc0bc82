//! Declarative signatures loaded from JSON.
//!
//! ```json
//! {
//!   "name": "transfer",
//!   "params": [{"name": "amount"}, {"name": "note", "default": ""}],
//!   "varargs": "rest",
//!   "kwonly": [{"name": "currency", "default": "EUR"}],
//!   "varkw": "extra",
//!   "annotations": [
//!     {"param": "amount", "type": "int",
//!      "metadata": [{"is_typable": null}, {"between": [0, 1000]}]}
//!   ]
//! }
//! ```
//!
//! An entry keyed by a validator name must match that validator's shape, or
//! the document is malformed. Any other entry is kept as opaque metadata: the
//! signature loads (with a warning) and calls fail with `BadMetadata` when
//! they reach the entry.

use serde::{Deserialize, Serialize};
use tracing::warn;
use validecor::{
    Annotation, ArgName, ArgSpec, ArgType, Attr, Map, Metadata, Node, SpecError, Transform, Value,
};

use crate::{Between, Custom, IsTypable, IsType, Registry};

/// A parameter declaration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ParamDecl {
    /// Parameter name.
    pub name: ArgName,
    /// Default value. Absent means required; `null` is a real default.
    #[serde(default, skip_serializing_if = "Option::is_none", deserialize_with = "present")]
    pub default: Option<Value>,
}

/// Distinguishes `"default": null` (a default of none) from an absent key.
fn present<'de, D>(deserializer: D) -> Result<Option<Value>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    Value::deserialize(deserializer).map(Some)
}

/// An annotation declaration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct AnnotationDecl {
    /// Annotated parameter.
    pub param: ArgName,
    /// Declared type.
    #[serde(rename = "type", default)]
    pub arg_type: ArgType,
    /// Raw metadata entries, interpreted by [`SignatureDecl::build`].
    #[serde(default)]
    pub metadata: Vec<Value>,
}

/// A whole signature document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SignatureDecl {
    /// Callable name.
    pub name: String,
    /// Positional-or-keyword parameters.
    #[serde(default)]
    pub params: Vec<ParamDecl>,
    /// Variadic-positional collector.
    #[serde(default)]
    pub varargs: Option<ArgName>,
    /// Keyword-only parameters.
    #[serde(default)]
    pub kwonly: Vec<ParamDecl>,
    /// Variadic-keyword collector.
    #[serde(default)]
    pub varkw: Option<ArgName>,
    /// Annotations, run in order.
    #[serde(default)]
    pub annotations: Vec<AnnotationDecl>,
}

/// A recognised validator declaration.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "snake_case")]
enum ValidatorDecl {
    Between(Value, Value),
    IsType(Option<ArgType>),
    IsTypable(Option<ArgType>),
    Custom(String),
    Map(Vec<NodeDecl>),
}

/// A map node declaration.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
enum NodeDecl {
    Index(i64),
    Key(String),
    Attr {
        attr: String,
    },
    Call {
        call: String,
    },
}

impl SignatureDecl {
    /// Parses a JSON signature document.
    pub fn from_json(text: &str) -> Result<Self, SpecError> {
        serde_json::from_str(text).map_err(|e| SpecError::Malformed { message: e.to_string() })
    }

    /// Builds and checks the [`ArgSpec`], resolving named predicates and
    /// transforms through `registry`.
    pub fn build(&self, registry: &Registry) -> Result<ArgSpec, SpecError> {
        let mut spec = ArgSpec::new(self.name.clone());
        for p in &self.params {
            spec = match &p.default {
                Some(d) => spec.param_default(p.name.clone(), d.clone()),
                None => spec.param(p.name.clone()),
            };
        }
        if let Some(name) = &self.varargs {
            spec = spec.varargs(name.clone());
        }
        for p in &self.kwonly {
            spec = match &p.default {
                Some(d) => spec.kwonly_default(p.name.clone(), d.clone()),
                None => spec.kwonly(p.name.clone()),
            };
        }
        if let Some(name) = &self.varkw {
            spec = spec.varkw(name.clone());
        }
        for decl in &self.annotations {
            let mut annotation = Annotation::new(decl.arg_type);
            for raw in &decl.metadata {
                annotation.metadata.push(self.metadata(&decl.param, raw, registry)?);
            }
            spec = spec.annotate(decl.param.clone(), annotation);
        }
        spec.check()?;
        Ok(spec)
    }

    fn metadata(
        &self,
        param: &ArgName,
        raw: &Value,
        registry: &Registry,
    ) -> Result<Metadata, SpecError> {
        let decl = match ValidatorDecl::deserialize(raw) {
            Ok(decl) => decl,
            Err(e) if names_validator(raw) => {
                return Err(SpecError::Malformed {
                    message: format!("{}: metadata {raw} for '{param}': {e}", self.name),
                });
            }
            Err(_) => {
                warn!(
                    function = %self.name,
                    %param,
                    metadata = %raw,
                    "metadata entry is not a validator; calls reaching it will fail"
                );
                return Ok(Metadata::Opaque(raw.clone()));
            }
        };
        Ok(match decl {
            ValidatorDecl::Between(lo, hi) => Between::new(lo, hi).into(),
            ValidatorDecl::IsType(t) => t.map_or_else(IsType::new, IsType::with_override).into(),
            ValidatorDecl::IsTypable(t) => {
                t.map_or_else(IsTypable::new, IsTypable::with_override).into()
            }
            ValidatorDecl::Custom(name) => {
                let check = registry
                    .predicate(&name)
                    .ok_or(SpecError::UnknownCallable { kind: "predicate", name: name.clone() })?;
                Custom::from_arc(name, check).into()
            }
            ValidatorDecl::Map(nodes) => {
                let nodes = nodes
                    .into_iter()
                    .map(|n| node(n, registry))
                    .collect::<Result<Vec<_>, _>>()?;
                Map::new(nodes).into()
            }
        })
    }
}

const VALIDATOR_KEYS: [&str; 5] = ["between", "is_type", "is_typable", "custom", "map"];

/// True for a single-key object keyed by a validator name.
fn names_validator(raw: &Value) -> bool {
    match raw.as_object() {
        Some(fields) if fields.len() == 1 => {
            fields.keys().any(|k| VALIDATOR_KEYS.contains(&k.as_str()))
        }
        _ => false,
    }
}

fn node(decl: NodeDecl, registry: &Registry) -> Result<Node, SpecError> {
    Ok(match decl {
        NodeDecl::Index(i) => Node::Index(i),
        NodeDecl::Key(k) => Node::Key(k),
        NodeDecl::Attr { attr } => Node::Attr(Attr::new(attr)),
        NodeDecl::Call { call } => {
            let f = registry
                .transform(&call)
                .ok_or(SpecError::UnknownCallable { kind: "transform", name: call.clone() })?;
            Node::Call(Transform::from_arc(call, f))
        }
    })
}

/// Parses and builds a signature in one step.
pub fn load_signature(text: &str, registry: &Registry) -> Result<ArgSpec, SpecError> {
    SignatureDecl::from_json(text)?.build(registry)
}
