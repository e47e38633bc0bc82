//! Cross-field mapping.
//!
//! A [`Map`] fills a target parameter by walking a path of [`Node`]s through
//! the *source* argument map. It is how a decorated function with one
//! signature can be called through a different, caller-facing signature.

use std::fmt;
use std::sync::Arc;

use tracing::debug;

use crate::{ArgMap, ArgName, ArgType, Cause, ValidecorError, Validator, Value};

/// Signature of a [`Transform`] node.
pub type TransformFn = dyn Fn(&Value) -> Result<Value, Cause> + Send + Sync;

/// Named attribute access.
///
/// On a dict-shaped value an attribute is a field; other values have no
/// attributes.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Attr {
    name: String,
}

impl Attr {
    /// Creates an attribute accessor.
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }

    /// Attribute name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Reads the attribute from `value`.
    pub fn get(&self, value: &Value) -> Result<Value, Cause> {
        match value {
            Value::Object(fields) => fields.get(&self.name).cloned().ok_or_else(|| {
                Cause::MissingAttribute { name: self.name.clone(), found: ArgType::Dict }
            }),
            other => Err(Cause::MissingAttribute {
                name: self.name.clone(),
                found: ArgType::of(other),
            }),
        }
    }
}

impl fmt::Display for Attr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Attr(")?;
        write_quoted(f, &self.name)?;
        f.write_str(")")
    }
}

/// A named callable node.
#[derive(Clone)]
pub struct Transform {
    label: String,
    f: Arc<TransformFn>,
}

impl Transform {
    /// Wraps `f` under `label`; the label is the node's `repr`.
    pub fn new(
        label: impl Into<String>,
        f: impl Fn(&Value) -> Result<Value, Cause> + Send + Sync + 'static,
    ) -> Self {
        Self { label: label.into(), f: Arc::new(f) }
    }

    /// Wraps an already shared callable.
    pub fn from_arc(label: impl Into<String>, f: Arc<TransformFn>) -> Self {
        Self { label: label.into(), f }
    }

    /// Applies the callable.
    pub fn apply(&self, value: &Value) -> Result<Value, Cause> {
        (self.f)(value)
    }
}

impl fmt::Display for Transform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.label)
    }
}

impl fmt::Debug for Transform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Transform").field(&self.label).finish()
    }
}

/// One step of a [`Map`] path.
#[derive(Debug, Clone)]
pub enum Node {
    /// List index; negative values count from the end.
    Index(i64),
    /// Dict key.
    Key(String),
    /// Attribute access.
    Attr(Attr),
    /// Callable applied to the current value.
    Call(Transform),
}

impl Node {
    /// Applies this node to `value`.
    pub fn apply(&self, value: &Value) -> Result<Value, Cause> {
        match (self, value) {
            (Self::Index(index), Value::Array(items)) => {
                let len = items.len();
                let resolved = if *index < 0 {
                    i64::try_from(len).ok().and_then(|l| usize::try_from(l + index).ok())
                } else {
                    usize::try_from(*index).ok()
                };
                resolved
                    .and_then(|i| items.get(i))
                    .cloned()
                    .ok_or(Cause::IndexOutOfRange { index: *index, len })
            }
            (Self::Key(key), Value::Object(fields)) => {
                fields.get(key).cloned().ok_or_else(|| Cause::MissingKey { key: key.clone() })
            }
            (Self::Index(_) | Self::Key(_), other) => Err(Cause::NotSubscriptable {
                node: self.to_string(),
                found: ArgType::of(other),
            }),
            (Self::Attr(attr), _) => attr.get(value),
            (Self::Call(transform), _) => transform.apply(value),
        }
    }
}

impl fmt::Display for Node {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Index(i) => write!(f, "{i}"),
            Self::Key(k) => write_quoted(f, k),
            Self::Attr(a) => write!(f, "{a}"),
            Self::Call(t) => write!(f, "{t}"),
        }
    }
}
/// Writes `s` single-quoted, escaping backslashes and quotes.
/// Writes `s` single-quoted, escaping `\\` and `'`.
fn write_quoted(f: &mut fmt::Formatter<'_>, s: &str) -> fmt::Result {
    f.write_str("'")?;
    for c in s.chars() {
        match c {
            '\\' => f.write_str("\\\\")?,
            '\'' => f.write_str("\\'")?,
            c => write!(f, "{c}")?,
        }
    }
    f.write_str("'")
}

impl From<i64> for Node {
    fn from(index: i64) -> Self {
        Self::Index(index)
    }
}

impl From<&str> for Node {
    fn from(key: &str) -> Self {
        Self::Key(key.to_string())
    }
}

impl From<String> for Node {
    fn from(key: String) -> Self {
        Self::Key(key)
    }
}

impl From<Attr> for Node {
    fn from(attr: Attr) -> Self {
        Self::Attr(attr)
    }
}

impl From<Transform> for Node {
    fn from(t: Transform) -> Self {
        Self::Call(t)
    }
}

/// Maps an argument from the source signature according to its nodes.
///
/// Resolution starts at the whole source map (as a dict) and applies each
/// node in turn; the result becomes `target[arg_name]`. When a node fails and
/// the target already holds a value (a declared default), the default is kept.
#[derive(Debug, Clone, Default)]
pub struct Map {
    nodes: Vec<Node>,
}

impl Map {
    /// Creates a map from a node sequence.
    pub fn new<I, N>(nodes: I) -> Self
    where
        I: IntoIterator<Item = N>,
        N: Into<Node>,
    {
        Self { nodes: nodes.into_iter().map(Into::into).collect() }
    }

    /// Appends a dict-key node.
    pub fn key(mut self, key: impl Into<String>) -> Self {
        self.nodes.push(Node::Key(key.into()));
        self
    }

    /// Appends a list-index node.
    pub fn index(mut self, index: i64) -> Self {
        self.nodes.push(Node::Index(index));
        self
    }

    /// Appends an attribute node.
    pub fn attr(mut self, name: impl Into<String>) -> Self {
        self.nodes.push(Node::Attr(Attr::new(name)));
        self
    }

    /// Appends a callable node.
    pub fn call(
        mut self,
        label: impl Into<String>,
        f: impl Fn(&Value) -> Result<Value, Cause> + Send + Sync + 'static,
    ) -> Self {
        self.nodes.push(Node::Call(Transform::new(label, f)));
        self
    }

    /// The node path.
    pub fn nodes(&self) -> &[Node] {
        &self.nodes
    }

    /// Resolves the path against `source`, returning the failing node and
    /// cause on error.
    pub fn resolve(&self, source: &ArgMap) -> Result<Value, (&Node, Cause)> {
        let mut current = Value::Object(source.clone());
        for node in &self.nodes {
            current = node.apply(&current).map_err(|cause| (node, cause))?;
        }
        Ok(current)
    }
}

impl fmt::Display for Map {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Map(")?;
        for (i, node) in self.nodes.iter().enumerate() {
            if i > 0 {
                f.write_str(",")?;
            }
            write!(f, "{node}")?;
        }
        f.write_str(")")
    }
}

impl Validator for Map {
    fn validate(
        &self,
        arg_name: &ArgName,
        arg_type: ArgType,
        source: &ArgMap,
        target: &mut ArgMap,
    ) -> Result<(), ValidecorError> {
        match self.resolve(source) {
            Ok(value) => {
                target.insert(arg_name.to_string(), value);
                Ok(())
            }
            Err((node, cause)) if target.contains_key(arg_name.as_str()) => {
                debug!(arg = %arg_name, map = %self, node = %node, %cause, "map failed, keeping default");
                Ok(())
            }
            Err((node, cause)) => Err(ValidecorError::ArgMap {
                arg_name: arg_name.clone(),
                arg_type,
                arg_map: self.to_string(),
                last_node: node.to_string(),
                sub_error: cause,
            }),
        }
    }
}
