//! Signature-driven argument binding, mapping, and validation.
//!
//! A callable is described by an explicit [`ArgSpec`]: its parameters,
//! defaults, variadic collectors, and per-parameter [`Annotation`]s. The
//! [`validecor`] decorator checks the signature once, then on every call binds
//! the arguments into a name→value map, runs each annotation's [`Map`] nodes
//! and [`Validator`]s in order, and invokes the wrapped callable with the
//! (possibly rewritten) arguments. The first failure is returned as a tagged
//! [`ValidecorError`] and the callable does not run.
//!
//! ## Architectural Layer
//!
//! **Domain + extension points.** This crate has no I/O dependencies. Stock
//! validators and the declarative signature loader live in the `validators`
//! crate; they plug in through the [`Validator`] trait defined here.
//!
//! ## Module Layout
//!
//! | Module | Contents |
//! |--------|----------|
//! | [`identifiers`] | Newtype identifiers (`ArgName`, `CallId`) |
//! | [`types`] | `Value`, `ArgMap`, `ArgType`, `CallArgs` |
//! | [`errors`] | `ValidecorError`, `ErrorType`, `Cause`, `SpecError` |
//! | [`spec`] | `ArgSpec` and argument binding |
//! | [`metadata`] | `Validator` trait, `Metadata`, `Annotation` |
//! | [`map`] | `Map`, `Node`, `Attr`, `Transform` |
//! | [`decorator`] | `validecor`, `Validecor`, `Decorated` |
//!
//! ## Example
//!
//! ```
//! use validecor::{validecor, Annotation, ArgName, ArgSpec, ArgType, CallArgs, Map};
//! use serde_json::json;
//!
//! let name = |s: &str| ArgName::new(s).unwrap();
//!
//! // greet(who) is called as handle(request)
//! let target = ArgSpec::new("greet")
//!     .param(name("who"))
//!     .annotate(name("who"), Annotation::new(ArgType::Str).with(Map::new(["request", "user"])));
//! let source = ArgSpec::new("handle").param(name("request"));
//!
//! let greet = validecor(target)
//!     .and_then(|d| d.with_source(source))
//!     .unwrap()
//!     .wrap(|call: CallArgs| format!("hello {}", call.get_as::<String>(0).unwrap()));
//!
//! let out = greet.call(CallArgs::new().arg(json!({"user": "ada"}))).unwrap();
//! assert_eq!(out, "hello ada");
//! ```

pub mod decorator;
pub mod errors;
pub mod identifiers;
pub mod map;
pub mod metadata;
pub mod spec;
pub mod types;

// Re-export everything at the crate root for ergonomic usage by downstream crates.
pub use decorator::{validecor, Decorated, Validecor};
pub use errors::{Cause, ErrorType, SpecError, ValidecorError};
pub use identifiers::{ArgName, CallId};
pub use map::{Attr, Map, Node, Transform, TransformFn};
pub use metadata::{Annotation, Metadata, Validator};
pub use spec::{ArgSpec, Param};
pub use types::{ArgMap, ArgType, CallArgs, Value};
