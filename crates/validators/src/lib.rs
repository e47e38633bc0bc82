//! Stock validators and declarative signatures for `validecor`.
//!
//! The stock validators check or rewrite a single bound argument:
//!
//! - [`Between`]: inclusive range check on comparable values.
//! - [`IsType`]: exact type check against the declared (or override) type.
//! - [`IsTypable`]: conversion to the declared (or override) type, written back.
//! - [`Custom`]: a caller-supplied check.
//!
//! [`SignatureDecl`] builds an [`validecor::ArgSpec`] from a JSON document.
//! Predicates and transforms it refers to by name are looked up in a
//! [`Registry`].
//!
//! ## Architectural Layer
//!
//! **Extension layer.** Everything here plugs into the `validecor` crate
//! through its `Validator` trait; nothing in `validecor` depends on this crate.
//!
//! ## Module Layout
//!
//! | Module | Contents |
//! |--------|----------|
//! | [`between`] | `Between`, value ordering |
//! | [`is_type`] | `IsType`, `IsTypable` |
//! | [`convert`] | Type conversion and truthiness |
//! | [`custom`] | `Custom`, `CheckFn` |
//! | [`registry`] | Named predicates and transforms |
//! | [`decl`] | JSON signature documents |

pub mod between;
pub mod convert;
pub mod custom;
pub mod decl;
pub mod is_type;
pub mod registry;

pub use between::{compare, Between};
pub use convert::{convert, truthy};
pub use custom::{CheckFn, Custom};
pub use decl::{load_signature, AnnotationDecl, ParamDecl, SignatureDecl};
pub use is_type::{IsTypable, IsType};
pub use registry::{register_builtins, Registry};
