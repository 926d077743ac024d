//! Run-time member access and generic method dispatch.
//!
//! This module resolves, reads and writes the fields and properties of values whose type is
//! not known at the call site, and locates and invokes generic methods by name and type
//! arguments. Rust keeps no such metadata at run time, so types opt in by implementing
//! [`Reflect`]; the resulting [`TypeInfo`] descriptions are held by a [`TypeRegistry`] inside a
//! [`ReflectionContext`].
//!
//! # Architecture
//!
//! - **Type system** ([`TypeHandle`], [`TypeInfo`], [`TypeRegistry`]): identity and
//!   description of reflectable types
//! - **Members** ([`MemberDescriptor`]): type-erased read, write and render of one field or
//!   property
//! - **Methods** ([`MethodDescriptor`], [`MethodQuery`], [`BoundMethod`]): generic method
//!   definitions, their resolution and invocation
//! - **Member cache** ([`MemberCache`]): per-type memo of public member lists used by the
//!   string projection
//! - **Context** ([`ReflectionContext`]): owner of all of the above plus the
//!   [`ReflectionConfig`] and the default string set [`Serializer`]
//!
//! Values cross the dynamic boundary as [`DynValue`]s.

mod cache;
mod config;
mod context;
mod member;
mod method;
mod typesystem;

use std::any::Any;

pub use cache::{MemberCache, MemberList};
pub use config::ReflectionConfig;
pub use context::{ReflectionContext, Serializer};
pub use member::{MemberDescriptor, MemberKind, Visibility};
pub use method::{
    resolve_generic_method, BindingFlags, BoundMethod, Invocation, MethodBuilder,
    MethodDescriptor, MethodDescriptorRc, MethodQuery, ParamType,
};
pub use typesystem::{
    render_display, render_optional, same_types, Reflect, Reflected, RenderFn, TypeHandle,
    TypeInfo, TypeInfoBuilder, TypeInfoRc, TypeRegistry,
};

/// A type-erased, owned value
pub type DynValue = Box<dyn Any>;

/// Name reported for values whose type cannot be named
pub(crate) const UNKNOWN_TYPE: &str = "<unknown>";
