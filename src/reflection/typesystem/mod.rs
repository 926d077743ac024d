//! Type descriptions and the registry that stands in for run-time reflection.
//!
//! Rust carries no member or method metadata at run time, so every type that takes part in
//! dynamic access describes itself once through the [`Reflect`] trait. The resulting
//! [`TypeInfo`] lists the type's fields, properties and methods in declaration order and is
//! stored in a [`TypeRegistry`], which every lookup treats as the source of truth.
//!
//! # Key Components
//!
//! - [`TypeHandle`]: Copyable identity of a type, compared structurally
//! - [`TypeInfo`]: Members and methods of one type
//! - [`TypeInfoBuilder`]: Fluent construction of a [`TypeInfo`]
//! - [`TypeRegistry`]: Concurrent map from type to its description, plus value renderers
//! - [`Reflect`] / [`Reflected`]: Self-description of a type, and its object-safe counterpart
//!
//! # Examples
//!
//! ```rust
//! use synergy::reflection::{Reflect, TypeInfo, TypeRegistry, Visibility};
//!
//! struct Account {
//!     owner: String,
//!     balance: i64,
//! }
//!
//! impl Reflect for Account {
//!     fn describe() -> TypeInfo {
//!         TypeInfo::builder::<Account>()
//!             .field("owner", |a| &a.owner, |a| &mut a.owner)
//!             .field("balance", |a| &a.balance, |a| &mut a.balance)
//!             .property("overdrawn", |a| a.balance < 0)
//!             .build()
//!     }
//! }
//!
//! let registry = TypeRegistry::new();
//! let info = registry.info::<Account>();
//!
//! let names: Vec<_> = info.public_members().map(|m| m.name().to_string()).collect();
//! assert_eq!(names, ["owner", "balance", "overdrawn"]);
//! assert!(info.public_members().all(|m| m.visibility() == Visibility::Public));
//! ```

mod builder;
mod handle;
mod primitives;
mod registry;

use std::{any::Any, fmt, sync::Arc};

pub use builder::TypeInfoBuilder;
pub use handle::{same_types, TypeHandle};
pub use primitives::{render_display, render_optional, RenderFn};
pub use registry::TypeRegistry;

pub(crate) use primitives::builtin_renderers;

use crate::{
    reflection::{member::MemberDescriptor, method::MethodDescriptor},
    Error, Result,
};

/// A reference-counted type description
pub type TypeInfoRc = Arc<TypeInfo>;

/// Everything the registry knows about one type
pub struct TypeInfo {
    handle: TypeHandle,
    fields: Vec<MemberDescriptor>,
    properties: Vec<MemberDescriptor>,
    methods: Vec<Arc<MethodDescriptor>>,
}

impl TypeInfo {
    /// Start describing `T`
    #[must_use]
    pub fn builder<T: 'static>() -> TypeInfoBuilder<T> {
        TypeInfoBuilder::new()
    }

    /// The described type
    pub fn handle(&self) -> TypeHandle {
        self.handle
    }

    /// Short name of the described type
    pub fn name(&self) -> String {
        self.handle.name()
    }

    /// All fields, in declaration order
    pub fn fields(&self) -> &[MemberDescriptor] {
        &self.fields
    }

    /// All properties, in declaration order
    pub fn properties(&self) -> &[MemberDescriptor] {
        &self.properties
    }

    /// All members regardless of visibility: fields first, then properties
    pub fn members(&self) -> impl Iterator<Item = &MemberDescriptor> {
        self.fields.iter().chain(self.properties.iter())
    }

    /// Public members: fields first, then properties, each in declaration order
    pub fn public_members(&self) -> impl Iterator<Item = &MemberDescriptor> {
        self.members().filter(|member| member.is_public())
    }

    /// Look a member up by name, regardless of visibility
    ///
    /// # Errors
    /// Returns [`Error::MemberNotFound`] if no field or property has this name.
    pub fn member(&self, name: &str) -> Result<&MemberDescriptor> {
        self.members()
            .find(|member| member.name() == name)
            .ok_or_else(|| Error::MemberNotFound {
                type_name: self.name(),
                member: name.to_string(),
            })
    }

    /// All methods, in declaration order
    pub fn methods(&self) -> &[Arc<MethodDescriptor>] {
        &self.methods
    }
}

impl fmt::Debug for TypeInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TypeInfo")
            .field("handle", &self.handle)
            .field("fields", &self.fields)
            .field("properties", &self.properties)
            .field("methods", &self.methods)
            .finish()
    }
}

/// A type that can describe its own members and methods
///
/// `describe` is called at most once per registry (modulo a benign race on first use); the
/// result is cached for the lifetime of the registry.
pub trait Reflect: Any + Sized {
    /// Build the description of `Self`
    fn describe() -> TypeInfo;
}

/// Object-safe view of a [`Reflect`] type
///
/// Implemented for every `Reflect` type; lets the registry resolve the *concrete* type behind
/// a trait object.
pub trait Reflected: Any {
    /// Handle of the concrete type
    fn type_handle(&self) -> TypeHandle;

    /// Build the description of the concrete type
    fn describe_type(&self) -> TypeInfo;

    /// Upcast to `&dyn Any`
    fn as_any(&self) -> &dyn Any;

    /// Upcast to `&mut dyn Any`
    fn as_any_mut(&mut self) -> &mut dyn Any;
}

impl<T: Reflect> Reflected for T {
    fn type_handle(&self) -> TypeHandle {
        TypeHandle::of::<T>()
    }

    fn describe_type(&self) -> TypeInfo {
        T::describe()
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}
