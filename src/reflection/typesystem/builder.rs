//! Builder for [`TypeInfo`] descriptions.
//!
//! This module provides the [`TypeInfoBuilder`], a fluent API for declaring the fields,
//! properties and methods of a type. Declaration order is preserved: it is the enumeration
//! order of members and the resolution order of methods.
//!
//! # Example
//!
//! ```rust
//! use synergy::reflection::{TypeHandle, TypeInfo};
//!
//! struct Counter {
//!     hits: u64,
//!     label: Option<String>,
//! }
//!
//! let info = TypeInfo::builder::<Counter>()
//!     .field("hits", |c| &c.hits, |c| &mut c.hits)
//!     .nullable_field("label", |c| &c.label, |c| &mut c.label)
//!     .method("Reset", |m| {
//!         m.generic(["T"]).body(|counter, _call| {
//!             counter.hits = 0;
//!             Ok(None)
//!         })
//!     })
//!     .build();
//!
//! assert_eq!(info.handle(), TypeHandle::of::<Counter>());
//! assert_eq!(info.fields().len(), 2);
//! assert_eq!(info.methods()[0].generic_arity(), 1);
//! ```

use std::{fmt::Display, marker::PhantomData, sync::Arc};

use crate::reflection::{
    member::MemberDescriptor,
    method::{MethodBuilder, MethodDescriptor},
    typesystem::{TypeHandle, TypeInfo},
    MemberKind,
};

/// Provides a fluent API for describing the members and methods of `T`
pub struct TypeInfoBuilder<T> {
    fields: Vec<MemberDescriptor>,
    properties: Vec<MemberDescriptor>,
    methods: Vec<Arc<MethodDescriptor>>,
    _owner: PhantomData<fn() -> T>,
}

impl<T: 'static> TypeInfoBuilder<T> {
    /// Create an empty description of `T`
    pub fn new() -> Self {
        TypeInfoBuilder {
            fields: Vec::new(),
            properties: Vec::new(),
            methods: Vec::new(),
            _owner: PhantomData,
        }
    }

    /// Declare a public field
    ///
    /// ## Arguments
    /// * 'name' - The field name
    /// * 'get' - Projection to the field
    /// * 'get_mut' - Mutable projection to the field
    #[must_use]
    pub fn field<V, G, M>(self, name: &str, get: G, get_mut: M) -> Self
    where
        V: Clone + Display + 'static,
        G: Fn(&T) -> &V + Send + Sync + 'static,
        M: Fn(&mut T) -> &mut V + Send + Sync + 'static,
    {
        self.member(MemberDescriptor::field::<T, V, G, M>(name, get, get_mut))
    }

    /// Declare a public field holding an optional value
    #[must_use]
    pub fn nullable_field<V, G, M>(self, name: &str, get: G, get_mut: M) -> Self
    where
        V: Clone + Display + 'static,
        G: Fn(&T) -> &Option<V> + Send + Sync + 'static,
        M: Fn(&mut T) -> &mut Option<V> + Send + Sync + 'static,
    {
        self.member(MemberDescriptor::nullable_field::<T, V, G, M>(
            name, get, get_mut,
        ))
    }

    /// Declare a non-public field, reachable by name but hidden from enumeration
    #[must_use]
    pub fn non_public_field<V, G, M>(self, name: &str, get: G, get_mut: M) -> Self
    where
        V: Clone + Display + 'static,
        G: Fn(&T) -> &V + Send + Sync + 'static,
        M: Fn(&mut T) -> &mut V + Send + Sync + 'static,
    {
        self.member(MemberDescriptor::field::<T, V, G, M>(name, get, get_mut).non_public())
    }

    /// Declare a public read-only property
    #[must_use]
    pub fn property<V, G>(self, name: &str, getter: G) -> Self
    where
        V: Display + 'static,
        G: Fn(&T) -> V + Send + Sync + 'static,
    {
        self.member(MemberDescriptor::property::<T, V, G>(name, getter))
    }

    /// Declare a public read-write property
    #[must_use]
    pub fn property_rw<V, G, S>(self, name: &str, getter: G, setter: S) -> Self
    where
        V: Display + 'static,
        G: Fn(&T) -> V + Send + Sync + 'static,
        S: Fn(&mut T, V) + Send + Sync + 'static,
    {
        self.member(
            MemberDescriptor::property::<T, V, G>(name, getter).with_setter::<T, V, S>(setter),
        )
    }

    /// Declare a public read-only property whose value may be absent
    #[must_use]
    pub fn nullable_property<V, G>(self, name: &str, getter: G) -> Self
    where
        V: Display + 'static,
        G: Fn(&T) -> Option<V> + Send + Sync + 'static,
    {
        self.member(MemberDescriptor::nullable_property::<T, V, G>(name, getter))
    }

    /// Declare a public read-write property whose value may be absent
    ///
    /// The setter receives the written `Option<V>` as is.
    #[must_use]
    pub fn nullable_property_rw<V, G, S>(self, name: &str, getter: G, setter: S) -> Self
    where
        V: Display + 'static,
        G: Fn(&T) -> Option<V> + Send + Sync + 'static,
        S: Fn(&mut T, Option<V>) + Send + Sync + 'static,
    {
        self.member(
            MemberDescriptor::nullable_property::<T, V, G>(name, getter)
                .with_setter::<T, Option<V>, S>(setter),
        )
    }

    /// Add a prepared member descriptor
    ///
    /// Fields and properties are kept in separate groups; within a group the call order is the
    /// enumeration order.
    #[must_use]
    pub fn member(mut self, member: MemberDescriptor) -> Self {
        match member.kind() {
            MemberKind::Field => self.fields.push(member),
            MemberKind::Property => self.properties.push(member),
        }
        self
    }

    /// Declare a method
    ///
    /// The closure receives a [`MethodBuilder`] pre-set with `name` and must finish it with
    /// either an instance or a static body.
    #[must_use]
    pub fn method<F>(mut self, name: &str, build: F) -> Self
    where
        F: FnOnce(MethodBuilder<T>) -> MethodDescriptor,
    {
        self.methods.push(Arc::new(build(MethodBuilder::new(name))));
        self
    }

    /// Finish the description
    pub fn build(self) -> TypeInfo {
        TypeInfo {
            handle: TypeHandle::of::<T>(),
            fields: self.fields,
            properties: self.properties,
            methods: self.methods,
        }
    }
}

impl<T: 'static> Default for TypeInfoBuilder<T> {
    fn default() -> Self {
        Self::new()
    }
}
