//! Central type registry.
//!
//! This module provides the [`TypeRegistry`], the concurrent store of every [`TypeInfo`] known
//! to a [`crate::reflection::ReflectionContext`]. It plays the part a run-time reflection model
//! plays in other environments: given a type, it answers with the type's members and methods.
//!
//! # Registry Architecture
//!
//! - **Descriptions**: `DashMap` keyed by `TypeId`, each value a shared [`TypeInfoRc`]
//! - **Renderers**: `DashMap` keyed by `TypeId`, converting type-erased values to text;
//!   seeded with the primitive types
//!
//! # Thread Safety
//!
//! Lookups and insertions never block each other for long: descriptions are built outside of
//! any map lock and then inserted with `entry().or_insert`, so two threads describing the same
//! type at once may both build a description, but only the first one is kept.
//!
//! # Examples
//!
//! ```rust
//! use synergy::reflection::{Reflect, TypeHandle, TypeInfo, TypeRegistry};
//!
//! struct Flag(bool);
//!
//! impl Reflect for Flag {
//!     fn describe() -> TypeInfo {
//!         TypeInfo::builder::<Flag>().field("0", |f| &f.0, |f| &mut f.0).build()
//!     }
//! }
//!
//! let registry = TypeRegistry::new();
//! assert!(registry.get(&TypeHandle::of::<Flag>()).is_err());
//!
//! registry.register::<Flag>();
//! assert_eq!(registry.get(&TypeHandle::of::<Flag>())?.fields().len(), 1);
//! assert_eq!(registry.described(), 1);
//! # Ok::<(), synergy::Error>(())
//! ```

use std::{
    any::{Any, TypeId},
    fmt::Display,
    sync::{
        atomic::{AtomicUsize, Ordering},
        Arc,
    },
};

use dashmap::{mapref::entry::Entry, DashMap};
use log::debug;

use crate::{
    reflection::{
        typesystem::{
            primitives::{builtin_renderers, render_display},
            RenderFn, TypeHandle, TypeInfo, TypeInfoRc,
        },
        Reflect, Reflected,
    },
    Error, Result,
};

/// Concurrent map from types to their descriptions and default renderers
pub struct TypeRegistry {
    types: DashMap<TypeId, TypeInfoRc>,
    renderers: DashMap<TypeId, RenderFn>,
    described: AtomicUsize,
}

impl TypeRegistry {
    /// Create a registry that knows no types and renders the primitives
    pub fn new() -> Self {
        let renderers = DashMap::new();
        for (handle, render) in builtin_renderers() {
            renderers.insert(handle.id(), render);
        }

        TypeRegistry {
            types: DashMap::new(),
            renderers,
            described: AtomicUsize::new(0),
        }
    }

    /// Get the description of `T`, describing it on first use
    pub fn info<T: Reflect>(&self) -> TypeInfoRc {
        self.get_or_describe(TypeHandle::of::<T>(), T::describe)
    }

    /// Get the description of the concrete type behind `object`, describing it on first use
    pub fn info_of(&self, object: &dyn Reflected) -> TypeInfoRc {
        self.get_or_describe(object.type_handle(), || object.describe_type())
    }

    /// Look a description up by handle
    ///
    /// # Errors
    /// Returns [`Error::TypeNotRegistered`] if the type was never described or registered.
    pub fn get(&self, handle: &TypeHandle) -> Result<TypeInfoRc> {
        self.types
            .get(&handle.id())
            .map(|entry| Arc::clone(entry.value()))
            .ok_or_else(|| Error::TypeNotRegistered(handle.name()))
    }

    /// Make sure `T` is described
    pub fn register<T: Reflect>(&self) -> TypeInfoRc {
        self.info::<T>()
    }

    /// Register a hand-built description for a type that is not described yet
    ///
    /// # Errors
    /// Returns [`Error::TypeAlreadyRegistered`] if the type already has a description, whether
    /// hand-built or produced by [`Reflect::describe`]. The existing description stays.
    pub fn register_info(&self, info: TypeInfo) -> Result<TypeInfoRc> {
        let handle = info.handle();
        match self.types.entry(handle.id()) {
            Entry::Occupied(_) => Err(Error::TypeAlreadyRegistered(handle.name())),
            Entry::Vacant(entry) => {
                debug!("Registering description of '{}'", handle.name());
                Ok(Arc::clone(entry.insert(Arc::new(info)).value()))
            }
        }
    }

    /// Returns `true` if the type has a description
    pub fn contains(&self, handle: &TypeHandle) -> bool {
        self.types.contains_key(&handle.id())
    }

    /// Number of described types
    pub fn len(&self) -> usize {
        self.types.len()
    }

    /// Returns `true` if no type has been described yet
    pub fn is_empty(&self) -> bool {
        self.types.is_empty()
    }

    /// How many times a `describe` function ran
    ///
    /// A value above [`TypeRegistry::len`] means concurrent first uses raced.
    pub fn described(&self) -> usize {
        self.described.load(Ordering::Relaxed)
    }

    /// Teach the registry how to render values of `T`
    pub fn register_renderer<T: Display + 'static>(&self) {
        self.renderers
            .insert(TypeId::of::<T>(), render_display::<T> as RenderFn);
    }

    /// Render a type-erased value with its registered renderer
    ///
    /// Values without a renderer fall back to the full name of their type.
    pub fn render(&self, value: &dyn Any, handle: TypeHandle) -> String {
        self.renderers
            .get(&handle.id())
            .and_then(|render| render.value()(value))
            .unwrap_or_else(|| handle.full_name().to_string())
    }

    fn get_or_describe<F>(&self, handle: TypeHandle, describe: F) -> TypeInfoRc
    where
        F: FnOnce() -> TypeInfo,
    {
        if let Some(existing) = self.types.get(&handle.id()) {
            return Arc::clone(existing.value());
        }

        debug!("Describing type '{}'", handle.name());
        let info = Arc::new(describe());
        self.described.fetch_add(1, Ordering::Relaxed);

        Arc::clone(self.types.entry(handle.id()).or_insert(info).value())
    }
}

impl Default for TypeRegistry {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use std::fmt;

    use super::*;
    use crate::test::{Person, Unregistered};

    #[test]
    fn describes_once() {
        let registry = TypeRegistry::new();
        let first = registry.info::<Person>();
        let second = registry.info::<Person>();

        assert!(Arc::ptr_eq(&first, &second));
        assert_eq!(registry.described(), 1);
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn info_of_resolves_concrete_type() {
        let registry = TypeRegistry::new();
        let person = Person::sample();
        let object: &dyn Reflected = &person;

        let info = registry.info_of(object);
        assert_eq!(info.handle(), TypeHandle::of::<Person>());
        assert!(registry.contains(&TypeHandle::of::<Person>()));
    }

    #[test]
    fn unregistered_lookup_fails() {
        let registry = TypeRegistry::new();
        match registry.get(&TypeHandle::of::<Unregistered>()) {
            Err(Error::TypeNotRegistered(name)) => assert_eq!(name, "Unregistered"),
            other => panic!("unexpected: {other:?}"),
        }
    }

    #[test]
    fn hand_built_descriptions() {
        let registry = TypeRegistry::new();
        let info = TypeInfo::builder::<Unregistered>()
            .property("kind", |_| "unregistered")
            .build();

        registry.register_info(info).unwrap();
        let info = registry.get(&TypeHandle::of::<Unregistered>()).unwrap();
        assert_eq!(info.properties().len(), 1);
        assert_eq!(registry.described(), 0);
    }

    #[test]
    fn descriptions_are_never_replaced() {
        let registry = TypeRegistry::new();
        registry.register::<Person>();

        let replacement = TypeInfo::builder::<Person>()
            .property("n", |_| 1_u8)
            .build();
        match registry.register_info(replacement) {
            Err(Error::TypeAlreadyRegistered(name)) => assert_eq!(name, "Person"),
            other => panic!("unexpected: {other:?}"),
        }

        let kept = registry.get(&TypeHandle::of::<Person>()).unwrap();
        assert!(kept.member("name").is_ok());
        assert!(kept.member("n").is_err());

        let again = TypeInfo::builder::<Unregistered>().build();
        registry.register_info(again).unwrap();
        let twice = TypeInfo::builder::<Unregistered>().build();
        assert!(registry.register_info(twice).is_err());
    }

    #[test]
    fn renders_primitives_and_custom_types() {
        struct Celsius(f32);
        impl fmt::Display for Celsius {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}°C", self.0)
            }
        }

        let registry = TypeRegistry::new();
        assert_eq!(registry.render(&17_u16, TypeHandle::of::<u16>()), "17");

        let temp = Celsius(21.5);
        let handle = TypeHandle::of::<Celsius>();
        assert_eq!(registry.render(&temp, handle), handle.full_name());

        registry.register_renderer::<Celsius>();
        assert_eq!(registry.render(&temp, handle), "21.5°C");
    }
}
