//! Lightweight, copyable identity of a Rust type.
//!
//! A [`TypeHandle`] pairs the compiler's [`TypeId`] with the type's path as reported by
//! [`std::any::type_name`]. Handles compare and hash by `TypeId` alone, so two handles
//! obtained independently for the same type are always equal; the path only feeds the
//! human-readable names.
//!
//! # Naming
//!
//! - [`TypeHandle::full_name`] - the full path (`alloc::vec::Vec<alloc::string::String>`)
//! - [`TypeHandle::name`] - the short name with every module path stripped (`Vec<String>`)
//!
//! The short name is the key used for implicit (type-name keyed) storage in the
//! [`crate::collections::HeterogeneousStore`]. The exact text produced by `type_name` is not
//! guaranteed to be stable across compiler versions, so short names should not be persisted.

use std::{
    any::{Any, TypeId},
    fmt,
    hash::{Hash, Hasher},
};

/// Identity of a concrete Rust type
#[derive(Clone, Copy)]
pub struct TypeHandle {
    id: TypeId,
    path: &'static str,
}

impl TypeHandle {
    /// Create the handle of `T`
    #[must_use]
    pub fn of<T: ?Sized + 'static>() -> Self {
        TypeHandle {
            id: TypeId::of::<T>(),
            path: std::any::type_name::<T>(),
        }
    }

    /// Create the handle of the value's type, as seen by the caller
    #[must_use]
    pub fn of_val<T: ?Sized + 'static>(_value: &T) -> Self {
        Self::of::<T>()
    }

    /// The `TypeId` backing this handle
    #[must_use]
    pub fn id(&self) -> TypeId {
        self.id
    }

    /// The full type path, as reported by the compiler
    #[must_use]
    pub fn full_name(&self) -> &'static str {
        self.path
    }

    /// The short type name, with module paths stripped (also inside generic arguments)
    #[must_use]
    pub fn name(&self) -> String {
        short_name(self.path)
    }

    /// Returns `true` if the type-erased `value` is an instance of this type
    pub fn is_instance(&self, value: &dyn Any) -> bool {
        value.type_id() == self.id
    }
}

impl PartialEq for TypeHandle {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for TypeHandle {}

impl Hash for TypeHandle {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

impl fmt::Debug for TypeHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "TypeHandle({})", self.path)
    }
}

impl fmt::Display for TypeHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name())
    }
}

/// Compare two type lists element by element
///
/// Handles are compared structurally (by `TypeId`), never by address.
#[must_use]
pub fn same_types(left: &[TypeHandle], right: &[TypeHandle]) -> bool {
    left.len() == right.len() && left.iter().zip(right).all(|(l, r)| l == r)
}

/// Strip module paths from a compiler type path.
///
/// `core::option::Option<alloc::string::String>` becomes `Option<String>`. Anything that is not
/// part of an identifier path (generic brackets, references, slices, tuples) is copied as is.
pub(crate) fn short_name(path: &str) -> String {
    let mut result = String::with_capacity(path.len());
    let mut segment = String::new();
    let mut chars = path.chars().peekable();

    while let Some(c) = chars.next() {
        match c {
            ':' if chars.peek() == Some(&':') => {
                chars.next();
                segment.clear();
            }
            c if c.is_alphanumeric() || c == '_' => segment.push(c),
            other => {
                result.push_str(&segment);
                segment.clear();
                result.push(other);
            }
        }
    }

    result.push_str(&segment);
    result
}
