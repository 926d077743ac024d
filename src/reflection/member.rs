//! Field and property descriptors with type-erased read and write access.
//!
//! A [`MemberDescriptor`] identifies one field or property of a type and carries the accessor
//! closures needed to read, write and render it on a type-erased target. Fields are accessed
//! directly through a pair of projections into the owner; properties route through a getter
//! and an optional setter, so a property can be computed or read-only.
//!
//! Descriptors are normally created by [`crate::reflection::TypeInfoBuilder`], but the
//! constructors here are public so descriptions for foreign types can be assembled by hand.
//!
//! # Examples
//!
//! ```rust
//! use synergy::reflection::{MemberDescriptor, MemberKind, TypeHandle};
//!
//! struct Point { x: i32 }
//!
//! let x = MemberDescriptor::field::<Point, i32, _, _>("x", |p| &p.x, |p| &mut p.x);
//! let mut point = Point { x: 1 };
//!
//! x.set_value(&mut point, Box::new(7_i32))?;
//! let value = x.get_value(&point)?;
//! assert_eq!(value.downcast_ref::<i32>(), Some(&7));
//! assert_eq!(x.kind(), MemberKind::Field);
//! assert_eq!(x.member_type(), TypeHandle::of::<i32>());
//! # Ok::<(), synergy::Error>(())
//! ```

use std::{any::Any, fmt, fmt::Display, sync::Arc};

use strum::{Display as StrumDisplay, EnumIter};

use crate::{
    reflection::{typesystem::TypeHandle, DynValue, UNKNOWN_TYPE},
    Error, Result,
};

/// Whether a member is a stored field or an accessor-backed property
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, StrumDisplay, EnumIter)]
pub enum MemberKind {
    /// Stored data, read and written in place
    Field,
    /// Value produced by a getter and (optionally) consumed by a setter
    Property,
}

/// Accessibility of a member or method
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, StrumDisplay, EnumIter)]
pub enum Visibility {
    /// Visible to every caller, included in member enumeration
    Public,
    /// Only reachable by explicit lookup
    NonPublic,
}

type Getter = Arc<dyn Fn(&dyn Any) -> Option<DynValue> + Send + Sync>;
type Setter = Arc<dyn Fn(&mut dyn Any, DynValue) -> Result<()> + Send + Sync>;
type Renderer = Arc<dyn Fn(&dyn Any) -> Option<Option<String>> + Send + Sync>;

/// One accessible field or property of a type
#[derive(Clone)]
pub struct MemberDescriptor {
    name: String,
    owner: TypeHandle,
    declared_type: TypeHandle,
    kind: MemberKind,
    visibility: Visibility,
    getter: Getter,
    setter: Option<Setter>,
    renderer: Renderer,
}

impl MemberDescriptor {
    /// Describe a public field of `T`
    ///
    /// ## Arguments
    /// * `name` - The member name used for lookups and as string set key
    /// * `get` - Projection to the field
    /// * `get_mut` - Mutable projection to the field
    pub fn field<T, V, G, M>(name: impl Into<String>, get: G, get_mut: M) -> Self
    where
        T: 'static,
        V: Clone + Display + 'static,
        G: Fn(&T) -> &V + Send + Sync + 'static,
        M: Fn(&mut T) -> &mut V + Send + Sync + 'static,
    {
        let get = Arc::new(get);
        let read = Arc::clone(&get);

        MemberDescriptor {
            name: name.into(),
            owner: TypeHandle::of::<T>(),
            declared_type: TypeHandle::of::<V>(),
            kind: MemberKind::Field,
            visibility: Visibility::Public,
            getter: Arc::new(move |target: &dyn Any| {
                target
                    .downcast_ref::<T>()
                    .map(|owner| Box::new(read(owner).clone()) as DynValue)
            }),
            setter: Some(field_setter::<T, V, M>(get_mut)),
            renderer: Arc::new(move |target: &dyn Any| {
                target
                    .downcast_ref::<T>()
                    .map(|owner| Some(get(owner).to_string()))
            }),
        }
    }

    /// Describe a public field of `T` holding an optional value
    ///
    /// An absent value renders as the configured null text.
    pub fn nullable_field<T, V, G, M>(name: impl Into<String>, get: G, get_mut: M) -> Self
    where
        T: 'static,
        V: Clone + Display + 'static,
        G: Fn(&T) -> &Option<V> + Send + Sync + 'static,
        M: Fn(&mut T) -> &mut Option<V> + Send + Sync + 'static,
    {
        let get = Arc::new(get);
        let read = Arc::clone(&get);

        MemberDescriptor {
            name: name.into(),
            owner: TypeHandle::of::<T>(),
            declared_type: TypeHandle::of::<Option<V>>(),
            kind: MemberKind::Field,
            visibility: Visibility::Public,
            getter: Arc::new(move |target: &dyn Any| {
                target
                    .downcast_ref::<T>()
                    .map(|owner| Box::new(read(owner).clone()) as DynValue)
            }),
            setter: Some(field_setter::<T, Option<V>, M>(get_mut)),
            renderer: Arc::new(move |target: &dyn Any| {
                target
                    .downcast_ref::<T>()
                    .map(|owner| get(owner).as_ref().map(ToString::to_string))
            }),
        }
    }

    /// Describe a public read-only property of `T`
    ///
    /// ## Arguments
    /// * `name` - The member name
    /// * `getter` - Computes the property value from the owner
    pub fn property<T, V, G>(name: impl Into<String>, getter: G) -> Self
    where
        T: 'static,
        V: Display + 'static,
        G: Fn(&T) -> V + Send + Sync + 'static,
    {
        let getter = Arc::new(getter);
        let read = Arc::clone(&getter);

        MemberDescriptor {
            name: name.into(),
            owner: TypeHandle::of::<T>(),
            declared_type: TypeHandle::of::<V>(),
            kind: MemberKind::Property,
            visibility: Visibility::Public,
            getter: Arc::new(move |target: &dyn Any| {
                target
                    .downcast_ref::<T>()
                    .map(|owner| Box::new(read(owner)) as DynValue)
            }),
            setter: None,
            renderer: Arc::new(move |target: &dyn Any| {
                target
                    .downcast_ref::<T>()
                    .map(|owner| Some(getter(owner).to_string()))
            }),
        }
    }

    /// Describe a public read-only property of `T` whose value may be absent
    ///
    /// A `None` from the getter renders as the configured null text. The declared member type
    /// is `Option<V>`.
    pub fn nullable_property<T, V, G>(name: impl Into<String>, getter: G) -> Self
    where
        T: 'static,
        V: Display + 'static,
        G: Fn(&T) -> Option<V> + Send + Sync + 'static,
    {
        let getter = Arc::new(getter);
        let read = Arc::clone(&getter);

        MemberDescriptor {
            name: name.into(),
            owner: TypeHandle::of::<T>(),
            declared_type: TypeHandle::of::<Option<V>>(),
            kind: MemberKind::Property,
            visibility: Visibility::Public,
            getter: Arc::new(move |target: &dyn Any| {
                target
                    .downcast_ref::<T>()
                    .map(|owner| Box::new(read(owner)) as DynValue)
            }),
            setter: None,
            renderer: Arc::new(move |target: &dyn Any| {
                target
                    .downcast_ref::<T>()
                    .map(|owner| getter(owner).map(|value| value.to_string()))
            }),
        }
    }

    /// Attach a setter, turning a read-only property into a read-write one
    #[must_use]
    pub fn with_setter<T, V, S>(mut self, setter: S) -> Self
    where
        T: 'static,
        V: 'static,
        S: Fn(&mut T, V) + Send + Sync + 'static,
    {
        let owner = self.owner;
        let declared = self.declared_type;

        self.setter = Some(Arc::new(move |target: &mut dyn Any, value: DynValue| {
            let target = target
                .downcast_mut::<T>()
                .ok_or_else(|| Error::InvalidTarget {
                    expected: owner.name(),
                    actual: UNKNOWN_TYPE.to_string(),
                })?;
            let value = value.downcast::<V>().map_err(|rejected| {
                type_mismatch!(declared, value_type_name(rejected.as_ref()))
            })?;

            setter(target, *value);
            Ok(())
        }));
        self
    }

    /// Mark the member as non-public, hiding it from enumeration
    #[must_use]
    pub fn non_public(mut self) -> Self {
        self.visibility = Visibility::NonPublic;
        self
    }

    /// The member name
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The type that declares this member
    pub fn owner(&self) -> TypeHandle {
        self.owner
    }

    /// The declared value type of the field or property
    pub fn member_type(&self) -> TypeHandle {
        self.declared_type
    }

    /// Field or property
    pub fn kind(&self) -> MemberKind {
        self.kind
    }

    /// Public or non-public
    pub fn visibility(&self) -> Visibility {
        self.visibility
    }

    /// Returns `true` for public members
    pub fn is_public(&self) -> bool {
        self.visibility == Visibility::Public
    }

    /// Returns `true` if the member accepts writes
    pub fn is_writable(&self) -> bool {
        self.setter.is_some()
    }

    /// Read the member's current value off `target`
    ///
    /// # Errors
    /// Returns [`Error::InvalidTarget`] if `target` is not an instance of the owner type.
    pub fn get_value(&self, target: &dyn Any) -> Result<DynValue> {
        (self.getter)(target).ok_or_else(|| self.invalid_target())
    }

    /// Write `value` into the member on `target`
    ///
    /// # Errors
    /// - [`Error::InvalidTarget`] if `target` is not an instance of the owner type
    /// - [`Error::TypeMismatch`] if `value` is not of the declared member type
    /// - [`Error::MemberReadOnly`] if the member is a property without setter
    pub fn set_value(&self, target: &mut dyn Any, value: DynValue) -> Result<()> {
        match &self.setter {
            Some(setter) => setter(target, value),
            None => Err(Error::MemberReadOnly {
                type_name: self.owner.name(),
                member: self.name.clone(),
            }),
        }
    }

    /// Render the member's value on `target` with its default string conversion
    ///
    /// Returns `Ok(None)` when the value is absent (an empty optional).
    ///
    /// # Errors
    /// Returns [`Error::InvalidTarget`] if `target` is not an instance of the owner type.
    pub fn render(&self, target: &dyn Any) -> Result<Option<String>> {
        (self.renderer)(target).ok_or_else(|| self.invalid_target())
    }

    fn invalid_target(&self) -> Error {
        Error::InvalidTarget {
            expected: self.owner.name(),
            actual: UNKNOWN_TYPE.to_string(),
        }
    }
}

impl fmt::Debug for MemberDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MemberDescriptor")
            .field("name", &self.name)
            .field("owner", &self.owner)
            .field("declared_type", &self.declared_type)
            .field("kind", &self.kind)
            .field("visibility", &self.visibility)
            .field("writable", &self.is_writable())
            .finish()
    }
}

fn field_setter<T, V, M>(get_mut: M) -> Setter
where
    T: 'static,
    V: 'static,
    M: Fn(&mut T) -> &mut V + Send + Sync + 'static,
{
    let owner = TypeHandle::of::<T>();
    let declared = TypeHandle::of::<V>();

    Arc::new(move |target: &mut dyn Any, value: DynValue| {
        let target = target
            .downcast_mut::<T>()
            .ok_or_else(|| Error::InvalidTarget {
                expected: owner.name(),
                actual: UNKNOWN_TYPE.to_string(),
            })?;
        let value = value.downcast::<V>().map_err(|rejected| {
            type_mismatch!(declared, value_type_name(rejected.as_ref()))
        })?;

        *get_mut(target) = *value;
        Ok(())
    })
}

/// Reported for rejected values whose type is not one of the built-in primitives
const NON_PRIMITIVE_VALUE: &str = "<non-primitive value>";

/// Best-effort name of a rejected value's type, limited to the built-in primitives
pub(crate) fn value_type_name(value: &dyn Any) -> String {
    crate::reflection::typesystem::builtin_renderers()
        .into_iter()
        .map(|(handle, _)| handle)
        .find(|handle| handle.is_instance(value))
        .map_or_else(|| NON_PRIMITIVE_VALUE.to_string(), |handle| handle.name())
}
