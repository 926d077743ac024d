//! Method descriptors, generic binding and dispatch.
//!
//! Methods are declared per type through [`MethodBuilder`] and stored as
//! [`MethodDescriptor`]s in the type's [`crate::reflection::TypeInfo`]. A generic method is an
//! open definition: it names its generic parameters and may refer to them in its parameter and
//! return types through [`ParamType::Generic`]. Binding concrete type arguments produces a
//! [`BoundMethod`], which can then be invoked.
//!
//! # Key Types
//! - [`BindingFlags`]: Staticness and visibility filter used during resolution
//! - [`ParamType`]: Concrete or generic parameter/return type
//! - [`MethodDescriptor`]: An open method definition
//! - [`BoundMethod`] / [`Invocation`]: A method with bound type arguments, and its call frame
//! - [`MethodQuery`]: Composable filter over a type's methods

mod builder;
mod invoke;
mod query;

use std::{fmt, sync::Arc};

use bitflags::bitflags;

pub use builder::MethodBuilder;
pub use invoke::{BoundMethod, Invocation};
pub use query::{resolve_generic_method, MethodQuery};

use crate::{
    reflection::{typesystem::TypeHandle, DynValue, Visibility},
    Error, Result,
};

bitflags! {
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    /// Which methods take part in a lookup
    pub struct BindingFlags: u32 {
        /// Methods that operate on an instance
        const INSTANCE = 0x0001;
        /// Methods that operate without an instance
        const STATIC = 0x0002;
        /// Public methods
        const PUBLIC = 0x0004;
        /// Non-public methods
        const NON_PUBLIC = 0x0008;
    }
}

impl BindingFlags {
    /// Instance methods of any visibility
    #[must_use]
    pub fn instance_all() -> Self {
        Self::INSTANCE | Self::PUBLIC | Self::NON_PUBLIC
    }

    /// Static methods of any visibility
    #[must_use]
    pub fn static_all() -> Self {
        Self::STATIC | Self::PUBLIC | Self::NON_PUBLIC
    }
}

/// Declared type of a parameter or return value
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParamType {
    /// A fixed type
    Concrete(TypeHandle),
    /// The generic parameter at this index
    Generic(usize),
}

impl ParamType {
    /// Substitute the type arguments, `None` if a generic index is out of range
    #[must_use]
    pub fn bind(&self, type_args: &[TypeHandle]) -> Option<TypeHandle> {
        match self {
            ParamType::Concrete(handle) => Some(*handle),
            ParamType::Generic(index) => type_args.get(*index).copied(),
        }
    }
}

pub(crate) type InstanceBody = Arc<
    dyn Fn(&mut dyn std::any::Any, &mut Invocation<'_>) -> Result<Option<DynValue>> + Send + Sync,
>;
pub(crate) type StaticBody =
    Arc<dyn Fn(&mut Invocation<'_>) -> Result<Option<DynValue>> + Send + Sync>;

#[derive(Clone)]
pub(crate) enum MethodBody {
    Instance(InstanceBody),
    Static(StaticBody),
}

/// An open method definition on a type
pub struct MethodDescriptor {
    pub(crate) owner: TypeHandle,
    pub(crate) name: String,
    pub(crate) generic_params: Vec<String>,
    pub(crate) params: Vec<ParamType>,
    pub(crate) returns: Option<ParamType>,
    pub(crate) visibility: Visibility,
    pub(crate) body: MethodBody,
}

/// A reference-counted method descriptor
pub type MethodDescriptorRc = Arc<MethodDescriptor>;

impl MethodDescriptor {
    /// The method name
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The declaring type
    pub fn owner(&self) -> TypeHandle {
        self.owner
    }

    /// Names of the generic parameters, in declaration order
    pub fn generic_params(&self) -> &[String] {
        &self.generic_params
    }

    /// Number of generic parameters
    pub fn generic_arity(&self) -> usize {
        self.generic_params.len()
    }

    /// Returns `true` if the method declares at least one generic parameter
    pub fn is_generic(&self) -> bool {
        !self.generic_params.is_empty()
    }

    /// Declared parameter types
    pub fn params(&self) -> &[ParamType] {
        &self.params
    }

    /// Declared return type, `None` for methods without result
    pub fn returns(&self) -> Option<ParamType> {
        self.returns
    }

    /// Returns `true` for methods that need no instance
    pub fn is_static(&self) -> bool {
        matches!(self.body, MethodBody::Static(_))
    }

    /// Public or non-public
    pub fn visibility(&self) -> Visibility {
        self.visibility
    }

    /// The binding flags describing this method
    pub fn binding(&self) -> BindingFlags {
        let kind = if self.is_static() {
            BindingFlags::STATIC
        } else {
            BindingFlags::INSTANCE
        };
        let access = match self.visibility {
            Visibility::Public => BindingFlags::PUBLIC,
            Visibility::NonPublic => BindingFlags::NON_PUBLIC,
        };
        kind | access
    }

    /// Returns `true` if a lookup with `flags` would consider this method
    ///
    /// The staticness and the visibility of the method must both be requested.
    pub fn matches_binding(&self, flags: BindingFlags) -> bool {
        flags.contains(self.binding())
    }

    /// Parameter types after substituting `type_args`
    ///
    /// `None` if a parameter refers to a generic index outside `type_args`.
    pub fn bound_params(&self, type_args: &[TypeHandle]) -> Option<Vec<TypeHandle>> {
        self.params.iter().map(|p| p.bind(type_args)).collect()
    }

    /// Bind concrete type arguments to this definition
    ///
    /// # Errors
    /// Returns [`Error::GenericArity`] if the number of type arguments differs from the
    /// number of generic parameters.
    pub fn make_generic(self: &Arc<Self>, type_args: &[TypeHandle]) -> Result<BoundMethod> {
        if type_args.len() != self.generic_arity() {
            return Err(Error::GenericArity {
                method: self.name.clone(),
                expected: self.generic_arity(),
                actual: type_args.len(),
            });
        }

        Ok(BoundMethod::new(Arc::clone(self), type_args.to_vec()))
    }
}

impl fmt::Debug for MethodDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MethodDescriptor")
            .field("owner", &self.owner)
            .field("name", &self.name)
            .field("generic_params", &self.generic_params)
            .field("params", &self.params)
            .field("returns", &self.returns)
            .field("binding", &self.binding())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{reflection::TypeInfo, test::Person};

    #[test]
    fn binding_flags_of_methods() {
        let info = TypeInfo::builder::<Person>()
            .method("Visible", |m| m.generic(["T"]).body(|_, _| Ok(None)))
            .method("Hidden", |m| {
                m.generic(["T"]).non_public().static_body(|_| Ok(None))
            })
            .build();

        let visible = &info.methods()[0];
        let hidden = &info.methods()[1];

        assert_eq!(visible.binding(), BindingFlags::INSTANCE | BindingFlags::PUBLIC);
        assert!(visible.matches_binding(BindingFlags::instance_all()));
        assert!(!visible.matches_binding(BindingFlags::static_all()));
        assert!(!visible.matches_binding(BindingFlags::INSTANCE | BindingFlags::NON_PUBLIC));

        assert!(hidden.is_static());
        assert!(hidden.matches_binding(BindingFlags::static_all()));
        assert!(!hidden.matches_binding(BindingFlags::STATIC | BindingFlags::PUBLIC));
    }

    #[test]
    fn make_generic_checks_arity() {
        let info = TypeInfo::builder::<Person>()
            .method("Pair", |m| {
                m.generic(["A", "B"])
                    .param_generic(0)
                    .param_generic(1)
                    .body(|_, _| Ok(None))
            })
            .build();
        let pair = &info.methods()[0];

        assert!(matches!(
            pair.make_generic(&[TypeHandle::of::<u8>()]),
            Err(Error::GenericArity {
                expected: 2,
                actual: 1,
                ..
            })
        ));

        let bound = pair
            .make_generic(&[TypeHandle::of::<u8>(), TypeHandle::of::<String>()])
            .unwrap();
        assert_eq!(
            bound.parameter_types(),
            [TypeHandle::of::<u8>(), TypeHandle::of::<String>()]
        );
    }

    #[test]
    fn param_types_bind() {
        let args = [TypeHandle::of::<i32>()];
        assert_eq!(
            ParamType::Generic(0).bind(&args),
            Some(TypeHandle::of::<i32>())
        );
        assert_eq!(ParamType::Generic(1).bind(&args), None);
        assert_eq!(
            ParamType::Concrete(TypeHandle::of::<bool>()).bind(&args),
            Some(TypeHandle::of::<bool>())
        );
    }
}
