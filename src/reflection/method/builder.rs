use std::{any::Any, marker::PhantomData, sync::Arc};

use crate::{
    reflection::{
        method::{Invocation, MethodBody, MethodDescriptor, ParamType},
        typesystem::TypeHandle,
        DynValue, Visibility, UNKNOWN_TYPE,
    },
    Error, Result,
};

/// Fluent construction of a [`MethodDescriptor`] owned by `T`
///
/// The signature is declared first; the builder is finished by supplying either an instance
/// body ([`MethodBuilder::body`]) or a static body ([`MethodBuilder::static_body`]).
pub struct MethodBuilder<T> {
    name: String,
    generic_params: Vec<String>,
    params: Vec<ParamType>,
    returns: Option<ParamType>,
    visibility: Visibility,
    _owner: PhantomData<fn() -> T>,
}

impl<T: 'static> MethodBuilder<T> {
    /// Start a public, non-generic method without parameters
    pub fn new(name: &str) -> Self {
        MethodBuilder {
            name: name.to_string(),
            generic_params: Vec::new(),
            params: Vec::new(),
            returns: None,
            visibility: Visibility::Public,
            _owner: PhantomData,
        }
    }

    /// Declare the generic parameters
    #[must_use]
    pub fn generic<I, S>(mut self, params: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.generic_params = params.into_iter().map(Into::into).collect();
        self
    }

    /// Append a parameter of the fixed type `V`
    #[must_use]
    pub fn param<V: 'static>(mut self) -> Self {
        self.params.push(ParamType::Concrete(TypeHandle::of::<V>()));
        self
    }

    /// Append a parameter typed by the generic parameter at `index`
    #[must_use]
    pub fn param_generic(mut self, index: usize) -> Self {
        self.params.push(ParamType::Generic(index));
        self
    }

    /// Declare the fixed return type `V`
    #[must_use]
    pub fn returns<V: 'static>(mut self) -> Self {
        self.returns = Some(ParamType::Concrete(TypeHandle::of::<V>()));
        self
    }

    /// Declare the return type as the generic parameter at `index`
    #[must_use]
    pub fn returns_generic(mut self, index: usize) -> Self {
        self.returns = Some(ParamType::Generic(index));
        self
    }

    /// Hide the method from public lookups
    #[must_use]
    pub fn non_public(mut self) -> Self {
        self.visibility = Visibility::NonPublic;
        self
    }

    /// Finish as an instance method
    ///
    /// The body receives the target, already downcast to `T`, and the call frame.
    pub fn body<F>(self, body: F) -> MethodDescriptor
    where
        F: Fn(&mut T, &mut Invocation<'_>) -> Result<Option<DynValue>> + Send + Sync + 'static,
    {
        let owner = TypeHandle::of::<T>();
        let dispatch = move |target: &mut dyn Any, call: &mut Invocation<'_>| {
            let this = target
                .downcast_mut::<T>()
                .ok_or_else(|| Error::InvalidTarget {
                    expected: owner.name(),
                    actual: UNKNOWN_TYPE.to_string(),
                })?;
            body(this, call)
        };

        self.finish(MethodBody::Instance(Arc::new(dispatch)))
    }

    /// Finish as a static method
    pub fn static_body<F>(self, body: F) -> MethodDescriptor
    where
        F: Fn(&mut Invocation<'_>) -> Result<Option<DynValue>> + Send + Sync + 'static,
    {
        self.finish(MethodBody::Static(Arc::new(body)))
    }

    fn finish(self, body: MethodBody) -> MethodDescriptor {
        MethodDescriptor {
            owner: TypeHandle::of::<T>(),
            name: self.name,
            generic_params: self.generic_params,
            params: self.params,
            returns: self.returns,
            visibility: self.visibility,
            body,
        }
    }
}
