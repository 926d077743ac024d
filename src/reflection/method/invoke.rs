//! Bound generic methods and their call frames.
//!
//! A [`BoundMethod`] is a [`MethodDescriptor`] with concrete type arguments. Invoking it checks
//! what a call mechanism has to check anyway (the number of arguments and the type of each
//! argument against the bound parameter type), then hands an [`Invocation`] to the method
//! body. Whatever the body returns, success or error, is returned to the caller unchanged.

use std::{any::Any, fmt, sync::Arc};

use log::trace;

use crate::{
    reflection::{
        member::value_type_name,
        method::{MethodBody, MethodDescriptor},
        typesystem::TypeHandle,
        DynValue,
    },
    Error, Result,
};

/// The call frame handed to a method body
///
/// Holds the bound type arguments and the call arguments. Arguments are moved out of the frame
/// by index; each one can be taken once.
pub struct Invocation<'a> {
    method: &'a str,
    type_args: &'a [TypeHandle],
    args: Vec<Option<DynValue>>,
}

impl<'a> Invocation<'a> {
    /// Create a frame for `method` with the given type arguments and call arguments
    pub fn new(method: &'a str, type_args: &'a [TypeHandle], args: Vec<DynValue>) -> Self {
        Invocation {
            method,
            type_args,
            args: args.into_iter().map(Some).collect(),
        }
    }

    /// Name of the invoked method
    pub fn method(&self) -> &str {
        self.method
    }

    /// The bound type arguments
    pub fn type_args(&self) -> &[TypeHandle] {
        self.type_args
    }

    /// The type argument at `index`
    pub fn type_arg(&self, index: usize) -> Option<TypeHandle> {
        self.type_args.get(index).copied()
    }

    /// Number of call arguments (taken or not)
    pub fn len(&self) -> usize {
        self.args.len()
    }

    /// Returns `true` for calls without arguments
    pub fn is_empty(&self) -> bool {
        self.args.is_empty()
    }

    /// Borrow the argument at `index` as `V`
    ///
    /// # Errors
    /// - [`Error::ArgumentCount`] if there is no argument at `index` (or it was taken)
    /// - [`Error::TypeMismatch`] if the argument is not a `V`
    pub fn arg<V: Any>(&self, index: usize) -> Result<&V> {
        let value = self
            .args
            .get(index)
            .and_then(Option::as_ref)
            .ok_or_else(|| self.missing(index))?;

        value.downcast_ref::<V>().ok_or_else(|| {
            type_mismatch!(TypeHandle::of::<V>(), value_type_name(value.as_ref()))
        })
    }

    /// Move the argument at `index` out of the frame, type-erased
    ///
    /// # Errors
    /// Returns [`Error::ArgumentCount`] if there is no argument at `index` (or it was taken).
    pub fn take_any(&mut self, index: usize) -> Result<DynValue> {
        let missing = self.missing(index);
        self.args
            .get_mut(index)
            .and_then(Option::take)
            .ok_or(missing)
    }

    /// Move the argument at `index` out of the frame as `V`
    ///
    /// On a type mismatch the argument stays in the frame.
    ///
    /// # Errors
    /// - [`Error::ArgumentCount`] if there is no argument at `index` (or it was taken)
    /// - [`Error::TypeMismatch`] if the argument is not a `V`
    pub fn take<V: Any>(&mut self, index: usize) -> Result<V> {
        let value = self.take_any(index)?;

        match value.downcast::<V>() {
            Ok(value) => Ok(*value),
            Err(rejected) => {
                let actual = value_type_name(rejected.as_ref());
                self.args[index] = Some(rejected);
                Err(type_mismatch!(TypeHandle::of::<V>(), actual))
            }
        }
    }

    fn missing(&self, index: usize) -> Error {
        Error::ArgumentCount {
            method: self.method.to_string(),
            expected: index + 1,
            actual: self.args.iter().filter(|arg| arg.is_some()).count(),
        }
    }
}

/// A method definition with bound type arguments, ready to be invoked
#[derive(Clone)]
pub struct BoundMethod {
    method: Arc<MethodDescriptor>,
    type_args: Vec<TypeHandle>,
}

impl BoundMethod {
    pub(crate) fn new(method: Arc<MethodDescriptor>, type_args: Vec<TypeHandle>) -> Self {
        BoundMethod { method, type_args }
    }

    /// The open definition
    pub fn definition(&self) -> &Arc<MethodDescriptor> {
        &self.method
    }

    /// The bound type arguments
    pub fn type_args(&self) -> &[TypeHandle] {
        &self.type_args
    }

    /// Parameter types with the type arguments substituted
    ///
    /// Parameters referring to a generic index that does not exist are left out.
    pub fn parameter_types(&self) -> Vec<TypeHandle> {
        self.method
            .params
            .iter()
            .filter_map(|param| param.bind(&self.type_args))
            .collect()
    }

    /// Return type with the type arguments substituted, `None` for methods without result
    pub fn return_type(&self) -> Option<TypeHandle> {
        self.method
            .returns
            .and_then(|returns| returns.bind(&self.type_args))
    }

    /// Invoke against `target`
    ///
    /// Static methods ignore the target.
    ///
    /// # Errors
    /// - [`Error::ArgumentCount`] / [`Error::TypeMismatch`] if `args` do not fit the signature
    /// - [`Error::InvalidTarget`] if `target` is not an instance of the declaring type
    /// - Any error returned by the method body, unchanged
    pub fn invoke(&self, target: &mut dyn Any, args: Vec<DynValue>) -> Result<Option<DynValue>> {
        self.check_args(&args)?;
        trace!(
            "Invoking '{}::{}' with {} type argument(s)",
            self.method.owner.name(),
            self.method.name,
            self.type_args.len()
        );

        let mut call = Invocation::new(&self.method.name, &self.type_args, args);
        match &self.method.body {
            MethodBody::Instance(body) => body(target, &mut call),
            MethodBody::Static(body) => body(&mut call),
        }
    }

    /// Invoke without an instance
    ///
    /// # Errors
    /// - [`Error::InvalidTarget`] if the method needs an instance
    /// - [`Error::ArgumentCount`] / [`Error::TypeMismatch`] if `args` do not fit the signature
    /// - Any error returned by the method body, unchanged
    pub fn invoke_static(&self, args: Vec<DynValue>) -> Result<Option<DynValue>> {
        let MethodBody::Static(body) = &self.method.body else {
            return Err(Error::InvalidTarget {
                expected: self.method.owner.name(),
                actual: "<none>".to_string(),
            });
        };

        self.check_args(&args)?;
        trace!(
            "Invoking static '{}::{}' with {} type argument(s)",
            self.method.owner.name(),
            self.method.name,
            self.type_args.len()
        );

        let mut call = Invocation::new(&self.method.name, &self.type_args, args);
        body(&mut call)
    }

    fn check_args(&self, args: &[DynValue]) -> Result<()> {
        let params = &self.method.params;
        if args.len() != params.len() {
            return Err(Error::ArgumentCount {
                method: self.method.name.clone(),
                expected: params.len(),
                actual: args.len(),
            });
        }

        for (param, arg) in params.iter().zip(args) {
            let Some(expected) = param.bind(&self.type_args) else {
                continue;
            };
            if !expected.is_instance(arg.as_ref()) {
                return Err(type_mismatch!(expected, value_type_name(arg.as_ref())));
            }
        }

        Ok(())
    }
}

impl fmt::Debug for BoundMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BoundMethod")
            .field("method", &self.method.name)
            .field("type_args", &self.type_args)
            .finish()
    }
}
