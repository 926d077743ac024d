//! Composable method queries and generic method resolution.
//!
//! [`MethodQuery`] accumulates filter predicates over the methods of one [`TypeInfo`], in the
//! same fluent style used for type queries elsewhere. [`resolve_generic_method`] builds the
//! query used by the generic invoker: name, generic arity, binding flags and optionally a
//! parameter signature.
//!
//! # Resolution Order
//!
//! Candidates are visited in declaration order. When more than one method matches, the first
//! one wins and a warning is logged; declaration order is therefore part of the contract.
//! Strict resolution turns multiple matches into [`Error::AmbiguousMethod`] instead.
//!
//! # Examples
//!
//! ```rust
//! use synergy::reflection::{BindingFlags, MethodQuery, TypeInfo};
//!
//! struct Codec;
//!
//! let info = TypeInfo::builder::<Codec>()
//!     .method("Encode", |m| m.generic(["T"]).param_generic(0).body(|_, _| Ok(None)))
//!     .method("Encode", |m| m.body(|_, _| Ok(None)))
//!     .build();
//!
//! let generic = MethodQuery::new(&info).named("Encode").generic().find_all();
//! assert_eq!(generic.len(), 1);
//!
//! let instance = MethodQuery::new(&info)
//!     .binding(BindingFlags::instance_all())
//!     .count();
//! assert_eq!(instance, 2);
//! ```

use std::sync::Arc;

use log::{trace, warn};

use crate::{
    reflection::{
        method::{BindingFlags, MethodDescriptor},
        typesystem::{same_types, TypeHandle, TypeInfo},
    },
    Error, Result,
};

/// A boxed filter predicate over [`MethodDescriptor`] references.
type MethodFilter<'a> = Box<dyn Fn(&MethodDescriptor) -> bool + 'a>;

/// A composable query builder for filtering the methods of a type.
///
/// Each fluent method consumes and returns `Self`; terminal methods run the query in
/// declaration order.
pub struct MethodQuery<'a> {
    info: &'a TypeInfo,
    filters: Vec<MethodFilter<'a>>,
}

impl<'a> MethodQuery<'a> {
    /// Creates a new query over the methods of `info`.
    pub fn new(info: &'a TypeInfo) -> Self {
        Self {
            info,
            filters: Vec::new(),
        }
    }

    /// Filters to methods with the exact name.
    #[must_use]
    pub fn named(mut self, name: &'a str) -> Self {
        self.filters.push(Box::new(move |m| m.name() == name));
        self
    }

    /// Filters to generic methods.
    #[must_use]
    pub fn generic(mut self) -> Self {
        self.filters.push(Box::new(MethodDescriptor::is_generic));
        self
    }

    /// Filters to methods with exactly `arity` generic parameters.
    #[must_use]
    pub fn generic_arity(mut self, arity: usize) -> Self {
        self.filters
            .push(Box::new(move |m| m.generic_arity() == arity));
        self
    }

    /// Filters to methods a lookup with `flags` would consider.
    #[must_use]
    pub fn binding(mut self, flags: BindingFlags) -> Self {
        self.filters
            .push(Box::new(move |m| m.matches_binding(flags)));
        self
    }

    /// Filters to methods whose parameters, after binding `type_args`, equal `arg_types`.
    #[must_use]
    pub fn signature(mut self, type_args: &'a [TypeHandle], arg_types: &'a [TypeHandle]) -> Self {
        self.filters.push(Box::new(move |m| {
            m.bound_params(type_args)
                .is_some_and(|params| same_types(&params, arg_types))
        }));
        self
    }

    /// Filters to methods satisfying a custom predicate.
    #[must_use]
    pub fn filter<F>(mut self, predicate: F) -> Self
    where
        F: Fn(&MethodDescriptor) -> bool + 'a,
    {
        self.filters.push(Box::new(predicate));
        self
    }

    fn matches(&self, method: &MethodDescriptor) -> bool {
        self.filters.iter().all(|filter| filter(method))
    }

    /// Returns all matching methods, in declaration order.
    pub fn find_all(&self) -> Vec<&'a Arc<MethodDescriptor>> {
        self.info
            .methods()
            .iter()
            .filter(|m| self.matches(m))
            .collect()
    }

    /// Returns the first matching method.
    pub fn find_first(&self) -> Option<&'a Arc<MethodDescriptor>> {
        self.info.methods().iter().find(|m| self.matches(m))
    }

    /// Returns the number of matching methods.
    pub fn count(&self) -> usize {
        self.info
            .methods()
            .iter()
            .filter(|m| self.matches(m))
            .count()
    }
}

/// Locate a generic method by name, type arguments and optional parameter signature.
///
/// Only generic methods named `name` whose generic arity equals `type_args.len()` and whose
/// binding is covered by `flags` are candidates. The identity of the type arguments does not
/// take part in the match, only their count; if `arg_types` is given, the parameter types
/// (with `type_args` substituted) must equal it element by element.
///
/// ## Arguments
/// * `info` - The type to search
/// * `name` - Method name
/// * `type_args` - Type arguments the method will be bound with
/// * `arg_types` - Optional parameter signature
/// * `flags` - Staticness and visibility to consider
/// * `strict` - Fail on more than one candidate instead of taking the first
///
/// # Errors
/// - [`Error::MethodNotFound`] if no method matches
/// - [`Error::AmbiguousMethod`] if `strict` is set and more than one method matches
pub fn resolve_generic_method(
    info: &TypeInfo,
    name: &str,
    type_args: &[TypeHandle],
    arg_types: Option<&[TypeHandle]>,
    flags: BindingFlags,
    strict: bool,
) -> Result<Arc<MethodDescriptor>> {
    let mut query = MethodQuery::new(info)
        .binding(flags)
        .named(name)
        .generic()
        .generic_arity(type_args.len());
    if let Some(arg_types) = arg_types {
        query = query.signature(type_args, arg_types);
    }

    let candidates = query.find_all();
    trace!(
        "Resolving '{}::{}' with {} type argument(s) - {} candidate(s)",
        info.name(),
        name,
        type_args.len(),
        candidates.len()
    );

    match candidates.as_slice() {
        [] => Err(Error::MethodNotFound {
            type_name: info.name(),
            method: name.to_string(),
            arity: type_args.len(),
        }),
        [single] => Ok(Arc::clone(single)),
        [first, ..] if !strict => {
            warn!(
                "'{}::{}' matched {} generic methods, using the first declared",
                info.name(),
                name,
                candidates.len()
            );
            Ok(Arc::clone(first))
        }
        _ => Err(Error::AmbiguousMethod {
            type_name: info.name(),
            method: name.to_string(),
            candidates: candidates.len(),
        }),
    }
}
