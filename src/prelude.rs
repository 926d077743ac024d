//! # synergy Prelude
//!
//! This module provides a convenient prelude for the most commonly used types and traits
//! from the synergy library. Import this module to get quick access to everything needed to
//! describe types, access their members and dispatch generic methods.

// ================================================================================================
// Core Types and Error Handling
// ================================================================================================

/// The main error type for all synergy operations
pub use crate::Error;

/// The result type used throughout synergy
pub use crate::Result;

// ================================================================================================
// Type Description
// ================================================================================================

/// Self-description of a type, and its object-safe counterpart
pub use crate::reflection::{Reflect, Reflected};

/// Type identity and descriptions
pub use crate::reflection::{TypeHandle, TypeInfo, TypeInfoBuilder, TypeRegistry};

/// Member descriptors and their classification
pub use crate::reflection::{MemberDescriptor, MemberKind, Visibility};

// ================================================================================================
// Generic Dispatch
// ================================================================================================

/// Method definitions, lookup and invocation
pub use crate::reflection::{
    BindingFlags, BoundMethod, DynValue, Invocation, MethodBuilder, MethodDescriptor,
    MethodQuery, ParamType,
};

// ================================================================================================
// Context and Configuration
// ================================================================================================

/// The reflection context and its configuration
pub use crate::reflection::{ReflectionConfig, ReflectionContext, Serializer};

// ================================================================================================
// Collections
// ================================================================================================

/// String sets, the heterogeneous store and string set conversion
pub use crate::collections::{HeterogeneousStore, StringSet, ToStringSet};
