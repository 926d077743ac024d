// Copyright 2025 Johann Kempter
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.
//
// SPDX-License-Identifier: Apache-2.0

#![doc(html_no_source)]
#![deny(missing_docs)]
#![deny(unsafe_code)]

//! # synergy
//!
//! Run-time member access, generic method dispatch and string projections for Rust types.
//!
//! `synergy` lets code read and write the fields and properties of values whose concrete type
//! it does not know, find generic methods by name and type arguments and invoke them, and turn
//! any described object into an ordered string mapping for logging or templating.
//!
//! ## Features
//!
//! - **Type registry** - Types describe their members and methods once through [`reflection::Reflect`]
//! - **Member access** - Type-erased read, write and render of fields and properties
//! - **Generic dispatch** - Resolution by name, generic arity and optional signature, then invocation
//! - **Member cache** - Public member lists computed once per type for string projections
//! - **String sets** - Ordered string maps with a swappable serializer
//! - **Heterogeneous store** - String-keyed values of any type, with type-name keys
//!
//! ## Quick Start
//!
//! ```rust
//! use synergy::prelude::*;
//!
//! struct User {
//!     name: String,
//!     age: u32,
//! }
//!
//! impl Reflect for User {
//!     fn describe() -> TypeInfo {
//!         TypeInfo::builder::<User>()
//!             .field("name", |u| &u.name, |u| &mut u.name)
//!             .field("age", |u| &u.age, |u| &mut u.age)
//!             .build()
//!     }
//! }
//!
//! let user = User { name: "Ada".into(), age: 36 };
//! let set = user.to_string_set()?;
//!
//! assert_eq!(set.to_text(None), r#"{ "name":"Ada", "age":"36" }"#);
//! # Ok::<(), synergy::Error>(())
//! ```
//!
//! ## Contexts
//!
//! All dynamic operations run against a [`reflection::ReflectionContext`], which owns the type
//! registry, the member cache, the [`reflection::ReflectionConfig`] and the default string set
//! serializer. [`reflection::ReflectionContext::global`] provides a lazily created
//! process-wide context; independent contexts can be created for isolation.
//!
//! ## Error Handling
//!
//! All fallible operations return [`Result<T>`], with [`Error`] naming what went wrong:
//!
//! ```rust
//! use synergy::{collections::HeterogeneousStore, Error};
//!
//! let mut store = HeterogeneousStore::new();
//! store.insert("port", 8080_u16);
//!
//! match store.get::<String>("port") {
//!     Ok(value) => println!("port: {value}"),
//!     Err(Error::InvalidCast { key, expected, actual }) => {
//!         println!("'{key}' holds a {actual}, not a {expected}");
//!     }
//!     Err(e) => return Err(e),
//! }
//! # Ok::<(), synergy::Error>(())
//! ```

#[macro_use]
pub(crate) mod macros;

pub(crate) mod error;

/// Shared functionality which is used in unit- and integration-tests
#[cfg(test)]
pub(crate) mod test;

/// Convenient re-exports of the most commonly used types and traits.
///
/// # Example
///
/// ```rust
/// use synergy::prelude::*;
///
/// let mut store = HeterogeneousStore::new();
/// store.add(3_u8);
/// assert_eq!(store.get_typed::<u8>()?, 3);
/// # Ok::<(), synergy::Error>(())
/// ```
pub mod prelude;

/// Type registry, member access, generic method dispatch and the reflection context
///
/// # Key Types
///
/// - [`reflection::Reflect`] - Self-description of a type
/// - [`reflection::TypeRegistry`] - Descriptions of every known type
/// - [`reflection::MemberDescriptor`] - Access to one field or property
/// - [`reflection::MethodDescriptor`] - A generic method definition
/// - [`reflection::ReflectionContext`] - Owner of registry, cache, configuration and serializer
pub mod reflection;

/// String sets and the heterogeneous store
pub mod collections;

/// `synergy` Result type
///
/// A type alias for `std::result::Result<T, Error>` where the error type is always
/// [`crate::Error`].
pub type Result<T> = std::result::Result<T, Error>;

/// `synergy` Error type
///
/// The main error type for all operations in this crate. Every lookup, access, cast and
/// dispatch failure has its own variant.
pub use error::Error;
