//! Ordered containers for dynamic data.
//!
//! - [`StringSet`]: ordered string-to-string mapping, the textual projection of objects
//! - [`HeterogeneousStore`]: string-keyed values of arbitrary types, with type-name keys as
//!   an implicit addressing mode
//! - [`ToStringSet`]: conversion of maps, stores and reflectable objects into a [`StringSet`]

mod store;
mod stringset;

pub use store::HeterogeneousStore;
pub use stringset::{default_text, StringSet, ToStringSet};
