//! Default string conversion for type-erased values.
//!
//! Member descriptors know how to render their own values, but values held in a
//! [`crate::collections::HeterogeneousStore`] are fully type-erased. The registry therefore keeps
//! a table of renderers keyed by type, seeded with the primitive types listed here. Types
//! without a renderer fall back to their full type name.

use std::{any::Any, fmt::Display};

use crate::reflection::typesystem::TypeHandle;

/// Converts a type-erased value into its default textual form
///
/// Returns `None` if the value is not of the type the renderer was created for.
pub type RenderFn = fn(&dyn Any) -> Option<String>;

/// Render a value of type `T` through its `Display` implementation
pub fn render_display<T: Display + 'static>(value: &dyn Any) -> Option<String> {
    value.downcast_ref::<T>().map(ToString::to_string)
}

/// Render an `Option<T>`, an absent value becomes an empty string
pub fn render_optional<T: Display + 'static>(value: &dyn Any) -> Option<String> {
    value
        .downcast_ref::<Option<T>>()
        .map(|inner| inner.as_ref().map(ToString::to_string).unwrap_or_default())
}

macro_rules! primitive_renderers {
    ($($ty:ty),* $(,)?) => {
        vec![
            $(
                (TypeHandle::of::<$ty>(), render_display::<$ty> as RenderFn),
                (TypeHandle::of::<Option<$ty>>(), render_optional::<$ty> as RenderFn),
            )*
        ]
    };
}

/// The renderers every registry starts with
pub(crate) fn builtin_renderers() -> Vec<(TypeHandle, RenderFn)> {
    primitive_renderers![
        bool,
        char,
        i8,
        u8,
        i16,
        u16,
        i32,
        u32,
        i64,
        u64,
        i128,
        u128,
        isize,
        usize,
        f32,
        f64,
        String,
        &'static str,
    ]
}
