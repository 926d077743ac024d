use thiserror::Error;

/// The generic Error type, which provides coverage for all errors this library can potentially
/// return.
///
/// Every failure of a lookup, access, cast or dispatch is surfaced as its own variant. Nothing
/// in this crate recovers from an error locally or retries an operation; errors raised by the
/// body of an invoked method travel back to the caller unchanged.
///
/// # Error Categories
///
/// ## Member Access Errors
/// - [`Error::MemberNotFound`] - Requested field or property is not declared on the type
/// - [`Error::MemberReadOnly`] - Write to a property without a setter
/// - [`Error::InvalidTarget`] - Target instance is not of the member's owner type
/// - [`Error::TypeMismatch`] - Value of an incompatible type written or passed
///
/// ## Dispatch Errors
/// - [`Error::MethodNotFound`] - No generic method matches name, arity and signature
/// - [`Error::AmbiguousMethod`] - More than one match while strict resolution is enabled
/// - [`Error::GenericArity`] - Wrong number of type arguments supplied for binding
/// - [`Error::ArgumentCount`] - Wrong number of call arguments supplied
/// - [`Error::Invocation`] - Failure raised by the invoked method body itself
///
/// ## Registry and Store Errors
/// - [`Error::TypeNotRegistered`] - Type handle has no description in the registry
/// - [`Error::TypeAlreadyRegistered`] - Type already has a description, which is never replaced
/// - [`Error::InvalidCast`] - Stored value is not of the requested type
///
/// # Examples
///
/// ```rust
/// use synergy::{collections::HeterogeneousStore, Error};
///
/// let mut store = HeterogeneousStore::new();
/// store.insert("answer", 42_i32);
///
/// match store.get_ref::<String>("answer") {
///     Err(Error::InvalidCast { key, expected, actual }) => {
///         assert_eq!(key, "answer");
///         assert_eq!(expected, "String");
///         assert_eq!(actual, "i32");
///     }
///     other => panic!("unexpected result: {other:?}"),
/// }
/// ```
#[derive(Error, Debug)]
pub enum Error {
    /// The requested field or property is not declared on the type.
    ///
    /// Raised by name-based member lookups. Only members registered in the type's
    /// description can be found; visibility does not matter for lookups by name.
    #[error("Member '{member}' not found on type '{type_name}'")]
    MemberNotFound {
        /// Short name of the type that was searched
        type_name: String,
        /// The member name that was requested
        member: String,
    },

    /// A value could not be written or passed because its type is incompatible.
    ///
    /// Occurs when writing a member whose declared type differs from the runtime type
    /// of the supplied value, or when an invocation argument does not match the bound
    /// parameter type.
    #[error("Type mismatch - expected '{expected}', got '{actual}'")]
    TypeMismatch {
        /// The declared (expected) type
        expected: String,
        /// The runtime type that was supplied
        ///
        /// Only the built-in primitives can be named from a type-erased value; any other
        /// rejected value is reported as `<non-primitive value>`.
        actual: String,
    },

    /// No generic method matched the requested name, generic arity and signature.
    #[error("No generic method '{method}' with {arity} type parameter(s) found on '{type_name}'")]
    MethodNotFound {
        /// Short name of the type that was searched
        type_name: String,
        /// The requested method name
        method: String,
        /// Number of type arguments that were requested
        arity: usize,
    },

    /// More than one generic method matched while strict resolution was enabled.
    ///
    /// The default resolution policy returns the first match in declaration order and
    /// never produces this error; see
    /// [`crate::reflection::ReflectionConfig::strict_method_resolution`].
    #[error("Generic method '{method}' on '{type_name}' is ambiguous - {candidates} candidates")]
    AmbiguousMethod {
        /// Short name of the type that was searched
        type_name: String,
        /// The requested method name
        method: String,
        /// How many methods matched
        candidates: usize,
    },

    /// A heterogeneous store entry exists but holds a value of a different type.
    #[error("Invalid cast of entry '{key}' - expected '{expected}', stored '{actual}'")]
    InvalidCast {
        /// The key of the entry
        key: String,
        /// The requested type
        expected: String,
        /// The type of the stored value
        actual: String,
    },

    /// The target instance does not possess the member or method.
    ///
    /// Raised when a descriptor resolved on one type is applied to an instance of another.
    #[error("Invalid target - expected an instance of '{expected}', got '{actual}'")]
    InvalidTarget {
        /// The owner type of the descriptor
        expected: String,
        /// The type of the supplied target, if known
        actual: String,
    },

    /// The property has no setter.
    #[error("Member '{member}' on type '{type_name}' is read-only")]
    MemberReadOnly {
        /// Short name of the owner type
        type_name: String,
        /// The member name
        member: String,
    },

    /// The number of type arguments does not match the generic method definition.
    #[error("Method '{method}' expects {expected} type argument(s), got {actual}")]
    GenericArity {
        /// The method name
        method: String,
        /// Declared generic parameter count
        expected: usize,
        /// Number of type arguments supplied
        actual: usize,
    },

    /// The number of call arguments does not match the method's parameter count.
    #[error("Method '{method}' expects {expected} argument(s), got {actual}")]
    ArgumentCount {
        /// The method name
        method: String,
        /// Declared parameter count
        expected: usize,
        /// Number of arguments supplied
        actual: usize,
    },

    /// The type has no description in the type registry.
    ///
    /// Only reachable through the type-erased entry points that look a type up by its
    /// handle; typed entry points register the type on first use.
    #[error("Type '{0}' is not registered")]
    TypeNotRegistered(String),

    /// A hand-built description was registered for a type that is already described.
    ///
    /// Descriptions are fixed once loaded, so member caches never disagree with the registry.
    #[error("Type '{0}' is already registered")]
    TypeAlreadyRegistered(String),

    /// An invoked method body failed.
    ///
    /// Method bodies report their own failures through this variant (or any other
    /// variant); the invoker hands them back untouched.
    #[error("{0}")]
    Invocation(#[from] Box<dyn std::error::Error + Send + Sync>),
}

impl Error {
    /// Wrap an arbitrary error raised inside a method body.
    ///
    /// ## Arguments
    /// * `error` - The error produced by the body
    pub fn invocation<E>(error: E) -> Self
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        Error::Invocation(Box::new(error))
    }
}
