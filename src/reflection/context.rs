//! The reflection context: registry, member cache, configuration and serializer in one place.
//!
//! Every dynamic operation of this crate runs against a [`ReflectionContext`]. A context owns
//!
//! - the [`TypeRegistry`] answering "which members and methods does this type have",
//! - the [`MemberCache`] memoizing public member lists for string projections,
//! - the [`ReflectionConfig`] chosen at construction,
//! - the default [`Serializer`] used to turn a [`StringSet`] into text.
//!
//! Independent contexts share nothing, which keeps tests isolated. Code that does not want to
//! carry a context around uses the lazily created process-wide one from
//! [`ReflectionContext::global`].
//!
//! # Examples
//!
//! ```rust
//! use synergy::reflection::{DynValue, Reflect, ReflectionContext, TypeHandle, TypeInfo};
//!
//! #[derive(Default)]
//! struct Echo {
//!     calls: u32,
//! }
//!
//! impl Reflect for Echo {
//!     fn describe() -> TypeInfo {
//!         TypeInfo::builder::<Echo>()
//!             .field("calls", |e| &e.calls, |e| &mut e.calls)
//!             .method("Echo", |m| {
//!                 m.generic(["T"])
//!                     .param_generic(0)
//!                     .returns_generic(0)
//!                     .body(|echo: &mut Echo, call| {
//!                         echo.calls += 1;
//!                         call.take_any(0).map(Some)
//!                     })
//!             })
//!             .build()
//!     }
//! }
//!
//! let context = ReflectionContext::new();
//! let mut echo = Echo::default();
//!
//! let result = context
//!     .invoke_generic(
//!         &mut echo,
//!         "Echo",
//!         &[TypeHandle::of::<i32>()],
//!         vec![Box::new(42_i32) as DynValue],
//!     )?
//!     .expect("Echo returns a value");
//! assert_eq!(result.downcast_ref::<i32>(), Some(&42));
//!
//! let mapping = context.to_string_mapping(&echo)?;
//! assert_eq!(mapping["calls"], "1");
//! # Ok::<(), synergy::Error>(())
//! ```

use std::{
    any::Any,
    sync::{Arc, OnceLock, RwLock},
};

use indexmap::IndexMap;

use crate::{
    collections::{default_text, StringSet},
    reflection::{
        cache::MemberCache,
        config::ReflectionConfig,
        member::MemberDescriptor,
        method::{resolve_generic_method, BindingFlags, MethodDescriptor},
        typesystem::{TypeHandle, TypeInfo, TypeRegistry},
        DynValue, Reflect, Reflected,
    },
    Result,
};

/// A string set serializer
pub type Serializer = Arc<dyn Fn(&StringSet) -> String + Send + Sync>;

static GLOBAL: OnceLock<ReflectionContext> = OnceLock::new();

/// Owner of the registry, member cache, configuration and default serializer
pub struct ReflectionContext {
    config: ReflectionConfig,
    registry: TypeRegistry,
    members: MemberCache,
    serializer: RwLock<Serializer>,
}

impl ReflectionContext {
    /// Create a context with the default configuration
    pub fn new() -> Self {
        Self::with_config(ReflectionConfig::default())
    }

    /// Create a context with a custom configuration
    pub fn with_config(config: ReflectionConfig) -> Self {
        ReflectionContext {
            config,
            registry: TypeRegistry::new(),
            members: MemberCache::new(),
            serializer: RwLock::new(Arc::new(default_text)),
        }
    }

    /// The process-wide context, created with the default configuration on first use
    pub fn global() -> &'static ReflectionContext {
        GLOBAL.get_or_init(ReflectionContext::new)
    }

    /// The configuration this context was created with
    pub fn config(&self) -> &ReflectionConfig {
        &self.config
    }

    /// The type registry
    pub fn registry(&self) -> &TypeRegistry {
        &self.registry
    }

    /// The per-type member cache
    pub fn member_cache(&self) -> &MemberCache {
        &self.members
    }

    /// Public members of `T`: fields first, then properties, each in declaration order
    pub fn enumerate_members<T: Reflect>(&self) -> Vec<MemberDescriptor> {
        self.registry
            .info::<T>()
            .public_members()
            .cloned()
            .collect()
    }

    /// Public members of a registered type, by handle
    ///
    /// # Errors
    /// Returns [`crate::Error::TypeNotRegistered`] if the type has no description.
    pub fn enumerate_members_of(&self, handle: &TypeHandle) -> Result<Vec<MemberDescriptor>> {
        Ok(self.registry.get(handle)?.public_members().cloned().collect())
    }

    /// Declared type of the member `name` on a registered type
    ///
    /// # Errors
    /// - [`crate::Error::TypeNotRegistered`] if the type has no description
    /// - [`crate::Error::MemberNotFound`] if the type has no such member
    pub fn member_type(&self, handle: &TypeHandle, name: &str) -> Result<TypeHandle> {
        Ok(self.registry.get(handle)?.member(name)?.member_type())
    }

    /// Read the member `name` off `target`
    ///
    /// # Errors
    /// Returns [`crate::Error::MemberNotFound`] if the target's type has no such member.
    pub fn get_member_value(&self, target: &dyn Reflected, name: &str) -> Result<DynValue> {
        let info = self.registry.info_of(target);
        info.member(name)?.get_value(target.as_any())
    }

    /// Write `value` into the member `name` on `target`
    ///
    /// # Errors
    /// - [`crate::Error::MemberNotFound`] if the target's type has no such member
    /// - [`crate::Error::TypeMismatch`] if `value` is not of the declared member type
    /// - [`crate::Error::MemberReadOnly`] if the member cannot be written
    pub fn set_member_value(
        &self,
        target: &mut dyn Reflected,
        name: &str,
        value: DynValue,
    ) -> Result<()> {
        let info = self.registry.info_of(&*target);
        info.member(name)?.set_value(target.as_any_mut(), value)
    }

    /// Locate a generic method on a registered type
    ///
    /// See [`resolve_generic_method`] for the matching rules. Ambiguity is reported only when
    /// the context was created with strict method resolution.
    ///
    /// # Errors
    /// - [`crate::Error::TypeNotRegistered`] if the type has no description
    /// - [`crate::Error::MethodNotFound`] / [`crate::Error::AmbiguousMethod`] from resolution
    pub fn find_generic_method(
        &self,
        handle: &TypeHandle,
        name: &str,
        type_args: &[TypeHandle],
        arg_types: Option<&[TypeHandle]>,
        flags: BindingFlags,
    ) -> Result<Arc<MethodDescriptor>> {
        let info = self.registry.get(handle)?;
        self.resolve(&info, name, type_args, arg_types, flags)
    }

    /// Locate a static generic method of any visibility on a registered type
    ///
    /// # Errors
    /// Same as [`ReflectionContext::find_generic_method`].
    pub fn find_static_generic_method(
        &self,
        handle: &TypeHandle,
        name: &str,
        type_args: &[TypeHandle],
        arg_types: Option<&[TypeHandle]>,
    ) -> Result<Arc<MethodDescriptor>> {
        self.find_generic_method(handle, name, type_args, arg_types, BindingFlags::static_all())
    }

    /// Resolve, bind and invoke a generic instance method on `target`
    ///
    /// Public and non-public instance methods of the target's concrete type are considered.
    ///
    /// # Errors
    /// - [`crate::Error::MethodNotFound`] / [`crate::Error::AmbiguousMethod`] from resolution
    /// - [`crate::Error::ArgumentCount`] / [`crate::Error::TypeMismatch`] for unfit `args`
    /// - Any error returned by the method body, unchanged
    pub fn invoke_generic(
        &self,
        target: &mut dyn Reflected,
        name: &str,
        type_args: &[TypeHandle],
        args: Vec<DynValue>,
    ) -> Result<Option<DynValue>> {
        let info = self.registry.info_of(&*target);
        let method = self.resolve(&info, name, type_args, None, BindingFlags::instance_all())?;
        method
            .make_generic(type_args)?
            .invoke(target.as_any_mut(), args)
    }

    /// Resolve, bind and invoke a generic static method of a registered type
    ///
    /// # Errors
    /// - [`crate::Error::TypeNotRegistered`] if the type has no description
    /// - Otherwise the same as [`ReflectionContext::invoke_generic`]
    pub fn invoke_static_generic(
        &self,
        handle: &TypeHandle,
        name: &str,
        type_args: &[TypeHandle],
        args: Vec<DynValue>,
    ) -> Result<Option<DynValue>> {
        let info = self.registry.get(handle)?;
        self.invoke_static_on(&info, name, type_args, args)
    }

    /// Resolve, bind and invoke a generic static method of the concrete type behind `instance`
    ///
    /// The instance only selects the type; it is not passed to the method.
    ///
    /// # Errors
    /// Same as [`ReflectionContext::invoke_generic`].
    pub fn invoke_static_generic_of(
        &self,
        instance: &dyn Reflected,
        name: &str,
        type_args: &[TypeHandle],
        args: Vec<DynValue>,
    ) -> Result<Option<DynValue>> {
        let info = self.registry.info_of(instance);
        self.invoke_static_on(&info, name, type_args, args)
    }

    /// Project the public members of `object` into an ordered name → text mapping
    ///
    /// Absent values render as [`ReflectionConfig::null_text`].
    ///
    /// # Errors
    /// Returns [`crate::Error::InvalidTarget`] if a registered description does not belong to
    /// the object's type.
    pub fn to_string_mapping(&self, object: &dyn Reflected) -> Result<IndexMap<String, String>> {
        let members = self
            .members
            .members(&self.registry, object, self.config.cache_members);

        let mut mapping = IndexMap::with_capacity(members.len());
        for member in members.iter() {
            let text = member
                .render(object.as_any())?
                .unwrap_or_else(|| self.config.null_text.clone());
            mapping.insert(member.name().to_string(), text);
        }

        Ok(mapping)
    }

    /// Project the public members of `object` into a [`StringSet`]
    ///
    /// # Errors
    /// Same as [`ReflectionContext::to_string_mapping`].
    pub fn to_string_set(&self, object: &dyn Reflected) -> Result<StringSet> {
        self.to_string_mapping(object).map(StringSet::from)
    }

    /// The serializer used when none is given explicitly
    pub fn default_serializer(&self) -> Serializer {
        Arc::clone(&read_lock!(self.serializer))
    }

    /// Replace the default serializer
    pub fn set_default_serializer<F>(&self, serializer: F)
    where
        F: Fn(&StringSet) -> String + Send + Sync + 'static,
    {
        *write_lock!(self.serializer) = Arc::new(serializer);
    }

    /// Restore the built-in serializer
    pub fn reset_default_serializer(&self) {
        *write_lock!(self.serializer) = Arc::new(default_text);
    }

    /// Serialize `set` with `serializer`, or with the default serializer if none is given
    pub fn render_string_set(
        &self,
        set: &StringSet,
        serializer: Option<&dyn Fn(&StringSet) -> String>,
    ) -> String {
        match serializer {
            Some(serialize) => serialize(set),
            None => {
                let serialize = self.default_serializer();
                serialize(set)
            }
        }
    }

    /// Render a type-erased value of type `handle` with the registry's renderers
    pub fn render_value(&self, value: &dyn Any, handle: TypeHandle) -> String {
        self.registry.render(value, handle)
    }

    fn resolve(
        &self,
        info: &TypeInfo,
        name: &str,
        type_args: &[TypeHandle],
        arg_types: Option<&[TypeHandle]>,
        flags: BindingFlags,
    ) -> Result<Arc<MethodDescriptor>> {
        resolve_generic_method(
            info,
            name,
            type_args,
            arg_types,
            flags,
            self.config.strict_method_resolution,
        )
    }

    fn invoke_static_on(
        &self,
        info: &TypeInfo,
        name: &str,
        type_args: &[TypeHandle],
        args: Vec<DynValue>,
    ) -> Result<Option<DynValue>> {
        let method = self.resolve(info, name, type_args, None, BindingFlags::static_all())?;
        method.make_generic(type_args)?.invoke_static(args)
    }
}

impl Default for ReflectionContext {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{test::Person, Error};

    #[test]
    fn projection_follows_member_order() {
        let context = ReflectionContext::new();
        let mapping = context.to_string_mapping(&Person::sample()).unwrap();

        let pairs: Vec<_> = mapping
            .iter()
            .map(|(k, v)| (k.as_str(), v.as_str()))
            .collect();
        assert_eq!(
            pairs,
            [
                ("name", "Ada"),
                ("age", "36"),
                ("nickname", ""),
                ("display_name", "Ada (36)"),
            ]
        );
        assert!(!mapping.contains_key("secret"));
    }

    #[test]
    fn null_text_is_configurable() {
        let context =
            ReflectionContext::with_config(ReflectionConfig::default().with_null_text("n/a"));
        let mapping = context.to_string_mapping(&Person::sample()).unwrap();
        assert_eq!(mapping["nickname"], "n/a");
    }

    #[test]
    fn absent_properties_render_as_null_text() {
        struct Ticket {
            assignee: Option<String>,
        }

        impl Reflect for Ticket {
            fn describe() -> TypeInfo {
                TypeInfo::builder::<Ticket>()
                    .nullable_property("assignee", |t| t.assignee.clone())
                    .build()
            }
        }

        let context =
            ReflectionContext::with_config(ReflectionConfig::default().with_null_text("-"));
        let open = Ticket { assignee: None };
        assert_eq!(context.to_string_mapping(&open).unwrap()["assignee"], "-");

        let taken = Ticket {
            assignee: Some(String::from("Grace")),
        };
        assert_eq!(context.to_string_mapping(&taken).unwrap()["assignee"], "Grace");
        assert_eq!(
            ReflectionContext::new().to_string_mapping(&open).unwrap()["assignee"],
            ""
        );
    }

    #[test]
    fn cached_members_agree_with_registry() {
        let context = ReflectionContext::new();
        let person = Person::sample();
        let before = context.to_string_mapping(&person).unwrap();

        let replacement = TypeInfo::builder::<Person>()
            .property("n", |_| true)
            .build();
        assert!(matches!(
            context.registry().register_info(replacement),
            Err(Error::TypeAlreadyRegistered(_))
        ));

        let after = context.to_string_mapping(&person).unwrap();
        assert_eq!(before, after);
        assert!(context.get_member_value(&person, "name").is_ok());
        assert!(matches!(
            context.get_member_value(&person, "n"),
            Err(Error::MemberNotFound { .. })
        ));
    }

    #[test]
    fn uncached_context_recomputes() {
        let context = ReflectionContext::with_config(ReflectionConfig::uncached());
        context.to_string_mapping(&Person::sample()).unwrap();
        context.to_string_mapping(&Person::sample()).unwrap();

        assert_eq!(context.member_cache().misses(), 2);
        assert!(context.member_cache().is_empty());
    }

    #[test]
    fn members_by_name() {
        let context = ReflectionContext::new();
        let mut person = Person::sample();

        context
            .set_member_value(&mut person, "age", Box::new(37_u32))
            .unwrap();
        let age = context.get_member_value(&person, "age").unwrap();
        assert_eq!(age.downcast_ref::<u32>(), Some(&37));

        let secret = context.get_member_value(&person, "secret").unwrap();
        assert_eq!(secret.downcast_ref::<String>().map(String::as_str), Some("hunter2"));

        assert!(matches!(
            context.set_member_value(&mut person, "display_name", Box::new(String::new())),
            Err(Error::MemberReadOnly { .. })
        ));
        assert!(matches!(
            context.get_member_value(&person, "height"),
            Err(Error::MemberNotFound { .. })
        ));

        let handle = TypeHandle::of::<Person>();
        assert_eq!(
            context.member_type(&handle, "nickname").unwrap(),
            TypeHandle::of::<Option<String>>()
        );
    }

    #[test]
    fn enumeration_by_handle_needs_registration() {
        let context = ReflectionContext::new();
        let handle = TypeHandle::of::<Person>();

        assert!(matches!(
            context.enumerate_members_of(&handle),
            Err(Error::TypeNotRegistered(_))
        ));
        assert_eq!(context.enumerate_members::<Person>().len(), 4);
        assert_eq!(context.enumerate_members_of(&handle).unwrap().len(), 4);
    }

    #[test]
    fn serializer_swap_and_reset() {
        let context = ReflectionContext::new();
        let set: StringSet = [("a", "1")].into_iter().collect();

        context.set_default_serializer(|set: &StringSet| format!("{} entries", set.len()));
        assert_eq!(context.render_string_set(&set, None), "1 entries");
        assert_eq!(
            context.render_string_set(&set, Some(&|_: &StringSet| String::from("custom"))),
            "custom"
        );

        context.reset_default_serializer();
        assert_eq!(context.render_string_set(&set, None), r#"{ "a":"1" }"#);
    }

    #[test]
    fn renders_loose_values() {
        let context = ReflectionContext::new();
        assert_eq!(context.render_value(&true, TypeHandle::of::<bool>()), "true");
    }
}
