//! Shared fixtures for unit tests
//!
//! [`Person`] is the reflectable type most tests run against. Its description declares, in
//! this order:
//!
//! - fields `name`, `age`, `nickname` (nullable) and the non-public `secret`
//! - the read-only property `display_name`
//! - `Identity<X>(X) -> X`
//! - two `Foo<X>` overloads of the same arity, `Foo<X>(X) -> "first"` declared first and
//!   `Foo<X>(X, String) -> "second"`, plus a non-generic `Foo()`
//! - `Rename<X>(String) -> String`, returning the previous name
//! - the non-public `Hidden<X>()` and the always failing `Fail<X>()`
//! - the static methods `Create<X>(String) -> Person` and `TypeName<X>() -> String`

use std::io;

use crate::{
    reflection::{DynValue, Reflect, TypeInfo},
    Error,
};

/// Reflectable fixture type
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Person {
    pub name: String,
    pub age: u32,
    pub nickname: Option<String>,
    secret: String,
}

impl Person {
    /// `Ada`, 36, no nickname
    pub fn sample() -> Self {
        Person {
            name: String::from("Ada"),
            age: 36,
            nickname: None,
            secret: String::from("hunter2"),
        }
    }
}

impl Reflect for Person {
    fn describe() -> TypeInfo {
        TypeInfo::builder::<Person>()
            .field("name", |p| &p.name, |p| &mut p.name)
            .field("age", |p| &p.age, |p| &mut p.age)
            .nullable_field("nickname", |p| &p.nickname, |p| &mut p.nickname)
            .non_public_field("secret", |p| &p.secret, |p| &mut p.secret)
            .property("display_name", |p| format!("{} ({})", p.name, p.age))
            .method("Identity", |m| {
                m.generic(["X"])
                    .param_generic(0)
                    .returns_generic(0)
                    .body(|_, call| call.take_any(0).map(Some))
            })
            .method("Foo", |m| {
                m.generic(["X"])
                    .param_generic(0)
                    .returns::<String>()
                    .body(|_, _| Ok(Some(Box::new(String::from("first")) as DynValue)))
            })
            .method("Foo", |m| {
                m.generic(["X"])
                    .param_generic(0)
                    .param::<String>()
                    .returns::<String>()
                    .body(|_, _| Ok(Some(Box::new(String::from("second")) as DynValue)))
            })
            .method("Foo", |m| m.body(|_, _| Ok(None)))
            .method("Rename", |m| {
                m.generic(["X"])
                    .param::<String>()
                    .returns::<String>()
                    .body(|person, call| {
                        let name = call.take::<String>(0)?;
                        let previous = std::mem::replace(&mut person.name, name);
                        Ok(Some(Box::new(previous) as DynValue))
                    })
            })
            .method("Hidden", |m| {
                m.generic(["X"]).non_public().body(|_, _| Ok(None))
            })
            .method("Fail", |m| {
                m.generic(["X"])
                    .body(|_, _| Err(Error::invocation(io::Error::other("boom"))))
            })
            .method("Create", |m| {
                m.generic(["X"])
                    .param::<String>()
                    .returns::<Person>()
                    .static_body(|call| {
                        let person = Person {
                            name: call.take::<String>(0)?,
                            ..Person::default()
                        };
                        Ok(Some(Box::new(person) as DynValue))
                    })
            })
            .method("TypeName", |m| {
                m.generic(["X"])
                    .returns::<String>()
                    .static_body(|call| {
                        let name = call.type_arg(0).map(|t| t.name()).unwrap_or_default();
                        Ok(Some(Box::new(name) as DynValue))
                    })
            })
            .build()
    }
}

/// A type without a description
pub struct Unregistered;

/// Route `log` output of the code under test to the test harness
pub fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}
