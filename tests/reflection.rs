//! Integration tests for member access, member projection and generic dispatch.
//!
//! Every test creates its own `ReflectionContext`, so cache statistics and serializers never
//! leak between tests.

use std::sync::Arc;

use synergy::{prelude::*, Result};

/// An order line, described with fields, a nullable field, a computed property and a set of
/// generic methods.
#[derive(Debug, Default)]
struct OrderLine {
    sku: String,
    quantity: u32,
    note: Option<String>,
    audit: Vec<String>,
}

impl OrderLine {
    fn new(sku: &str, quantity: u32) -> Self {
        OrderLine {
            sku: sku.to_string(),
            quantity,
            ..OrderLine::default()
        }
    }
}

impl Reflect for OrderLine {
    fn describe() -> TypeInfo {
        TypeInfo::builder::<OrderLine>()
            .field("sku", |o| &o.sku, |o| &mut o.sku)
            .field("quantity", |o| &o.quantity, |o| &mut o.quantity)
            .nullable_field("note", |o| &o.note, |o| &mut o.note)
            .property("is_bulk", |o| o.quantity >= 100)
            .method("Identity", |m| {
                m.generic(["T"])
                    .param_generic(0)
                    .returns_generic(0)
                    .body(|_, call| call.take_any(0).map(Some))
            })
            .method("Foo", |m| {
                m.generic(["T"])
                    .param_generic(0)
                    .body(|_, _| Ok(Some(Box::new("first") as DynValue)))
            })
            .method("Foo", |m| {
                m.generic(["T"])
                    .param_generic(0)
                    .body(|_, _| Ok(Some(Box::new("second") as DynValue)))
            })
            .method("Record", |m| {
                m.generic(["T"])
                    .param_generic(0)
                    .body(|line: &mut OrderLine, call| {
                        let type_name = call.type_arg(0).map(|t| t.name()).unwrap_or_default();
                        line.audit.push(type_name);
                        Ok(None)
                    })
            })
            .method("Reject", |m| {
                m.generic(["T"]).body(|_, _| {
                    Err(Error::invocation(std::io::Error::other("rejected by body")))
                })
            })
            .method("Parse", |m| {
                m.generic(["T"])
                    .param::<String>()
                    .returns::<u32>()
                    .static_body(|call| {
                        let text = call.take::<String>(0)?;
                        let value = text.parse::<u32>().map_err(Error::invocation)?;
                        Ok(Some(Box::new(value) as DynValue))
                    })
            })
            .build()
    }
}

/// A second type that shares nothing with `OrderLine`
#[derive(Default)]
struct Customer {
    id: u64,
}

impl Reflect for Customer {
    fn describe() -> TypeInfo {
        TypeInfo::builder::<Customer>()
            .field("id", |c| &c.id, |c| &mut c.id)
            .build()
    }
}

fn i32_arg() -> [TypeHandle; 1] {
    [TypeHandle::of::<i32>()]
}

#[test]
fn test_projection_contains_public_members_in_order() -> Result<()> {
    let context = ReflectionContext::new();
    let line = OrderLine::new("A-1", 120);

    let mapping = context.to_string_mapping(&line)?;
    let entries: Vec<_> = mapping
        .iter()
        .map(|(k, v)| (k.as_str(), v.as_str()))
        .collect();

    assert_eq!(
        entries,
        [
            ("sku", "A-1"),
            ("quantity", "120"),
            ("note", ""),
            ("is_bulk", "true"),
        ]
    );
    Ok(())
}

#[test]
fn test_second_instance_hits_member_cache() -> Result<()> {
    let context = ReflectionContext::new();

    context.to_string_mapping(&OrderLine::new("A-1", 1))?;
    context.to_string_mapping(&OrderLine::new("B-2", 2))?;
    context.to_string_mapping(&Customer { id: 7 })?;

    let cache = context.member_cache();
    assert_eq!(cache.misses(), 2);
    assert_eq!(cache.hits(), 1);
    assert_eq!(cache.len(), 2);
    assert_eq!(context.registry().described(), 2);
    Ok(())
}

#[test]
fn test_projection_through_trait_object() -> Result<()> {
    let context = ReflectionContext::new();
    let objects: Vec<Box<dyn Reflected>> = vec![
        Box::new(OrderLine::new("C-3", 3)),
        Box::new(Customer { id: 42 }),
    ];

    let sets = objects
        .iter()
        .map(|object| context.to_string_set(&**object))
        .collect::<Result<Vec<_>>>()?;

    assert_eq!(sets[0].get("sku"), Some("C-3"));
    assert_eq!(
        sets[1].to_text(Some(&synergy::collections::default_text)),
        r#"{ "id":"42" }"#
    );
    Ok(())
}

#[test]
fn test_member_read_write_by_name() -> Result<()> {
    let context = ReflectionContext::new();
    let mut line = OrderLine::new("D-4", 4);

    context.set_member_value(&mut line, "note", Box::new(Some(String::from("fragile"))))?;
    context.set_member_value(&mut line, "quantity", Box::new(400_u32))?;
    assert_eq!(line.note.as_deref(), Some("fragile"));
    assert_eq!(line.quantity, 400);

    let bulk = context.get_member_value(&line, "is_bulk")?;
    assert_eq!(bulk.downcast_ref::<bool>(), Some(&true));

    let err = context
        .set_member_value(&mut line, "quantity", Box::new(400_i64))
        .unwrap_err();
    assert!(matches!(err, Error::TypeMismatch { .. }));

    let handle = TypeHandle::of::<OrderLine>();
    assert_eq!(context.member_type(&handle, "sku")?, TypeHandle::of::<String>());
    Ok(())
}

#[test]
fn test_descriptor_rejects_foreign_target() -> Result<()> {
    let context = ReflectionContext::new();
    let members = context.enumerate_members::<OrderLine>();
    let sku = &members[0];

    let customer = Customer { id: 1 };
    assert!(matches!(
        sku.get_value(&customer),
        Err(Error::InvalidTarget { .. })
    ));
    Ok(())
}

#[test]
fn test_single_generic_method_found_regardless_of_type_argument() -> Result<()> {
    let context = ReflectionContext::new();
    let handle = TypeHandle::of::<OrderLine>();
    context.registry().register::<OrderLine>();

    for type_arg in [
        TypeHandle::of::<i32>(),
        TypeHandle::of::<String>(),
        TypeHandle::of::<Customer>(),
    ] {
        let method = context.find_generic_method(
            &handle,
            "Identity",
            &[type_arg],
            None,
            BindingFlags::instance_all(),
        )?;
        assert_eq!(method.name(), "Identity");
    }
    Ok(())
}

#[test]
fn test_first_declared_overload_wins() -> Result<()> {
    let context = ReflectionContext::new();
    let mut line = OrderLine::default();

    let result = context
        .invoke_generic(&mut line, "Foo", &i32_arg(), vec![Box::new(1_i32) as DynValue])?
        .expect("Foo returns a value");
    assert_eq!(result.downcast_ref::<&str>(), Some(&"first"));

    let info = context.registry().info::<OrderLine>();
    let found = context.find_generic_method(
        &info.handle(),
        "Foo",
        &i32_arg(),
        None,
        BindingFlags::instance_all(),
    )?;
    let first = MethodQuery::new(&info).named("Foo").find_first().expect("declared");
    assert!(Arc::ptr_eq(&found, first));
    Ok(())
}

#[test]
fn test_strict_resolution_reports_ambiguity() {
    let context = ReflectionContext::with_config(ReflectionConfig::strict());
    let mut line = OrderLine::default();

    let err = context
        .invoke_generic(&mut line, "Foo", &i32_arg(), vec![Box::new(1_i32) as DynValue])
        .unwrap_err();
    assert!(matches!(
        err,
        Error::AmbiguousMethod { candidates: 2, .. }
    ));
}

#[test]
fn test_identity_returns_argument() -> Result<()> {
    let context = ReflectionContext::new();
    let mut line = OrderLine::default();

    let result = context
        .invoke_generic(
            &mut line,
            "Identity",
            &i32_arg(),
            vec![Box::new(42_i32) as DynValue],
        )?
        .expect("Identity returns its argument");
    assert_eq!(*result.downcast::<i32>().expect("an i32"), 42);
    Ok(())
}

#[test]
fn test_invocation_checks_arguments() {
    let context = ReflectionContext::new();
    let mut line = OrderLine::default();

    let wrong_type = context
        .invoke_generic(
            &mut line,
            "Identity",
            &i32_arg(),
            vec![Box::new("42") as DynValue],
        )
        .unwrap_err();
    assert!(matches!(wrong_type, Error::TypeMismatch { .. }));

    let wrong_count = context
        .invoke_generic(&mut line, "Identity", &i32_arg(), Vec::new())
        .unwrap_err();
    assert!(matches!(
        wrong_count,
        Error::ArgumentCount {
            expected: 1,
            actual: 0,
            ..
        }
    ));

    let wrong_arity = context
        .invoke_generic(
            &mut line,
            "Identity",
            &[TypeHandle::of::<i32>(), TypeHandle::of::<i32>()],
            vec![Box::new(42_i32) as DynValue],
        )
        .unwrap_err();
    assert!(matches!(wrong_arity, Error::MethodNotFound { arity: 2, .. }));
}

#[test]
fn test_body_mutates_target_and_sees_type_arguments() -> Result<()> {
    let context = ReflectionContext::new();
    let mut line = OrderLine::default();

    context.invoke_generic(
        &mut line,
        "Record",
        &[TypeHandle::of::<Vec<String>>()],
        vec![Box::new(Vec::<String>::new()) as DynValue],
    )?;
    assert_eq!(line.audit, ["Vec<String>"]);
    Ok(())
}

#[test]
fn test_body_errors_propagate_unchanged() {
    let context = ReflectionContext::new();
    let mut line = OrderLine::default();

    match context.invoke_generic(&mut line, "Reject", &i32_arg(), Vec::new()) {
        Err(Error::Invocation(inner)) => assert_eq!(inner.to_string(), "rejected by body"),
        other => panic!("unexpected: {other:?}"),
    }
}

#[test]
fn test_static_dispatch() -> Result<()> {
    let context = ReflectionContext::new();
    let line = OrderLine::default();
    let args = || vec![Box::new(String::from("17")) as DynValue];

    let by_instance = context
        .invoke_static_generic_of(&line, "Parse", &i32_arg(), args())?
        .expect("Parse returns a value");
    assert_eq!(by_instance.downcast_ref::<u32>(), Some(&17));

    let handle = TypeHandle::of::<OrderLine>();
    let by_handle = context
        .invoke_static_generic(&handle, "Parse", &i32_arg(), args())?
        .expect("Parse returns a value");
    assert_eq!(by_handle.downcast_ref::<u32>(), Some(&17));

    let method = context.find_static_generic_method(
        &handle,
        "Parse",
        &i32_arg(),
        Some(&[TypeHandle::of::<String>()]),
    )?;
    assert!(method.is_static());

    let bound = method.make_generic(&i32_arg())?;
    assert_eq!(bound.return_type(), Some(TypeHandle::of::<u32>()));
    assert!(matches!(
        bound.invoke_static(vec![Box::new(String::from("x")) as DynValue]),
        Err(Error::Invocation(_))
    ));
    Ok(())
}

#[test]
fn test_static_methods_are_not_instance_methods() {
    let context = ReflectionContext::new();
    let mut line = OrderLine::default();

    let err = context
        .invoke_generic(
            &mut line,
            "Parse",
            &i32_arg(),
            vec![Box::new(String::from("1")) as DynValue],
        )
        .unwrap_err();
    assert!(matches!(err, Error::MethodNotFound { .. }));
}

#[test]
fn test_type_erased_lookup_requires_registration() {
    let context = ReflectionContext::new();
    let handle = TypeHandle::of::<Customer>();

    assert!(matches!(
        context.invoke_static_generic(&handle, "Parse", &i32_arg(), Vec::new()),
        Err(Error::TypeNotRegistered(_))
    ));
}

#[test]
fn test_described_types_cannot_be_redescribed() -> Result<()> {
    let context = ReflectionContext::new();
    let customer = Customer { id: 9 };
    context.to_string_mapping(&customer)?;

    let replacement = TypeInfo::builder::<Customer>()
        .property("n", |_| true)
        .build();
    assert!(matches!(
        context.registry().register_info(replacement),
        Err(Error::TypeAlreadyRegistered(_))
    ));

    let keys: Vec<_> = context.to_string_mapping(&customer)?.into_keys().collect();
    assert_eq!(keys, ["id"]);
    assert!(matches!(
        context.get_member_value(&customer, "n"),
        Err(Error::MemberNotFound { .. })
    ));
    Ok(())
}
