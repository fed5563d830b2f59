use inline_activity::{ActivityError, ActivityOptionsBuilder, BoundActivity, Callable, OutputRef};
use serde_json::{json, Value};
use test_utils::MemoryContext;

#[rstest]
#[case::integer(json!(42))]
#[case::boolean(json!(true))]
#[case::null(Value::Null)]
#[case::string(json!("hello"))]
#[tokio::test]
async fn bound_value_lands_in_slot(#[case] value: Value) {
    let v = value.clone();
    let act: BoundActivity<MemoryContext, Value> = BoundActivity::from_callable(
        Callable::returning(move || {
            let v = v.clone();
            async move { Ok::<_, anyhow::Error>(v) }
        }),
        Some("result".into()),
    );
    let ctx = MemoryContext::new();
    act.execute(&ctx).await.unwrap();
    assert_eq!(ctx.get("result"), Some(value));
    assert_eq!(ctx.set_count(), 1);
}

#[tokio::test]
async fn typed_literals_bind() {
    let ctx = MemoryContext::new();
    BoundActivity::<MemoryContext, i32>::from_callable(
        Callable::returning_sync(|| Ok::<_, anyhow::Error>(42)),
        Some("int".into()),
    )
    .execute(&ctx)
    .await
    .unwrap();
    BoundActivity::<MemoryContext, bool>::from_callable(
        Callable::returning_sync(|| Ok::<_, anyhow::Error>(true)),
        Some("bool".into()),
    )
    .execute(&ctx)
    .await
    .unwrap();
    BoundActivity::<MemoryContext, Option<String>>::from_callable(
        Callable::returning_sync(|| Ok::<_, anyhow::Error>(None)),
        Some("none".into()),
    )
    .execute(&ctx)
    .await
    .unwrap();

    assert_eq!(ctx.get_as::<i32>("int"), 42);
    assert!(ctx.get_as::<bool>("bool"));
    assert_eq!(ctx.get_as::<Option<String>>("none"), None);
    assert_eq!(ctx.writes(), vec!["int".into(), "bool".into(), OutputRef::from("none")]);
}

#[tokio::test]
async fn rebinding_overwrites_previous_value() {
    let act: BoundActivity<MemoryContext, u32> = BoundActivity::from_callable(
        Callable::returning_with_context_sync(|ctx: MemoryContext| {
            let seen = ctx.get("counter").map_or(0, |v| v.as_u64().unwrap() as u32);
            Ok::<_, anyhow::Error>(seen + 1)
        }),
        Some("counter".into()),
    );
    let ctx = MemoryContext::new();
    act.execute(&ctx).await.unwrap();
    act.execute(&ctx).await.unwrap();
    act.execute(&ctx).await.unwrap();
    assert_eq!(ctx.get_as::<u32>("counter"), 3);
    assert_eq!(ctx.set_count(), 3);
}

#[tokio::test]
async fn unbound_result_writes_nothing() {
    let act: BoundActivity<MemoryContext, u32> =
        Callable::returning(|| async { Ok::<_, anyhow::Error>(1) }).into();
    let ctx = MemoryContext::new();
    act.execute(&ctx).await.unwrap();
    assert_eq!(ctx.set_count(), 0);
}

#[tokio::test]
async fn side_effect_with_output_writes_nothing() {
    let act = BoundActivity::with_options(
        Callable::with_context_sync(|ctx: MemoryContext| {
            ctx.insert("side", json!("effect"));
            Ok::<_, anyhow::Error>(())
        }),
        ActivityOptionsBuilder::default()
            .name("log_it")
            .output("should_not_exist")
            .build()
            .unwrap(),
    );
    assert_eq!(act.name(), "log_it");
    assert_eq!(act.output(), None);

    let ctx = MemoryContext::new();
    act.execute(&ctx).await.unwrap();
    assert_eq!(ctx.set_count(), 0);
    assert_eq!(ctx.get("should_not_exist"), None);
    assert_eq!(ctx.get("side"), Some(json!("effect")));
}

#[derive(thiserror::Error, Debug)]
#[error("upstream unavailable: {0}")]
struct Upstream(&'static str);

#[tokio::test]
async fn failure_propagates_without_binding() {
    let act: BoundActivity<MemoryContext, u32> = BoundActivity::from_callable(
        Callable::returning(|| async { Err::<u32, _>(Upstream("billing")) }),
        Some("out".into()),
    );
    let ctx = MemoryContext::new();
    let err = act.execute(&ctx).await.unwrap_err();
    assert_eq!(err.to_string(), "upstream unavailable: billing");
    let inner = err.into_execution_error().unwrap();
    assert_eq!(inner.downcast_ref::<Upstream>().unwrap().0, "billing");
    assert_eq!(ctx.set_count(), 0);
    assert_eq!(ctx.get("out"), None);
}

#[tokio::test]
async fn refused_write_is_a_binding_failure() {
    let act: BoundActivity<MemoryContext, &str> = BoundActivity::from_callable(
        Callable::returning_with_context_sync(|ctx: MemoryContext| {
            ctx.insert("audit", json!("charged"));
            Ok::<_, anyhow::Error>("receipt")
        }),
        Some("locked".into()),
    );
    let ctx = MemoryContext::with_read_only(["locked"]);
    let err = act.execute(&ctx).await.unwrap_err();
    assert!(err.is_binding_failure());
    assert_matches!(&err, ActivityError::Binding { output, .. } if output.as_str() == "locked");
    // The body ran to completion even though its result was not recorded
    assert_eq!(ctx.get("audit"), Some(json!("charged")));
    assert_eq!(ctx.get("locked"), None);
    assert_eq!(ctx.set_count(), 1);
}

#[tokio::test]
async fn context_judges_slot_names() {
    let act: BoundActivity<MemoryContext, u32> = BoundActivity::from_callable(
        Callable::returning_sync(|| Ok::<_, anyhow::Error>(7)),
        Some("".into()),
    );
    let refusing = MemoryContext::with_read_only([""]);
    let err = act.execute(&refusing).await.unwrap_err();
    assert_matches!(err, ActivityError::Binding { output, .. } if output.as_str().is_empty());
    assert_eq!(refusing.set_count(), 1);

    let accepting = MemoryContext::new();
    act.execute(&accepting).await.unwrap();
    assert_eq!(accepting.get_as::<u32>(""), 7);
}
