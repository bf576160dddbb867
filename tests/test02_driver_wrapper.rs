use sql_pool_adapter::prelude::*;
use sql_pool_adapter::test_utils::{StubCall, StubDriver, StubPool};

#[tokio::test]
async fn wrapper_substitutes_the_driver() -> Result<(), PoolAdapterError> {
    let original = StubDriver::new();
    let original_log = original.log();
    let replacement = StubDriver::new();
    let replacement_log = replacement.log();
    let config = PoolConfig::builder().dbname("wrapped").finish();

    let _pool = PoolAdapter::connect_with(
        original,
        move |_original| async move { Ok(replacement) },
        config.clone(),
    )
    .await?;

    assert!(
        original_log.calls().is_empty(),
        "the substituted-away driver must never create a pool"
    );
    assert_eq!(replacement_log.calls(), vec![StubCall::CreatePool(config)]);
    Ok(())
}

#[tokio::test]
async fn wrapper_can_decorate_the_driver() -> Result<(), PoolAdapterError> {
    struct Decorated(StubDriver);

    impl PoolDriver for Decorated {
        type Pool = StubPool;

        fn create_pool(self, config: &PoolConfig) -> Result<Self::Pool, PoolAdapterError> {
            self.0.create_pool(config)
        }
    }

    let driver = StubDriver::new();
    let log = driver.log();
    let config = PoolConfig::builder().dbname("decorated").finish();

    let pool = PoolAdapter::connect_with(
        driver,
        |driver| async move { Ok(Decorated(driver)) },
        config.clone(),
    )
    .await?;

    assert_eq!(log.calls(), vec![StubCall::CreatePool(config)]);

    // The decorated driver's pool backs the adapter's forwarding.
    pool.query("SELECT 1", vec![]).await?;
    let queries = log.count_matching(|call| matches!(call, StubCall::Query { .. }));
    assert_eq!(queries, 1);
    Ok(())
}

#[tokio::test]
async fn identity_wrapper_behaves_like_plain_connect() -> Result<(), PoolAdapterError> {
    let driver = StubDriver::new();
    let log = driver.log();
    let config = PoolConfig::default();

    let _pool =
        PoolAdapter::connect_with(driver, |driver| async move { Ok(driver) }, config.clone())
            .await?;

    assert_eq!(log.calls(), vec![StubCall::CreatePool(config)]);
    Ok(())
}

#[tokio::test]
async fn failing_wrapper_rejects_construction_with_its_error() {
    let driver = StubDriver::new();
    let log = driver.log();

    let err = PoolAdapter::connect_with(
        driver,
        |_driver| async {
            Err::<StubDriver, _>(PoolAdapterError::Other("wrapper refused".to_string()))
        },
        PoolConfig::default(),
    )
    .await
    .expect_err("construction must reject when the wrapper fails");

    assert!(
        matches!(err, PoolAdapterError::Other(ref msg) if msg == "wrapper refused"),
        "the wrapper's error must pass through unchanged, got: {err}"
    );
    assert!(
        log.calls().is_empty(),
        "create_pool must not run when the wrapper fails"
    );
}
