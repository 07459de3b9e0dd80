use approx::assert_abs_diff_eq;
use cooling_rank::{
    model::{
        store::{MemoryStore, RankStore},
        structures::{rank_context::RankContext, rank_trigger::RankTrigger},
        RankConfig, ScoreRule, TimeRule
    },
    utils::test_utils::{at, updater_at}
};
use std::sync::Arc;

use crate::common::init_test_env;

/// Creates record 1 at `seconds` with the given config.
fn create_record(store: &MemoryStore, config: &RankConfig, seconds: i64, boost: Option<f64>) {
    let state = updater_at(config.clone(), seconds).initialize_on_create(Some(1));
    store.insert_with_boost(1, state, boost).unwrap();
}

#[tokio::test]
async fn test_create_then_heat_after_ninety_minutes() {
    init_test_env();
    let config = RankConfig::new(1000.0, 0.0, 150.0);
    let store = MemoryStore::new();

    create_record(&store, &config, 0, None);
    let created = store.get(1).unwrap().unwrap();
    assert_eq!(created.score, 1000.0);
    assert_eq!(created.recorded_at, at(0));

    let heated = updater_at(config, 5400).heat(&store, 1, 10.0).await.unwrap();

    assert_abs_diff_eq!(heated.score, 1000.0 * (-1.0f64 / 150.0).exp() + 10.0);
    assert_abs_diff_eq!(heated.score, 1003.356, epsilon = 0.001);
    assert_eq!(heated.recorded_at, at(5400));
    assert_eq!(store.get(1).unwrap(), Some(heated));
}

#[tokio::test]
async fn test_heat_twice_within_an_hour_does_not_decay() {
    init_test_env();
    let config = RankConfig::new(1000.0, 0.0, 150.0);
    let store = MemoryStore::new();

    create_record(&store, &config, 0, None);
    updater_at(config.clone(), 10).heat(&store, 1, 5.0).await.unwrap();
    let second = updater_at(config, 20).heat(&store, 1, 5.0).await.unwrap();

    assert_eq!(second.score, 1010.0);
    assert_eq!(second.recorded_at, at(20));
}

#[tokio::test]
async fn test_heat_after_thirty_hours() {
    init_test_env();
    let config = RankConfig::default();
    let store = MemoryStore::new();

    create_record(&store, &config, 0, None);
    let heated = updater_at(config, 30 * 3600).heat(&store, 1, 0.0).await.unwrap();

    assert_abs_diff_eq!(heated.score, 818.73, epsilon = 0.01);
}

#[tokio::test]
async fn test_heat_uncreated_record_fails() {
    init_test_env();
    let store = MemoryStore::new();
    let updater = updater_at(RankConfig::default(), 0);

    for increment in [0.0, 1.0, 250.0, -10.0] {
        let result = updater.heat(&store, 1, increment).await;

        assert!(result.unwrap_err().is_invalid_operation());
    }

    assert!(updater.boost(&store, 1, None).await.unwrap_err().is_invalid_operation());
    assert!(store.is_empty().unwrap());
}

#[tokio::test]
async fn test_boost_uses_record_boost_value() {
    init_test_env();
    let config = RankConfig::new(1000.0, 3.0, 150.0);

    let boosted_store = MemoryStore::new();
    create_record(&boosted_store, &config, 0, Some(25.0));
    let heated_store = MemoryStore::new();
    create_record(&heated_store, &config, 0, Some(25.0));

    let updater = updater_at(config, 7200);
    let boosted = updater.boost(&boosted_store, 1, None).await.unwrap();
    let heated = updater.heat(&heated_store, 1, 25.0).await.unwrap();

    assert_eq!(boosted, heated);
}

#[tokio::test]
async fn test_boost_falls_back_to_default_boost() {
    init_test_env();
    let config = RankConfig::new(1000.0, 3.0, 150.0);

    let boosted_store = MemoryStore::new();
    create_record(&boosted_store, &config, 0, None);
    let heated_store = MemoryStore::new();
    create_record(&heated_store, &config, 0, None);

    let updater = updater_at(config, 7200);
    let boosted = updater.boost(&boosted_store, 1, None).await.unwrap();
    let heated = updater.heat(&heated_store, 1, 3.0).await.unwrap();

    assert_eq!(boosted, heated);
}

#[tokio::test]
async fn test_boost_with_explicit_increment_ignores_record_boost() {
    init_test_env();
    let config = RankConfig::new(1000.0, 3.0, 150.0);
    let store = MemoryStore::new();
    create_record(&store, &config, 0, Some(25.0));

    let boosted = updater_at(config, 0).boost(&store, 1, Some(1.0)).await.unwrap();

    assert_eq!(boosted.score, 1001.0);
}

#[tokio::test]
async fn test_constant_score_rule_ignores_increment() {
    init_test_env();
    let config = RankConfig::default().with_score_rule(ScoreRule::Constant(50.0));
    let store = MemoryStore::new();

    create_record(&store, &config, 0, None);
    assert_eq!(store.get(1).unwrap().unwrap().score, 50.0);

    let heated = updater_at(config, 3600 * 10).heat(&store, 1, 999.0).await.unwrap();
    assert_eq!(heated.score, 50.0);
}

#[tokio::test]
async fn test_computed_rules_receive_context() {
    init_test_env();
    let config = RankConfig::default()
        .with_score_rule(ScoreRule::computed(|up, ctx| match ctx.trigger {
            RankTrigger::Create => up,
            _ => up * 100.0
        }))
        .with_time_rule(TimeRule::computed(|ctx| ctx.now + chrono::Duration::seconds(1)));
    let store = MemoryStore::new();

    create_record(&store, &config, 0, Some(2.0));
    assert_eq!(store.get(1).unwrap().unwrap().recorded_at, at(1));

    let boosted = updater_at(config, 60).boost(&store, 1, None).await.unwrap();

    assert_eq!(boosted.score, 200.0);
    assert_eq!(boosted.recorded_at, at(61));
}

#[tokio::test]
async fn test_concurrent_heats_of_same_record_last_write_wins() {
    init_test_env();
    let config = RankConfig::default();
    let store = MemoryStore::new();
    create_record(&store, &config, 0, None);

    let updater = updater_at(config, 0);
    let ctx = RankContext {
        record_id: Some(1),
        trigger: RankTrigger::Heat,
        now: at(0)
    };

    // Both writers read the same state before either writes
    let current = store.read_rank(1).await.unwrap();
    let first = updater.next_heat(current, 5.0, &ctx).unwrap();
    let second = updater.next_heat(current, 7.0, &ctx).unwrap();

    store.write_rank(1, first).await.unwrap();
    store.write_rank(1, second).await.unwrap();

    assert_eq!(store.get(1).unwrap().unwrap().score, 1007.0);
}

#[tokio::test]
async fn test_shared_updater_across_tasks() {
    init_test_env();
    let config = RankConfig::default();
    let store = Arc::new(MemoryStore::new());
    let updater = Arc::new(updater_at(config, 0));

    for id in 0..8 {
        store.insert(id, updater.initialize_on_create(Some(id))).unwrap();
    }

    let handles = (0..8)
        .map(|id| {
            let store = Arc::clone(&store);
            let updater = Arc::clone(&updater);
            tokio::spawn(async move { updater.heat(store.as_ref(), id, id as f64).await })
        })
        .collect::<Vec<_>>();

    for handle in handles {
        handle.await.unwrap().unwrap();
    }

    for id in 0..8 {
        assert_eq!(store.get(id).unwrap().unwrap().score, 1000.0 + id as f64);
    }
}
