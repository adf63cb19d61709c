//! End-to-end resolution and click-accounting properties, exercised against
//! in-memory repositories and the real in-process cache.

mod common;

use linkly::application::services::ResolutionPolicy;
use linkly::infrastructure::cache::CacheService;
use std::collections::HashSet;

fn policy(flush_interval: u64) -> ResolutionPolicy {
    ResolutionPolicy {
        flush_interval,
        ..ResolutionPolicy::default()
    }
}

#[tokio::test]
async fn test_created_link_resolves_to_exact_url() {
    let ctx = common::default_test_state();

    let link = ctx
        .state
        .link_service
        .create_link("https://example.com/x?q=1", 1)
        .await
        .unwrap();

    // First call: served from the pre-warmed cache.
    let url = ctx
        .state
        .link_service
        .resolve_and_record_click(&link.short_key)
        .await
        .unwrap();
    assert_eq!(url, "https://example.com/x?q=1");

    // After forced eviction: served via store fallback.
    ctx.cache.invalidate(&link.short_key).await.unwrap();
    let url = ctx
        .state
        .link_service
        .resolve_and_record_click(&link.short_key)
        .await
        .unwrap();
    assert_eq!(url, "https://example.com/x?q=1");
}

#[tokio::test]
async fn test_resolve_unknown_key_is_not_found() {
    let ctx = common::default_test_state();

    let resolve = ctx
        .state
        .link_service
        .resolve_and_record_click("doesnotexist")
        .await;
    assert!(matches!(
        resolve.unwrap_err(),
        linkly::AppError::NotFound { .. }
    ));

    let stats = ctx.state.stats_service.get_stats("doesnotexist").await;
    assert!(matches!(
        stats.unwrap_err(),
        linkly::AppError::NotFound { .. }
    ));
}

#[tokio::test]
async fn test_generated_keys_are_unique_across_creations() {
    let ctx = common::default_test_state();

    let mut keys = HashSet::new();
    for i in 0..1000 {
        let link = ctx
            .state
            .link_service
            .create_link(&format!("https://example.com/page/{}", i), 1)
            .await
            .unwrap();

        assert_eq!(link.short_key.len(), 8);
        assert!(
            link.short_key
                .chars()
                .all(|c| c.is_alphanumeric() || c == '-' || c == '_')
        );
        keys.insert(link.short_key);
    }

    assert_eq!(keys.len(), 1000);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 8)]
async fn test_concurrent_clicks_are_all_counted() {
    let ctx = common::default_test_state();

    let link = ctx
        .state
        .link_service
        .create_link("https://example.com/hot", 1)
        .await
        .unwrap();
    let short_key = link.short_key.clone();

    let mut handles = Vec::new();
    for _ in 0..50 {
        let service = ctx.state.link_service.clone();
        let key = short_key.clone();
        handles.push(tokio::spawn(async move {
            service.resolve_and_record_click(&key).await.unwrap();
        }));
    }
    for handle in handles {
        handle.await.unwrap();
    }

    assert_eq!(ctx.cache.get_clicks(&short_key).await.unwrap(), 50);

    let stats = ctx.state.stats_service.get_stats(&short_key).await.unwrap();
    assert_eq!(stats.clicks, 50);
}

#[tokio::test]
async fn test_checkpoint_written_at_flush_interval() {
    let ctx = common::create_test_state(policy(10));

    let link = ctx
        .state
        .link_service
        .create_link("https://example.com", 1)
        .await
        .unwrap();

    for _ in 0..9 {
        ctx.state
            .link_service
            .resolve_and_record_click(&link.short_key)
            .await
            .unwrap();
    }

    // Pre-checkpoint: the store still carries zero while the merged view
    // already reports all nine clicks.
    assert_eq!(ctx.links.durable_click_count(&link.short_key), Some(0));
    let stats = ctx
        .state
        .stats_service
        .get_stats(&link.short_key)
        .await
        .unwrap();
    assert_eq!(stats.clicks, 9);

    // The tenth click triggers the durable checkpoint.
    ctx.state
        .link_service
        .resolve_and_record_click(&link.short_key)
        .await
        .unwrap();

    common::wait_for_durable_count(&ctx.links, &link.short_key, 10).await;
}

#[tokio::test]
async fn test_end_to_end_seed_from_durable_count() {
    let ctx = common::create_test_state(policy(5));

    let link = ctx
        .state
        .link_service
        .create_link("https://example.com/x", 1)
        .await
        .unwrap();

    for _ in 0..5 {
        ctx.state
            .link_service
            .resolve_and_record_click(&link.short_key)
            .await
            .unwrap();
    }

    let stats = ctx
        .state
        .stats_service
        .get_stats(&link.short_key)
        .await
        .unwrap();
    assert_eq!(stats.clicks, 5);

    // The fifth click checkpointed the durable count.
    common::wait_for_durable_count(&ctx.links, &link.short_key, 5).await;

    // Forcibly expire the cache entry and counter.
    ctx.cache.invalidate(&link.short_key).await.unwrap();

    // The next redirect reseeds the counter from the durable count, so no
    // history is lost.
    ctx.state
        .link_service
        .resolve_and_record_click(&link.short_key)
        .await
        .unwrap();

    let stats = ctx
        .state
        .stats_service
        .get_stats(&link.short_key)
        .await
        .unwrap();
    assert_eq!(stats.clicks, 6);
}

#[tokio::test]
async fn test_counter_expiry_loss_is_bounded_by_flush_interval() {
    let flush_interval: u64 = 10;
    let ctx = common::create_test_state(policy(flush_interval));

    let link = ctx
        .state
        .link_service
        .create_link("https://example.com/lossy", 1)
        .await
        .unwrap();

    // Eight un-checkpointed clicks, then the counter expires.
    let clicks_before_expiry: u64 = 8;
    for _ in 0..clicks_before_expiry {
        ctx.state
            .link_service
            .resolve_and_record_click(&link.short_key)
            .await
            .unwrap();
    }
    assert_eq!(ctx.links.durable_click_count(&link.short_key), Some(0));

    ctx.cache.invalidate(&link.short_key).await.unwrap();

    ctx.state
        .link_service
        .resolve_and_record_click(&link.short_key)
        .await
        .unwrap();

    let stats = ctx
        .state
        .stats_service
        .get_stats(&link.short_key)
        .await
        .unwrap();

    // The accepted-risk bound: at most flush_interval - 1 clicks can be
    // lost, never more. Exact equality is not guaranteed after an expiry.
    let total_clicks = clicks_before_expiry + 1;
    let lost = total_clicks - stats.clicks;
    assert!(
        lost <= flush_interval - 1,
        "lost {} clicks, bound is {}",
        lost,
        flush_interval - 1
    );

    // No checkpoint fired, so the durable count is still untouched.
    assert_eq!(ctx.links.durable_click_count(&link.short_key), Some(0));
}

#[tokio::test]
async fn test_reseed_never_overwrites_live_counter() {
    let ctx = common::default_test_state();

    // A link whose durable count is already 40.
    ctx.links
        .put_link("seeded01", "https://example.com/", 1, 40);

    // First resolve: miss, seeds 40, counts one click.
    ctx.state
        .link_service
        .resolve_and_record_click("seeded01")
        .await
        .unwrap();
    assert_eq!(ctx.cache.get_clicks("seeded01").await.unwrap(), 41);

    // Evict only the URL entry; the counter stays live.
    ctx.cache
        .set_url("seeded01", "https://example.com/", Some(0))
        .await
        .unwrap();

    // The next miss must not reseed the live counter back to 40.
    ctx.state
        .link_service
        .resolve_and_record_click("seeded01")
        .await
        .unwrap();
    assert_eq!(ctx.cache.get_clicks("seeded01").await.unwrap(), 42);
}
