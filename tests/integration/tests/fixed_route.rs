//! Integration test: route building over a refreshed gossip cache.
//!
//! Drives `GossipCache` and `RouteBuilder` together through the same seams
//! the node uses, with in-memory gossip and path finding.

use std::sync::Arc;

use fixroute_core::{OnionStyle, RouteConfig};
use fixroute_integration_tests::{
    channel, hop, legacy_node, node, tlv_node, PathTable, SwappableGossip,
};
use fixroute_routing::{GossipCache, PathRequest, RouteBuilder, RoutingError};

async fn setup(
    gossip: Arc<SwappableGossip>,
    paths: Arc<PathTable>,
) -> (Arc<GossipCache>, RouteBuilder) {
    let cache = Arc::new(GossipCache::new(gossip));
    cache.refresh().await.expect("initial refresh");
    let builder = RouteBuilder::new(Arc::clone(&cache), paths, RouteConfig::default());
    (cache, builder)
}

// =========================================================================
// Fully cached waypoints
// =========================================================================

#[tokio::test]
async fn test_direct_channels_only() {
    let (a, b, c) = (node(0xa1), node(0xb1), node(0xc1));
    let gossip = Arc::new(SwappableGossip::new(
        vec![
            channel(a, b, "100x1x0", 1, 1000, 10),
            channel(b, c, "200x1x0", 2, 2000, 20),
        ],
        vec![tlv_node(b), legacy_node(c)],
    ));
    let paths = Arc::new(PathTable::default());
    let (_cache, builder) = setup(gossip, Arc::clone(&paths)).await;

    let route = builder.build(1000, &[a, b, c]).await.expect("route");

    assert!(paths.requests().is_empty());
    assert_eq!(route.hop_count(), 2);
    assert_eq!(route.sent_msat(), 1004);
    assert_eq!(route.delivered_msat(), 1000);
    assert_eq!(route.total_fees_msat(), 4);
    assert_eq!(route.total_delay(), 29);

    let json = serde_json::to_value(&route).expect("serialize route");
    assert_eq!(
        json,
        serde_json::json!([
            {
                "id": b.to_string(),
                "channel": "100x1x0",
                "direction": 0,
                "msatoshi": 1004,
                "amount_msat": "1004msat",
                "delay": 29,
                "style": "tlv"
            },
            {
                "id": c.to_string(),
                "channel": "200x1x0",
                "direction": 0,
                "msatoshi": 1000,
                "amount_msat": "1000msat",
                "delay": 9,
                "style": "legacy"
            }
        ])
    );
}

// =========================================================================
// Gaps filled by the path finder
// =========================================================================

#[tokio::test]
async fn test_mixed_direct_and_filled_legs() {
    let (a, b, c, d, x) = (node(0xa1), node(0xb1), node(0xc1), node(0xd1), node(0xe1));
    let gossip = Arc::new(SwappableGossip::new(
        vec![
            channel(a, b, "100x1x0", 1, 1000, 10),
            channel(b, x, "300x1x0", 1, 1000, 10),
            channel(c, d, "500x1x0", 3, 500, 15),
        ],
        vec![tlv_node(b), tlv_node(c), legacy_node(d)],
    ));
    // B has no channel to C; the path finder goes through X.
    let paths = Arc::new(PathTable::default().with_path(
        b,
        c,
        vec![hop(x, "300x1x0", 2008, 36), hop(c, "600x1x0", 2004, 24)],
    ));
    let (_cache, builder) = setup(gossip, Arc::clone(&paths)).await;

    let route = builder.build(2000, &[a, b, c, d]).await.expect("route");

    // C charges 3 + floor(2000 * 500 / 1e6) = 4 for C -> D.
    assert_eq!(
        paths.requests(),
        vec![PathRequest {
            destination: c,
            amount_msat: 2004,
            risk_factor: 1,
            final_cltv: 24,
            from: b,
        }]
    );

    let summary: Vec<_> = route
        .hops()
        .iter()
        .map(|h| (h.id, h.amount_msat, h.delay))
        .collect();
    // B charges 1 + floor(2008 * 1000 / 1e6) = 3 for B -> X.
    assert_eq!(
        summary,
        vec![(b, 2011, 46), (x, 2008, 36), (c, 2004, 24), (d, 2000, 9)]
    );
    assert_eq!(route.hops()[3].style, OnionStyle::Legacy);
    assert_eq!(route.total_fees_msat(), 11);

    for pair in route.hops().windows(2) {
        assert!(pair[0].amount_msat >= pair[1].amount_msat);
        assert!(pair[0].delay > pair[1].delay);
    }
}

#[tokio::test]
async fn test_path_finder_refusal_aborts_build() {
    let (a, b, c) = (node(0xa1), node(0xb1), node(0xc1));
    let gossip = Arc::new(SwappableGossip::new(
        vec![channel(a, b, "100x1x0", 1, 1000, 10)],
        vec![tlv_node(b), tlv_node(c)],
    ));
    let (_cache, builder) = setup(gossip, Arc::new(PathTable::default())).await;

    let err = builder.build(1000, &[a, b, c]).await.unwrap_err();
    match err {
        RoutingError::Oracle { from, to, .. } => {
            assert_eq!(from, b);
            assert_eq!(to, c);
        }
        other => panic!("unexpected error: {other}"),
    }
}

// =========================================================================
// Purge / refresh
// =========================================================================

#[tokio::test]
async fn test_purge_with_empty_channel_list() {
    let (a, b, c) = (node(0xa1), node(0xb1), node(0xc1));
    let gossip = Arc::new(SwappableGossip::new(
        vec![
            channel(a, b, "100x1x0", 1, 1000, 10),
            channel(b, c, "200x1x0", 2, 2000, 20),
        ],
        vec![tlv_node(b), tlv_node(c)],
    ));
    let paths = Arc::new(PathTable::default().with_path(b, c, vec![hop(c, "200x1x0", 1000, 9)]));
    let (cache, builder) = setup(Arc::clone(&gossip), Arc::clone(&paths)).await;
    assert!(builder.build(1000, &[a, b, c]).await.is_ok());

    gossip.set_channels(Vec::new());
    let stats = cache.refresh().await.expect("purge");
    assert_eq!(stats.channels, 0);
    assert_eq!(stats.nodes, 2);
    assert!(cache.lookup_channel(&a, &b).is_none());

    // The last leg now goes to the path finder, and the source channel
    // needed to price it is gone too.
    let err = builder.build(1000, &[a, b, c]).await.unwrap_err();
    assert!(matches!(err, RoutingError::MissingChannel { .. }));
    assert_eq!(paths.requests().len(), 1);
    assert_eq!(paths.requests()[0].from, b);
    assert_eq!(paths.requests()[0].destination, c);
}

#[tokio::test]
async fn test_failed_refresh_keeps_serving_previous_cache() {
    let (a, b) = (node(0xa1), node(0xb1));
    let gossip = Arc::new(SwappableGossip::new(
        vec![channel(a, b, "100x1x0", 1, 1000, 10)],
        vec![tlv_node(b)],
    ));
    let (cache, builder) = setup(Arc::clone(&gossip), Arc::new(PathTable::default())).await;
    let before = cache.stats();

    gossip.set_failing(true);
    let err = cache.refresh().await.unwrap_err();
    assert!(matches!(err, RoutingError::Refresh(_)));
    assert_eq!(cache.stats(), before);

    let route = builder.build(5000, &[a, b]).await.expect("route from old cache");
    assert_eq!(route.hop_count(), 1);
    assert_eq!(route.sent_msat(), 5000);
}

#[tokio::test]
async fn test_builds_run_alongside_refresh() {
    let (a, b, c) = (node(0xa1), node(0xb1), node(0xc1));
    let gossip = Arc::new(SwappableGossip::new(
        vec![
            channel(a, b, "100x1x0", 1, 1000, 10),
            channel(b, c, "200x1x0", 2, 2000, 20),
        ],
        vec![tlv_node(b), tlv_node(c)],
    ));
    let (cache, builder) = setup(gossip, Arc::new(PathTable::default())).await;
    let builder = Arc::new(builder);

    let mut tasks = Vec::new();
    for amount in 1..=16u64 {
        let builder = Arc::clone(&builder);
        tasks.push(tokio::spawn(async move {
            builder.build(amount * 1000, &[a, b, c]).await
        }));
    }
    let cache_for_refresh = Arc::clone(&cache);
    let refresh = tokio::spawn(async move { cache_for_refresh.refresh().await });

    for task in tasks {
        let route = task.await.expect("join").expect("route");
        assert_eq!(route.hop_count(), 2);
    }
    refresh.await.expect("join").expect("refresh");
}
