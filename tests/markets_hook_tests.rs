// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

mod common;

use common::{market_json, test_client, Reply};
use market_client::hooks::MarketQuery;
use market_client::models::{CrowdLevel, TimeOfDay};
use serde_json::json;

#[tokio::test]
async fn test_covered_filter_issues_single_request() {
    let (client, transport, _) = test_client("/markets");
    transport.route(
        "/api/markets/covered",
        Reply::Json(200, json!([market_json(1, "Makola"), market_json(2, "Kaneshie")])),
    );

    let hook = client.markets_hook(MarketQuery::default().covered_only());
    let state = hook.settled().await;

    assert!(!state.loading);
    assert_eq!(state.error, None);
    let names: Vec<_> = hook.markets().into_iter().map(|m| m.name).collect();
    assert_eq!(names, vec!["Makola", "Kaneshie"]);

    let requests = transport.requests();
    assert_eq!(requests.len(), 1);
    assert_eq!(requests[0].path, "/api/markets/covered");
    assert!(requests[0].query.is_empty());
}

#[tokio::test]
async fn test_name_search_wins_over_location() {
    let (client, transport, _) = test_client("/markets");
    transport.route("/api/markets/search", Reply::Json(200, json!([market_json(1, "Makola")])));

    let query = MarketQuery::default().with_name("Makola").near(5.55, -0.21);
    let hook = client.markets_hook(query);
    hook.settled().await;

    let requests = transport.requests();
    assert_eq!(requests.len(), 1);
    assert_eq!(requests[0].path_and_query(), "/api/markets/search?name=Makola");
    assert!(transport.requests_to("/api/markets/nearby").is_empty());
}

#[tokio::test]
async fn test_nearby_uses_default_radius() {
    let (client, transport, _) = test_client("/markets");
    transport.route("/api/markets/nearby", Reply::Json(200, json!([])));

    let hook = client.markets_hook(MarketQuery::default().near(5.5, -0.25));
    let state = hook.settled().await;

    assert_eq!(state.data, Some(vec![]));
    let requests = transport.requests_to("/api/markets/nearby");
    assert_eq!(
        requests[0].path_and_query(),
        "/api/markets/nearby?latitude=5.5&longitude=-0.25&radius=10"
    );
}

#[tokio::test]
async fn test_no_filters_lists_all() {
    let (client, transport, _) = test_client("/");
    transport.route("/api/markets", Reply::Json(200, json!([market_json(3, "Agbogbloshie")])));

    let hook = client.markets_hook(MarketQuery::default());
    hook.settled().await;

    assert_eq!(hook.markets().len(), 1);
    assert_eq!(transport.requests()[0].path, "/api/markets");
}

#[tokio::test]
async fn test_failure_records_error_message() {
    let (client, transport, _) = test_client("/markets");
    transport.route(
        "/api/markets",
        Reply::Json(500, json!({"message": "Database unavailable"})),
    );

    let hook = client.markets_hook(MarketQuery::default());
    let state = hook.settled().await;

    assert!(!state.loading);
    assert_eq!(state.error.as_deref(), Some("Database unavailable"));
    assert!(hook.markets().is_empty());
}

#[tokio::test]
async fn test_refetch_after_failure_clears_error() {
    let (client, transport, _) = test_client("/markets");
    transport.set_offline(true);

    let hook = client.markets_hook(MarketQuery::default());
    let state = hook.settled().await;
    assert!(state.error.is_some());

    transport.set_offline(false);
    transport.route("/api/markets", Reply::Json(200, json!([market_json(1, "Makola")])));
    let gate = transport.hold();
    let mut rx = hook.subscribe();
    let refetch = hook.refetch();
    tokio::pin!(refetch);

    // While the response is held, the published state carries no error.
    tokio::select! {
        _ = &mut refetch => panic!("refetch finished while its response was held"),
        changed = rx.changed() => {
            changed.unwrap();
            let seen = rx.borrow().clone();
            assert!(seen.loading);
            assert_eq!(seen.error, None);
        }
    }
    gate.add_permits(1);
    refetch.await.unwrap();

    let state = hook.state();
    assert_eq!(state.error, None);
    assert_eq!(state.data.unwrap().len(), 1);
}

#[tokio::test]
async fn test_same_query_does_not_refetch() {
    let (client, transport, _) = test_client("/markets");
    transport.route("/api/markets/covered", Reply::Json(200, json!([])));
    transport.route("/api/markets/high-rated", Reply::Json(200, json!([market_json(4, "Osu")])));

    let hook = client.markets_hook(MarketQuery::default().covered_only());
    hook.settled().await;

    assert!(hook
        .set_query(MarketQuery::default().covered_only())
        .is_none());
    assert_eq!(transport.requests().len(), 1);

    let handle = hook
        .set_query(MarketQuery::default().with_min_rating(4.5))
        .expect("changed query refetches");
    handle.await.unwrap();

    assert_eq!(hook.markets()[0].name, "Osu");
    let requests = transport.requests_to("/api/markets/high-rated");
    assert_eq!(
        requests[0].path_and_query(),
        "/api/markets/high-rated?minRating=4.5"
    );
}

#[tokio::test]
async fn test_crowd_level_action_replaces_list() {
    let (client, transport, _) = test_client("/markets");
    transport.route("/api/markets", Reply::Json(200, json!([market_json(1, "Makola")])));
    transport.route(
        "/api/markets/crowd-level",
        Reply::Json(200, json!([market_json(2, "Kaneshie"), market_json(3, "Osu")])),
    );

    let hook = client.markets_hook(MarketQuery::default());
    hook.settled().await;
    hook.by_crowd_level(TimeOfDay::Evening, CrowdLevel::Low)
        .await
        .unwrap();

    let state = hook.state();
    assert!(!state.loading);
    assert_eq!(state.data.unwrap().len(), 2);
}

#[tokio::test]
async fn test_market_detail_follows_id() {
    let (client, transport, _) = test_client("/markets/1");
    transport.route("/api/markets/1", Reply::Json(200, market_json(1, "Makola")));
    transport.route("/api/markets/2", Reply::Json(200, market_json(2, "Kaneshie")));

    let detail = client.market_detail(1);
    let state = detail.settled().await;
    let market = state.data.unwrap();
    assert_eq!(market.name, "Makola");
    assert!(market.covered());
    assert_eq!(market.crowd_level_at(8), CrowdLevel::High);
    assert_eq!(market.crowd_level_at(20), CrowdLevel::Low);

    detail.set_market_id(2).unwrap().await.unwrap();
    assert_eq!(detail.market().unwrap().name, "Kaneshie");
}
