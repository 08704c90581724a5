// tests/providers_strapi.rs
//
// StrapiClient against a local httpmock server: query contract, status
// mapping, malformed bodies and timeouts.

use std::time::Duration;

use httpmock::prelude::*;
use serde_json::json;

use pattaya_feed::feed::providers::strapi::StrapiClient;
use pattaya_feed::feed::upstream::{ContentApi, UpstreamRequest};
use pattaya_feed::feed::{fetch_pinned, fetch_sponsored};
use pattaya_feed::FetchError;

#[tokio::test]
async fn pinned_request_sends_filter_and_sort() {
    let server = MockServer::start_async().await;
    let m = server
        .mock_async(|when, then| {
            when.method(GET)
                .path("/api/breaking-news-plural")
                .query_param("filters[isPinned][$eq]", "true")
                .query_param("sort", "PublishedTimestamp:desc");
            then.status(200).json_body(json!({ "data": [
                { "id": 2, "attributes": { "Title": "Newest", "isPinned": false } },
                { "id": 1, "Title": "Older" }
            ] }));
        })
        .await;

    let client = StrapiClient::new(server.url("/api"));
    let pinned = fetch_pinned(&client).await.expect("pinned ok");

    m.assert_async().await;
    assert_eq!(pinned.len(), 2);
    assert_eq!(pinned[0].base.title, "Newest");
    assert!(pinned.iter().all(|p| p.base.is_pinned));
}

#[tokio::test]
async fn sponsored_request_filters_active_and_absolutizes_media() {
    let server = MockServer::start_async().await;
    let m = server
        .mock_async(|when, then| {
            when.method(GET)
                .path("/api/sponsored-posts")
                .query_param("filters[IsActive][$eq]", "true");
            then.status(200).json_body(json!({ "data": [{
                "id": 5,
                "Title": "Sunset cruise",
                "SponsorName": "Bali Hai Tours",
                "FeaturedImage": { "url": "/uploads/cruise.jpg" },
                "DisplayPosition": "position-3",
                "ImpressionCount": 120,
                "ClickCount": 7
            }] }));
        })
        .await;

    let client = StrapiClient::new(server.url("/api"));
    let items = fetch_sponsored(&client).await.expect("sponsored ok");

    m.assert_async().await;
    let s = &items[0];
    assert_eq!(s.sponsor_name, "Bali Hai Tours");
    assert_eq!(s.base.image.as_deref(), Some(server.url("/uploads/cruise.jpg").as_str()));
    assert_eq!(s.display_position, "position-3");
    assert_eq!((s.impression_count, s.click_count), (120, 7));
}

#[tokio::test]
async fn non_success_status_maps_to_status_error() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(GET).path("/api/breaking-news/live");
            then.status(503).body("maintenance");
        })
        .await;

    let client = StrapiClient::new(server.url("/api"));
    let err = client
        .fetch_records(&UpstreamRequest::news())
        .await
        .unwrap_err();
    assert_eq!(
        err,
        FetchError::Status {
            path: "/breaking-news/live".to_string(),
            status: 503
        }
    );
    assert!(err.is_unavailable());
}

#[tokio::test]
async fn non_json_body_is_malformed() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(GET).path("/api/breaking-news/live");
            then.status(200).body("<html>proxy error</html>");
        })
        .await;

    let client = StrapiClient::new(server.url("/api"));
    let err = client
        .fetch_records(&UpstreamRequest::news())
        .await
        .unwrap_err();
    assert_eq!(err.kind(), "malformed");
    assert!(!err.is_unavailable());
}

#[tokio::test]
async fn slow_upstream_maps_to_timeout() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(GET).path("/api/breaking-news/live");
            then.status(200)
                .delay(Duration::from_secs(3))
                .json_body(json!({ "data": [] }));
        })
        .await;

    let client = StrapiClient::new(server.url("/api")).with_timeout(Duration::from_millis(200));
    let err = client
        .fetch_records(&UpstreamRequest::news())
        .await
        .unwrap_err();
    assert_eq!(err.kind(), "timeout");
}

#[tokio::test]
async fn unreachable_host_is_transport_error() {
    let client = StrapiClient::new("http://127.0.0.1:1/api").with_timeout(Duration::from_secs(2));
    let err = client
        .fetch_records(&UpstreamRequest::news())
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        FetchError::Transport { .. } | FetchError::Timeout { .. }
    ));
    assert!(err.is_unavailable());
}
