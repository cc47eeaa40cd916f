use std::time::Duration;

use hn_core::{spawn_refresher, FeedLoader, FeedOptions, HnClient, StoryFeed};
use reqwest::Client;
use serde_json::json;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

async fn mock_feed() -> MockServer {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/v0/topstories.json"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([42])))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/v0/item/42.json"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": 42, "title": "Answer", "by": "dna", "time": 1700000000, "type": "story"
        })))
        .mount(&server)
        .await;
    server
}

fn client_for(server: &MockServer) -> HnClient {
    HnClient::new(Client::new(), &format!("{}/v0", server.uri())).unwrap()
}

async fn index_requests(server: &MockServer) -> usize {
    server
        .received_requests()
        .await
        .unwrap()
        .iter()
        .filter(|r| r.url.path() == "/v0/topstories.json")
        .count()
}

#[tokio::test]
async fn refresher_reloads_until_stopped() {
    let server = mock_feed().await;
    let loader = FeedLoader::new(client_for(&server), FeedOptions::default());
    let mut rx = loader.subscribe();

    let handle = spawn_refresher(loader.clone(), Duration::from_millis(50));

    // Wait for a timer-driven cycle to land.
    tokio::time::timeout(Duration::from_secs(2), async {
        loop {
            rx.changed().await.unwrap();
            if !rx.borrow_and_update().stories.is_empty() {
                break;
            }
        }
    })
    .await
    .expect("timed out waiting for a refresh");

    handle.stop().await.expect("stop refresher");
    let after_stop = index_requests(&server).await;
    assert!(after_stop >= 1);

    tokio::time::sleep(Duration::from_millis(250)).await;
    assert_eq!(index_requests(&server).await, after_stop);
    assert!(!loader.state().refreshing);
}

#[tokio::test]
async fn first_tick_waits_one_interval() {
    let server = mock_feed().await;
    let loader = FeedLoader::new(client_for(&server), FeedOptions::default());

    let handle = spawn_refresher(loader, Duration::from_secs(300));
    tokio::time::sleep(Duration::from_millis(100)).await;
    assert_eq!(index_requests(&server).await, 0);

    handle.stop().await.expect("stop refresher");
}

#[tokio::test]
async fn dropping_the_handle_cancels_the_timer() {
    let server = mock_feed().await;
    let loader = FeedLoader::new(client_for(&server), FeedOptions::default());

    let handle = spawn_refresher(loader, Duration::from_millis(30));
    tokio::time::sleep(Duration::from_millis(100)).await;
    drop(handle);

    // Let an already started cycle finish before counting.
    tokio::time::sleep(Duration::from_millis(100)).await;
    let settled = index_requests(&server).await;
    tokio::time::sleep(Duration::from_millis(200)).await;
    assert_eq!(index_requests(&server).await, settled);
}

#[tokio::test]
async fn mounted_feed_loads_and_stops_on_teardown() {
    let server = mock_feed().await;
    let options = FeedOptions {
        auto_refresh: true,
        refresh_interval: Duration::from_millis(50),
        ..FeedOptions::default()
    };

    let feed = StoryFeed::mount(client_for(&server), options);
    assert!(feed.auto_refresh());
    let mut rx = feed.subscribe();

    tokio::time::timeout(Duration::from_secs(2), async {
        while rx.borrow_and_update().loading {
            rx.changed().await.unwrap();
        }
    })
    .await
    .expect("initial load never finished");
    assert_eq!(feed.state().stories[0].id, 42);

    // Initial load plus at least one timer cycle.
    tokio::time::sleep(Duration::from_millis(200)).await;
    assert!(index_requests(&server).await >= 2);

    feed.teardown().await;
    let after_teardown = index_requests(&server).await;
    tokio::time::sleep(Duration::from_millis(250)).await;
    assert_eq!(index_requests(&server).await, after_teardown);
}

#[tokio::test]
async fn toggling_auto_refresh_off_stops_the_timer() {
    let server = mock_feed().await;
    let options = FeedOptions {
        auto_refresh: false,
        refresh_interval: Duration::from_millis(40),
        ..FeedOptions::default()
    };

    let mut feed = StoryFeed::mount(client_for(&server), options);
    tokio::time::sleep(Duration::from_millis(200)).await;
    assert_eq!(index_requests(&server).await, 1, "only the initial load");

    feed.set_auto_refresh(true);
    tokio::time::sleep(Duration::from_millis(200)).await;
    assert!(index_requests(&server).await >= 2);

    feed.set_auto_refresh(false);
    assert!(!feed.auto_refresh());
    tokio::time::sleep(Duration::from_millis(100)).await;
    let settled = index_requests(&server).await;
    tokio::time::sleep(Duration::from_millis(200)).await;
    assert_eq!(index_requests(&server).await, settled);

    feed.teardown().await;
}

#[tokio::test]
async fn manual_commands_use_their_load_modes() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/v0/topstories.json"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([42])))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/v0/item/42.json"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({
                    "id": 42, "title": "Answer", "by": "dna", "time": 1700000000, "type": "story"
                }))
                .set_delay(Duration::from_millis(300)),
        )
        .mount(&server)
        .await;

    let feed = StoryFeed::mount(client_for(&server), FeedOptions::default());
    let mut rx = feed.subscribe();
    tokio::time::timeout(Duration::from_secs(2), async {
        while rx.borrow_and_update().loading {
            rx.changed().await.unwrap();
        }
    })
    .await
    .expect("initial load never finished");

    let refresh = feed.refresh();
    rx.changed().await.unwrap();
    {
        let during = rx.borrow_and_update();
        assert!(during.refreshing);
        assert!(!during.loading);
        assert_eq!(during.stories.len(), 1, "refresh keeps content visible");
    }
    refresh.await.unwrap();
    {
        let after = rx.borrow_and_update();
        assert!(!after.refreshing);
        assert!(!after.loading);
    }

    let retry = feed.retry();
    rx.changed().await.unwrap();
    {
        let during = rx.borrow_and_update();
        assert!(during.loading);
        assert!(!during.refreshing);
    }
    retry.await.unwrap();
    {
        let after = rx.borrow_and_update();
        assert!(!after.loading);
        assert_eq!(after.stories.len(), 1);
    }

    feed.teardown().await;
}

#[tokio::test]
async fn zero_interval_does_not_panic() {
    let server = mock_feed().await;
    let loader = FeedLoader::new(client_for(&server), FeedOptions::default());

    let handle = spawn_refresher(loader, Duration::ZERO);
    tokio::time::sleep(Duration::from_millis(20)).await;
    handle.stop().await.expect("refresher task should not have panicked");
}
