//! Hub endpoint registration

mod harness;

use harness::config::ConfigBuilder;
use harness::server::TestServer;

#[tokio::test]
async fn hub_requires_a_websocket_upgrade() {
    let server = TestServer::start(ConfigBuilder::new().build()).await.unwrap();

    let resp = server.client().get(server.url("/hubs/chat")).send().await.unwrap();

    assert!(resp.status().is_client_error(), "{}", resp.status());
    assert_ne!(resp.status(), 404);
}

#[tokio::test]
async fn hub_endpoint_disabled() {
    let server = TestServer::start(ConfigBuilder::new().without_hub().build()).await.unwrap();

    let resp = server.client().get(server.url("/hubs/chat")).send().await.unwrap();

    assert_eq!(resp.status(), 404);
}
