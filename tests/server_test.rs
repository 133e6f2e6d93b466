//! Tests against a real listener: hot reload over the update channel and
//! graceful shutdown.

use std::time::Duration;

use reqwest::StatusCode;
use serde_json::Value;
use storefront_urls::config::RouterConfig;
use storefront_urls::http::{HttpServer, X_REQUEST_ID};
use storefront_urls::lifecycle::Shutdown;
use tokio::net::TcpListener;
use tokio::sync::mpsc;

mod common;

#[tokio::test]
async fn test_hot_reload_enables_diagnostics() {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    let shutdown = Shutdown::new();
    let (update_tx, config_updates) = mpsc::unbounded_channel();
    let server = HttpServer::new(RouterConfig::default(), common::echo_apps()).unwrap();
    let server_shutdown = shutdown.subscribe();
    let handle = tokio::spawn(server.run(listener, config_updates, server_shutdown));

    let client = reqwest::Client::new();
    let base = format!("http://{}", addr);

    let res = client.get(format!("{}/__debug__/", base)).send().await.unwrap();
    assert_eq!(res.status(), StatusCode::NOT_FOUND);

    let res = client.get(format!("{}/", base)).send().await.unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    assert!(res.headers().contains_key(X_REQUEST_ID));
    let json: Value = res.json().await.unwrap();
    assert_eq!(json["orders"], format!("http://{}/api/v1/orders/", addr));

    let mut config = RouterConfig::default();
    config.site.development_mode = true;
    update_tx.send(config).unwrap();

    // The swap happens on the reload task; poll until it lands.
    let mut status = StatusCode::NOT_FOUND;
    for _ in 0..50 {
        status = client
            .get(format!("{}/__debug__/", base))
            .send()
            .await
            .unwrap()
            .status();
        if status == StatusCode::OK {
            break;
        }
        tokio::time::sleep(Duration::from_millis(20)).await;
    }
    assert_eq!(status, StatusCode::OK);

    drop(client);
    shutdown.trigger();
    let result = tokio::time::timeout(Duration::from_secs(5), handle)
        .await
        .expect("server did not stop")
        .unwrap();
    assert!(result.is_ok());
}
