//! The bundled server over a real TCP listener.

use std::time::Duration;

use serde_json::{json, Value};
use tokio::net::TcpListener;
use tokio::sync::oneshot;
use version_gate::config::parse_config;
use version_gate::HttpServer;

const CONFIG: &str = r#"
[negotiation]
versions = ["1.0.0", "2.0.0"]
"#;

#[tokio::test]
async fn test_serves_negotiated_requests() {
    let config = parse_config(CONFIG).unwrap();
    let server = HttpServer::new(config).unwrap();

    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let (stop, stopped) = oneshot::channel::<()>();
    let handle = tokio::spawn(async move {
        server
            .run(listener, async move {
                let _ = stopped.await;
            })
            .await
    });

    let client = reqwest::Client::builder()
        .pool_max_idle_per_host(0)
        .no_proxy()
        .build()
        .unwrap();

    let res = client
        .get(format!("http://{addr}/"))
        .header("accept-version", "^1.0.0")
        .send()
        .await
        .expect("server unreachable");
    assert_eq!(res.status(), 200);
    assert_eq!(res.headers()["api-version"], "1.0.0");
    let body: Value = res.json().await.unwrap();
    assert_eq!(body, json!({"version": "^1.0.0", "matchedVersion": "1.0.0"}));

    let res = client
        .get(format!("http://{addr}/greeting"))
        .send()
        .await
        .unwrap();
    let body: Value = res.json().await.unwrap();
    assert_eq!(body["servedBy"], "2.0.0");

    let res = client
        .get(format!("http://{addr}/?version=5.0.0"))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), 400);
    let body: Value = res.json().await.unwrap();
    assert_eq!(body["detail"], "Supported Versions: [1.0.0,2.0.0]");

    drop(client);
    stop.send(()).unwrap();
    let finished = tokio::time::timeout(Duration::from_secs(5), handle).await;
    assert!(matches!(finished, Ok(Ok(Ok(())))));
}
