//! Wire-level tests for the v2 driver against a mock dashboard.

use std::sync::Arc;

use api_v2::{VersionTwoDriver, API_KEY_HEADER};
use dashboard::{ApiKey, BaseUrl, Client, DashboardError, Options};
use mockito::{Matcher, Mock, Server, ServerGuard};
use serde_json::{json, Value};
use transport::ReqwestTransport;

const KEY: &str = "my-api-key";

const NGINX_COMPOSE: &str = "name: nginx\nversion: latest\n\nwww:\n  enable_ssh: true";

fn client_for(url: &str) -> Client {
    let base_url = BaseUrl::new(format!("{url}/")).unwrap();
    let transport = Arc::new(ReqwestTransport::default_timeout().unwrap());
    let driver = VersionTwoDriver::new(base_url.clone(), ApiKey::new(KEY).unwrap(), transport);
    Client::new(base_url, Arc::new(driver))
}

async fn server() -> (ServerGuard, Client) {
    let server = Server::new_async().await;
    let client = client_for(&server.url());
    (server, client)
}

async fn json_mock(server: &mut ServerGuard, method: &str, path: &str, status: usize, body: Value) -> Mock {
    server
        .mock(method, path)
        .match_header(API_KEY_HEADER, KEY)
        .with_status(status)
        .with_header("content-type", "application/json")
        .with_body(body.to_string())
        .create_async()
        .await
}

fn options(value: Value) -> Options {
    value.as_object().unwrap().clone()
}

fn nginx_instance(current: &str, desired: &str) -> Value {
    json!({
        "id": "y7bzwghzP9ouM56g6",
        "name": "nginx",
        "state": { "current": current, "desired": desired },
        "app": { "name": "nginx", "version": "latest" },
        "services": { "www": { "state": current } }
    })
}

// ---------------------------------------------------------------------------
// Applications
// ---------------------------------------------------------------------------

#[tokio::test]
async fn apps_lists_definitions() {
    let (mut server, client) = server().await;
    let mock = json_mock(
        &mut server,
        "GET",
        "/api/v2/apps",
        200,
        json!([
            { "id": "ERfrBncoPKSN9ampt", "name": "nginx", "version": "latest" },
            { "id": "LENn6QcjnG8WRvAxf", "name": "nginx", "version": "1.11.4" }
        ]),
    )
    .await;

    let mut pairs: Vec<_> = client
        .apps()
        .await
        .unwrap()
        .iter()
        .map(|app| (app.name().to_owned(), app.version().to_owned()))
        .collect();
    pairs.sort();
    assert_eq!(
        pairs,
        [
            ("nginx".to_owned(), "1.11.4".to_owned()),
            ("nginx".to_owned(), "latest".to_owned())
        ]
    );
    mock.assert_async().await;
}

#[tokio::test]
async fn get_app() {
    let (mut server, client) = server().await;
    server
        .mock("GET", "/api/v2/apps/does/notexist")
        .with_status(404)
        .create_async()
        .await;
    json_mock(
        &mut server,
        "GET",
        "/api/v2/apps/nginx/latest",
        200,
        json!({ "id": "MKMZCnLcEJmkjSenJ", "name": "nginx", "version": "latest" }),
    )
    .await;

    assert_eq!(client.get_app("does", "notexist").await.unwrap(), None);
    let app = client.get_app("nginx", "latest").await.unwrap().unwrap();
    assert_eq!(app.name(), "nginx");
    assert_eq!(app.version(), "latest");
}

#[tokio::test]
async fn update_app_upserts_with_escaped_path() {
    let (mut server, client) = server().await;
    let escaped = json_mock(
        &mut server,
        "PUT",
        "/api/v2/apps/%3Cfoo%3E/0",
        201,
        json!({ "name": "<foo>", "version": "0" }),
    )
    .await;
    let nginx = server
        .mock("PUT", "/api/v2/apps/nginx/latest")
        .match_header(API_KEY_HEADER, KEY)
        .match_body(Matcher::Json(json!({ "storageBucket": "custom" })))
        .with_status(201)
        .with_header("content-type", "application/json")
        .with_body(json!({ "id": "MKMZCnLcEJmkjSenJ", "name": "nginx", "version": "latest" }).to_string())
        .create_async()
        .await;

    let app = client.update_app("<foo>", "0", None).await.unwrap().unwrap();
    assert_eq!(app.name(), "<foo>");

    let opts = options(json!({ "storageBucket": "custom" }));
    let app = client
        .update_app("nginx", "latest", Some(&opts))
        .await
        .unwrap()
        .unwrap();
    assert_eq!((app.name(), app.version()), ("nginx", "latest"));

    escaped.assert_async().await;
    nginx.assert_async().await;
}

#[tokio::test]
async fn update_app_other_status_is_absent() {
    let (mut server, client) = server().await;
    json_mock(&mut server, "PUT", "/api/v2/apps/nginx/latest", 200, json!({})).await;

    assert_eq!(client.update_app("nginx", "latest", None).await.unwrap(), None);
}

#[tokio::test]
async fn update_app_propagates_transport_failure() {
    let client = client_for("http://127.0.0.1:1");
    let err = client.update_app("<foo>", "0", None).await.unwrap_err();
    assert!(matches!(err, DashboardError::Transport(_)), "{err:?}");
}

#[tokio::test]
async fn delete_app() {
    let (mut server, client) = server().await;
    server
        .mock("DELETE", "/api/v2/apps/does/notexist")
        .with_status(404)
        .create_async()
        .await;
    let mock = server
        .mock("DELETE", "/api/v2/apps/nginx/latest")
        .match_header(API_KEY_HEADER, KEY)
        .with_status(204)
        .create_async()
        .await;

    assert!(!client.delete_app("does", "notexist").await.unwrap());
    assert!(client.delete_app("nginx", "latest").await.unwrap());
    mock.assert_async().await;
}

#[tokio::test]
async fn application_actions_round_trip() {
    let (mut server, client) = server().await;
    json_mock(
        &mut server,
        "PUT",
        "/api/v2/apps/nginx/latest",
        201,
        json!({ "name": "nginx", "version": "latest" }),
    )
    .await;
    server
        .mock("DELETE", "/api/v2/apps/nginx/latest")
        .with_status(204)
        .create_async()
        .await;

    let app = dashboard::Application::new(client, "nginx", "latest").unwrap();
    assert_eq!(app.update().await.unwrap(), Some(app.clone()));
    assert!(app.delete().await.unwrap());
}

// ---------------------------------------------------------------------------
// Manifest files
// ---------------------------------------------------------------------------

#[tokio::test]
async fn get_compose() {
    let (mut server, client) = server().await;
    server
        .mock("GET", "/api/v2/apps/does/notexist/files/dockerCompose")
        .with_status(404)
        .create_async()
        .await;
    server
        .mock("GET", "/api/v2/apps/nginx/latest/files/dockerCompose")
        .with_header("content-type", "text/html")
        .with_body("<html><body>No such path</body></html>")
        .create_async()
        .await;
    let unused = server
        .mock("GET", "/api/v2/apps/nginx/latest/files/notUsed")
        .expect(0)
        .create_async()
        .await;
    server
        .mock("GET", "/api/v2/apps/nginx/latest/files/bigboatCompose")
        .match_header(API_KEY_HEADER, KEY)
        .with_header("content-type", "text/plain")
        .with_body(NGINX_COMPOSE)
        .create_async()
        .await;

    assert_eq!(
        client.get_compose("does", "notexist", "dockerCompose").await.unwrap(),
        None
    );
    assert_eq!(
        client.get_compose("nginx", "latest", "dockerCompose").await.unwrap(),
        None
    );
    assert_eq!(
        client.get_compose("nginx", "latest", "notUsed").await.unwrap(),
        None
    );
    assert_eq!(
        client
            .get_compose("nginx", "latest", "bigboatCompose")
            .await
            .unwrap()
            .as_deref(),
        Some(NGINX_COMPOSE)
    );
    unused.assert_async().await;
}

#[tokio::test]
async fn update_compose_absent_targets_are_false() {
    let (mut server, client) = server().await;
    server
        .mock("PUT", "/api/v2/apps/does/notexist/files/dockerCompose")
        .with_status(404)
        .create_async()
        .await;

    assert!(!client
        .update_compose("does", "notexist", "dockerCompose", "x: y")
        .await
        .unwrap());
    assert!(!client
        .update_compose("nginx", "latest", "notUsed", "x: y")
        .await
        .unwrap());
}

#[tokio::test]
async fn update_compose_validates_before_writing() {
    let (mut server, client) = server().await;
    let write = server
        .mock("PUT", "/api/v2/apps/nginx/latest/files/bigboatCompose")
        .expect(0)
        .create_async()
        .await;

    let err = client
        .update_compose("nginx", "latest", "bigboatCompose", "name: [unterminated")
        .await
        .unwrap_err();
    assert!(err.is_validation(), "{err:?}");

    let err = client
        .update_compose("nginx", "latest", "bigboatCompose", ":")
        .await
        .unwrap_err();
    assert!(err.is_validation(), "{err:?}");

    let err = client
        .update_compose(
            "nginx",
            "latest",
            "bigboatCompose",
            "name: somethingElse\nversion: latest",
        )
        .await
        .unwrap_err();
    assert!(err.is_validation(), "{err:?}");

    write.assert_async().await;
}

#[tokio::test]
async fn update_compose_writes_valid_content() {
    let (mut server, client) = server().await;
    let write = server
        .mock("PUT", "/api/v2/apps/nginx/latest/files/bigboatCompose")
        .match_header(API_KEY_HEADER, KEY)
        .match_header("content-type", "text/plain")
        .match_body(NGINX_COMPOSE)
        .with_status(201)
        .with_body(NGINX_COMPOSE)
        .create_async()
        .await;

    assert!(client
        .update_compose("nginx", "latest", "bigboatCompose", NGINX_COMPOSE)
        .await
        .unwrap());
    write.assert_async().await;
}

#[tokio::test]
async fn update_compose_remote_rejection_is_validation() {
    let (mut server, client) = server().await;
    json_mock(
        &mut server,
        "PUT",
        "/api/v2/apps/nginx/latest/files/dockerCompose",
        400,
        json!({ "message": "Name property of Bigboat compose needs to be equal to name property of App" }),
    )
    .await;

    let err = client
        .update_compose("nginx", "latest", "dockerCompose", "services: {}")
        .await
        .unwrap_err();
    assert!(err.is_validation(), "{err:?}");
    assert!(err.to_string().contains("Name property"));
}

// ---------------------------------------------------------------------------
// Instances
// ---------------------------------------------------------------------------

#[tokio::test]
async fn instances_decode_nested_state() {
    let (mut server, client) = server().await;
    json_mock(
        &mut server,
        "GET",
        "/api/v2/instances",
        200,
        json!([
            { "id": "y7bzwghzP9ouM56g6", "name": "nginx" },
            {
                "id": "ySYXNTPw2ry9XE6nu",
                "name": "nginx2",
                "state": { "current": "starting", "desired": "running" }
            }
        ]),
    )
    .await;

    let mut data: Vec<_> = client
        .instances()
        .await
        .unwrap()
        .iter()
        .map(|i| {
            (
                i.name().to_owned(),
                i.current_state().to_owned(),
                i.desired_state().map(str::to_owned),
            )
        })
        .collect();
    data.sort();
    assert_eq!(
        data,
        [
            ("nginx".to_owned(), "running".to_owned(), None),
            ("nginx2".to_owned(), "starting".to_owned(), Some("running".to_owned())),
        ]
    );
}

#[tokio::test]
async fn get_instance() {
    let (mut server, client) = server().await;
    server
        .mock("GET", "/api/v2/instances/qux")
        .with_status(404)
        .create_async()
        .await;
    json_mock(
        &mut server,
        "GET",
        "/api/v2/instances/nginx",
        200,
        nginx_instance("starting", "running"),
    )
    .await;

    assert_eq!(client.get_instance("qux").await.unwrap(), None);

    let instance = client.get_instance("nginx").await.unwrap().unwrap();
    assert_eq!(instance.name(), "nginx");
    assert_eq!(instance.current_state(), "starting");
    assert_eq!(instance.desired_state(), Some("running"));
    let app = instance.application().unwrap();
    assert_eq!((app.name(), app.version()), ("nginx", "latest"));
    assert_eq!(
        Value::Object(instance.services().clone()),
        json!({ "www": { "state": "starting" } })
    );

    let again = client.get_instance("nginx").await.unwrap().unwrap();
    assert_eq!(instance, again);
}

#[tokio::test]
async fn get_instance_unauthorized_raises() {
    let (mut server, client) = server().await;
    server
        .mock("GET", "/api/v2/instances/no-api-key")
        .with_status(401)
        .with_header("content-type", "application/json")
        .with_body(json!({ "message": "No API key" }).to_string())
        .create_async()
        .await;

    let err = client.get_instance("no-api-key").await.unwrap_err();
    assert_eq!(
        err,
        DashboardError::Authentication {
            message: "No API key".into()
        }
    );
}

#[tokio::test]
async fn api_key_message_in_success_body_raises() {
    let (mut server, client) = server().await;
    json_mock(
        &mut server,
        "GET",
        "/api/v2/instances/nginx",
        200,
        json!({ "message": "No API key" }),
    )
    .await;

    let err = client.get_instance("nginx").await.unwrap_err();
    assert_eq!(
        err,
        DashboardError::Authentication {
            message: "No API key".into()
        }
    );
}

#[tokio::test]
async fn update_instance() {
    let (mut server, client) = server().await;
    server
        .mock("PUT", "/api/v2/instances/error")
        .with_status(400)
        .with_header("content-type", "text/plain")
        .with_body("error")
        .create_async()
        .await;
    let start = server
        .mock("PUT", "/api/v2/instances/nginx")
        .match_header(API_KEY_HEADER, KEY)
        .match_body(Matcher::Json(json!({
            "app": "nginx",
            "version": "latest",
            "parameters": { "SETTING": "value" },
            "options": { "storageBucket": "custom" }
        })))
        .with_header("content-type", "application/json")
        .with_body(nginx_instance("starting", "running").to_string())
        .create_async()
        .await;

    let err = client
        .update_instance("error", "does", "notexist", None, None)
        .await
        .unwrap_err();
    assert_eq!(
        err,
        DashboardError::Api {
            status: 400,
            message: "error".into()
        }
    );

    let parameters = options(json!({ "SETTING": "value" }));
    let opts = options(json!({ "storageBucket": "custom" }));
    let instance = client
        .update_instance("nginx", "nginx", "latest", Some(&parameters), Some(&opts))
        .await
        .unwrap()
        .unwrap();
    assert_eq!(instance.name(), "nginx");
    assert_eq!(instance.current_state(), "starting");
    assert_eq!(instance.desired_state(), Some("running"));
    assert_eq!(instance.application().unwrap().name(), "nginx");
    start.assert_async().await;
}

#[tokio::test]
async fn delete_instance() {
    let (mut server, client) = server().await;
    server
        .mock("DELETE", "/api/v2/instances/error")
        .with_status(400)
        .with_header("content-type", "text/plain")
        .with_body("error")
        .create_async()
        .await;
    json_mock(
        &mut server,
        "DELETE",
        "/api/v2/instances/nginx",
        200,
        nginx_instance("stopping", "stopped"),
    )
    .await;

    assert!(matches!(
        client.delete_instance("error").await.unwrap_err(),
        DashboardError::Api { status: 400, .. }
    ));

    let instance = client.delete_instance("nginx").await.unwrap().unwrap();
    assert_eq!(instance.current_state(), "stopping");
    assert_eq!(instance.desired_state(), Some("stopped"));
    assert_eq!(instance.services()["www"], json!({ "state": "stopping" }));
}

#[tokio::test]
async fn malformed_instance_body_is_a_decode_error() {
    let (mut server, client) = server().await;
    json_mock(&mut server, "GET", "/api/v2/instances/nginx", 200, json!({ "state": 3 })).await;

    let err = client.get_instance("nginx").await.unwrap_err();
    assert!(matches!(err, DashboardError::Decode { .. }), "{err:?}");
}

// ---------------------------------------------------------------------------
// System
// ---------------------------------------------------------------------------

#[tokio::test]
async fn statuses_pass_through() {
    let (mut server, client) = server().await;
    let content = json!([
        {
            "name": "Available IPs",
            "lastCheck": { "time": 1494245442228_i64, "ISO": "2017-05-08T12:10:42.228Z" },
            "description": "Total number of IPs: 190. IPs in use: 19. <strong>Available IPs: 171</strong>",
            "details": { "totalIps": 190, "usedIps": 19 },
            "isOk": true
        },
        {
            "name": "Docker graph: /var/lib/docker",
            "lastCheck": { "time": 1494245487722_i64, "ISO": "2017-05-08T12:11:27.722Z" },
            "description": "Total size: 218.2 GB. <strong>Available: 96.3 GB</strong>",
            "details": { "total": 234322399232_i64, "used": 130956759040_i64, "free": 103365640192_i64 },
            "isOk": true
        }
    ]);
    json_mock(&mut server, "GET", "/api/v2/status", 200, content.clone()).await;

    let statuses = client.statuses().await.unwrap();
    let raw: Vec<Value> = statuses.iter().map(|s| s.as_value().clone()).collect();
    assert_eq!(Value::Array(raw), content);
    assert_eq!(statuses[0].name(), Some("Available IPs"));

    assert_eq!(client.statuses().await.unwrap(), statuses);
}
