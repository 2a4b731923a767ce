//! HTTP façade tests driven through the router with `oneshot`.

use std::sync::Arc;

use axum::{
    Router,
    body::Body,
    http::{Method, Request, StatusCode},
};
use docktrine::access::adapters::memory::InMemoryApiKeyStore;
use docktrine::client::{ApiClient, CliSession, ClientConfig, ClientError};
use docktrine::container::{
    adapters::memory::InMemoryDaemon, domain::ContainerStateSnapshot, ports::ContainerInspection,
};
use docktrine::http::{API_KEY_HEADER, AppState, Backend, router};
use docktrine::server_registry::{adapters::memory::InMemoryServerRegistry, domain::DaemonHost};
use http_body_util::BodyExt;
use mockable::DefaultClock;
use rstest::{fixture, rstest};
use serde_json::{Value, json};
use tower::ServiceExt;

struct InMemoryBackend;

impl Backend for InMemoryBackend {
    type Registry = InMemoryServerRegistry;
    type Connector = InMemoryDaemon;
    type KeyStore = InMemoryApiKeyStore;
    type Clock = DefaultClock;
}

struct Api {
    router: Router,
    daemon: InMemoryDaemon,
    key: String,
}

impl Api {
    async fn call(&self, method: Method, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
        self.send(method, uri, body, Some(&self.key)).await
    }

    async fn send(
        &self,
        method: Method,
        uri: &str,
        body: Option<Value>,
        key: Option<&str>,
    ) -> (StatusCode, Value) {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(value) = key {
            builder = builder.header(API_KEY_HEADER, value);
        }
        let request = match body {
            Some(json_body) => builder
                .header("content-type", "application/json")
                .body(Body::from(json_body.to_string())),
            None => builder.body(Body::empty()),
        }
        .expect("request should build");

        let response = self
            .router
            .clone()
            .oneshot(request)
            .await
            .expect("router should respond");
        let status = response.status();
        let bytes = response
            .into_body()
            .collect()
            .await
            .expect("body should be readable")
            .to_bytes();
        let value = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).expect("body should be JSON")
        };
        (status, value)
    }
}

fn inspection(id: &str, name: &str, running: bool) -> ContainerInspection {
    ContainerInspection {
        id: id.to_owned(),
        name: format!("/{name}"),
        configured_image: Some(String::from("nginx:1.27")),
        image_id: format!("sha256:{id}"),
        state: ContainerStateSnapshot {
            status: if running { "running" } else { "exited" }.to_owned(),
            running,
            ..ContainerStateSnapshot::default()
        },
        created: String::from("2024-05-01T10:00:00Z"),
        ports: Vec::new(),
        labels: Default::default(),
    }
}

#[fixture]
async fn api() -> Api {
    let daemon = InMemoryDaemon::new();
    let state = AppState::<InMemoryBackend>::new(
        Arc::new(InMemoryServerRegistry::new()),
        Arc::new(daemon.clone()),
        Arc::new(InMemoryApiKeyStore::new()),
        Arc::new(DefaultClock),
    );
    state
        .servers
        .bootstrap()
        .await
        .expect("registry bootstrap should succeed");
    let issued = state
        .access
        .provision("tests")
        .await
        .expect("key should provision");
    daemon
        .add_container(&DaemonHost::local(), inspection("a1", "web", true))
        .expect("container should be added");
    daemon
        .add_container(&DaemonHost::local(), inspection("b2", "worker", false))
        .expect("container should be added");

    Api {
        router: router(state),
        daemon,
        key: issued.secret().expose().to_owned(),
    }
}

#[rstest]
#[case(None)]
#[case(Some(""))]
#[case(Some("not-a-key"))]
#[tokio::test(flavor = "multi_thread")]
async fn requests_without_a_valid_key_are_rejected(
    #[future] api: Api,
    #[case] key: Option<&str>,
) {
    let harness = api.await;

    let (status, body) = harness.send(Method::GET, "/containers", None, key).await;

    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert!(body["error"].is_string());
    assert!(
        harness
            .daemon
            .connected_hosts()
            .expect("hosts should be readable")
            .is_empty()
    );
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn lists_containers_on_default_server(#[future] api: Api) {
    let harness = api.await;

    let (status, body) = harness.call(Method::GET, "/containers", None).await;

    assert_eq!(status, StatusCode::OK);
    let names: Vec<&str> = body
        .as_array()
        .expect("listing should be an array")
        .iter()
        .filter_map(|c| c["name"].as_str())
        .collect();
    assert_eq!(names, vec!["web", "worker"]);
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn container_detail_uses_camel_case_fields(#[future] api: Api) {
    let harness = api.await;

    let (status, body) = harness.call(Method::GET, "/containers/web", None).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["id"], "a1");
    assert_eq!(body["imageId"], "sha256:a1");
    assert_eq!(body["state"]["running"], true);
}

#[rstest]
#[case("/containers?server=missing")]
#[case("/containers/ghost")]
#[case("/servers/missing")]
#[tokio::test(flavor = "multi_thread")]
async fn unknown_targets_return_not_found(#[future] api: Api, #[case] uri: &str) {
    let harness = api.await;

    let (status, body) = harness.call(Method::GET, uri, None).await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert!(body["error"].is_string());
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn start_returns_confirmation_message(#[future] api: Api) {
    let harness = api.await;

    let (status, body) = harness
        .call(Method::POST, "/containers/start/worker", None)
        .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Container worker started successfully");
    let worker = harness
        .daemon
        .container(&DaemonHost::local(), "b2")
        .expect("container should be readable")
        .expect("container should exist");
    assert!(worker.state.running);
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn restart_with_pull_fetches_the_image(#[future] api: Api) {
    let harness = api.await;

    let (status, _) = harness
        .call(Method::POST, "/containers/restart/web?pull_latest=true", None)
        .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        harness.daemon.pulled_images().expect("pulls should be readable"),
        vec![String::from("nginx:1.27")]
    );
    assert_eq!(
        harness.daemon.restart_count("a1").expect("restarts should be readable"),
        1
    );
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn unreachable_server_returns_bad_gateway(#[future] api: Api) {
    let harness = api.await;
    harness
        .daemon
        .refuse_connections(&DaemonHost::local())
        .expect("host should be marked unreachable");

    let (status, _) = harness.call(Method::GET, "/containers", None).await;

    assert_eq!(status, StatusCode::BAD_GATEWAY);
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn create_server_returns_created_view(#[future] api: Api) {
    let harness = api.await;

    let (status, body) = harness
        .call(
            Method::POST,
            "/servers",
            Some(json!({"name": "edge", "host": "tcp://10.0.0.7:2375"})),
        )
        .await;

    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["name"], "edge");
    assert_eq!(body["is_default"], false);

    let (_, listing) = harness.call(Method::GET, "/servers", None).await;
    assert_eq!(listing.as_array().map(Vec::len), Some(2));
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn duplicate_server_name_conflicts(#[future] api: Api) {
    let harness = api.await;

    let (status, body) = harness
        .call(
            Method::POST,
            "/servers",
            Some(json!({"name": "local", "host": "tcp://10.0.0.7:2375"})),
        )
        .await;

    assert_eq!(status, StatusCode::CONFLICT);
    assert!(body["error"].is_string());
}

#[rstest]
#[case(json!({"name": "  ", "host": "tcp://10.0.0.7:2375"}))]
#[case(json!({"name": "edge", "host": "ftp://10.0.0.7"}))]
#[case(json!({"name": "edge"}))]
#[tokio::test(flavor = "multi_thread")]
async fn invalid_server_bodies_are_bad_requests(#[future] api: Api, #[case] payload: Value) {
    let harness = api.await;

    let (status, body) = harness.call(Method::POST, "/servers", Some(payload)).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].is_string());
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn deleting_a_server_confirms_and_removes_it(#[future] api: Api) {
    let harness = api.await;

    let (status, body) = harness.call(Method::DELETE, "/servers/local", None).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Server local deleted successfully");
    let (after, _) = harness.call(Method::GET, "/servers/local", None).await;
    assert_eq!(after, StatusCode::NOT_FOUND);
}

#[rstest]
#[case("1")]
#[case("TRUE")]
#[case("yes")]
#[case("false")]
#[tokio::test(flavor = "multi_thread")]
async fn restart_treats_anything_but_true_as_no_pull(#[future] api: Api, #[case] flag: &str) {
    let harness = api.await;

    let (status, body) = harness
        .call(
            Method::POST,
            &format!("/containers/restart/web?pull_latest={flag}"),
            None,
        )
        .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Container web restarted successfully");
    assert!(
        harness
            .daemon
            .pulled_images()
            .expect("pulls should be readable")
            .is_empty()
    );
    assert_eq!(
        harness.daemon.restart_count("a1").expect("restarts should be readable"),
        1
    );
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn malformed_query_is_a_json_bad_request(#[future] api: Api) {
    let harness = api.await;

    let (status, body) = harness
        .call(Method::GET, "/containers?server=local&server=edge", None)
        .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].is_string());
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn shell_use_only_switches_to_registered_servers(#[future] api: Api) {
    let harness = api.await;
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("listener should bind");
    let address = listener.local_addr().expect("listener should have an address");
    let app = harness.router.clone();
    tokio::spawn(async move { axum::serve(listener, app).await });
    let client = ApiClient::new(
        ClientConfig::new(&format!("http://{address}"), &harness.key).expect("valid config"),
    );
    let mut session = CliSession::default();

    let unknown = session.switch_server(&client, "ghost").await;
    assert!(matches!(
        unknown,
        Err(ClientError::Api { status, .. }) if status.as_u16() == 404
    ));
    assert_eq!(session.server(), None);

    session
        .switch_server(&client, "local")
        .await
        .expect("registered server should be selectable");
    assert_eq!(session.server(), Some("local"));

    session
        .switch_server(&client, "ghost")
        .await
        .expect_err("unknown server should be refused");
    assert_eq!(session.server(), Some("local"));

    session
        .switch_server(&client, "default")
        .await
        .expect("default needs no lookup");
    assert_eq!(session.server(), None);
}
