#![allow(dead_code)]
use axum::{
    body::{to_bytes, Body},
    http::{HeaderMap, Method, Request, StatusCode},
    Router,
};
use ctor::dtor;
use patient_gateway::{
    app::build_router, config::Config, db::connection::PoolManager, state::AppState,
};
use serde_json::Value;
use sqlx::{
    mysql::{MySqlConnectOptions, MySqlConnection},
    Connection,
};
use std::{
    collections::HashMap,
    env,
    net::TcpListener,
    sync::{Mutex, OnceLock},
    time::Duration,
};
use testcontainers::{clients::Cli, core::WaitFor, Container, GenericImage, RunnableImage};
use tower::ServiceExt;

pub const TEST_ORIGIN: &str = "https://frontend.example";

pub struct TestResponse {
    pub status: StatusCode,
    pub headers: HeaderMap,
    pub body: Vec<u8>,
}

impl TestResponse {
    pub fn json(&self) -> Value {
        serde_json::from_slice(&self.body).expect("response body is json")
    }
}

/// Config pointing at a closed local port, so every checkout fails fast.
pub fn unreachable_config() -> Config {
    let mut config = Config::from_lookup(|key| match key {
        "MYSQLHOST" => Some("127.0.0.1".into()),
        "MYSQLPORT" => Some("1".into()),
        "ALLOWED_ORIGIN" => Some(TEST_ORIGIN.into()),
        _ => None,
    });
    config.pool.acquire_timeout = Duration::from_secs(1);
    config
}

/// Router over lazily-connected pools that never reach a server.
pub fn offline_app() -> Router {
    let config = unreachable_config();
    let pools = PoolManager::connect_lazy(&config);
    build_router(AppState::new(pools, config)).expect("build router")
}

const CONTAINER_ROOT_PASSWORD: &str = "gateway_root";
const CONTAINER_DATABASE: &str = "gateway_test";
const CONTAINER_ADMIN: (&str, &str) = ("gateway_admin", "gateway_admin_pw");
const CONTAINER_GUEST: (&str, &str) = ("gateway_guest", "gateway_guest_pw");

static TESTCONTAINERS_DOCKER: OnceLock<&'static Cli> = OnceLock::new();
static TESTCONTAINERS_MYSQL: OnceLock<Mutex<Option<Container<'static, GenericImage>>>> =
    OnceLock::new();
static MYSQL_SETTINGS: tokio::sync::OnceCell<HashMap<String, String>> =
    tokio::sync::OnceCell::const_new();

#[dtor]
fn shutdown_testcontainer_mysql() {
    if let Some(holder) = TESTCONTAINERS_MYSQL.get() {
        if let Ok(mut guard) = holder.lock() {
            let _ = guard.take();
        }
    }
}

fn allocate_ephemeral_port() -> u16 {
    TcpListener::bind("127.0.0.1:0")
        .expect("bind ephemeral port")
        .local_addr()
        .expect("read socket addr")
        .port()
}

/// Config for the database tests.
///
/// With `TEST_MYSQLHOST` set, every setting comes from the `TEST_`-prefixed
/// variables (`TEST_MYSQL_ADMIN_USER`, `TEST_MYSQL_GUEST_USER`, ...) and the
/// guest account must be read-only. Otherwise a MySQL container is started
/// once per test binary with a full-access admin and a `SELECT`-only guest.
pub async fn mysql_config() -> Config {
    let settings = MYSQL_SETTINGS.get_or_init(mysql_settings).await;
    Config::from_lookup(|key| match key {
        "ALLOWED_ORIGIN" => Some(TEST_ORIGIN.into()),
        _ => settings.get(key).cloned(),
    })
}

async fn mysql_settings() -> HashMap<String, String> {
    const KEYS: [&str; 7] = [
        "MYSQLHOST",
        "MYSQLPORT",
        "MYSQLDATABASE",
        "MYSQL_ADMIN_USER",
        "MYSQL_ADMIN_PASSWORD",
        "MYSQL_GUEST_USER",
        "MYSQL_GUEST_PASSWORD",
    ];

    if env::var("TEST_MYSQLHOST").is_ok() {
        return KEYS
            .iter()
            .filter_map(|key| {
                env::var(format!("TEST_{key}"))
                    .ok()
                    .map(|value| (key.to_string(), value))
            })
            .collect();
    }

    let port = start_testcontainer_mysql();
    provision_roles(port).await;

    let values = [
        "127.0.0.1".to_string(),
        port.to_string(),
        CONTAINER_DATABASE.to_string(),
        CONTAINER_ADMIN.0.to_string(),
        CONTAINER_ADMIN.1.to_string(),
        CONTAINER_GUEST.0.to_string(),
        CONTAINER_GUEST.1.to_string(),
    ];
    KEYS.iter().map(|key| key.to_string()).zip(values).collect()
}

fn start_testcontainer_mysql() -> u16 {
    let docker = TESTCONTAINERS_DOCKER.get_or_init(|| Box::leak(Box::new(Cli::default())));
    let image_ref = env::var("TESTCONTAINERS_MYSQL_IMAGE").unwrap_or_else(|_| "mysql:8.0".to_string());
    let (image_name, image_tag) = image_ref
        .split_once(':')
        .unwrap_or((image_ref.as_str(), "latest"));
    let host_port = allocate_ephemeral_port();
    let image = GenericImage::new(image_name, image_tag)
        .with_env_var("MYSQL_ROOT_PASSWORD", CONTAINER_ROOT_PASSWORD)
        .with_env_var("MYSQL_DATABASE", CONTAINER_DATABASE)
        // The init-time server listens on port 0; only the final one reports 3306.
        .with_wait_for(WaitFor::message_on_stderr(
            "port: 3306  MySQL Community Server",
        ));
    let image = RunnableImage::from(image).with_mapped_port((host_port, 3306));
    let container = docker.run(image);
    let holder = TESTCONTAINERS_MYSQL.get_or_init(|| Mutex::new(None));
    *holder.lock().expect("lock testcontainers mysql") = Some(container);
    eprintln!("--- Testcontainers MySQL started on 127.0.0.1:{host_port} ---");
    host_port
}

/// Creates the two gateway roles: admin owns the test database, guest may
/// only read it.
async fn provision_roles(port: u16) {
    let options = MySqlConnectOptions::new()
        .host("127.0.0.1")
        .port(port)
        .username("root")
        .password(CONTAINER_ROOT_PASSWORD);

    let mut retry_count = 0;
    let max_retries = 5;
    let mut conn = loop {
        match MySqlConnection::connect_with(&options).await {
            Ok(conn) => break conn,
            Err(e) if retry_count < max_retries => {
                retry_count += 1;
                eprintln!(
                    "Retrying MySQL root connection (attempt {}/{}): {}",
                    retry_count, max_retries, e
                );
                tokio::time::sleep(Duration::from_secs(2)).await;
            }
            Err(e) => panic!("Failed to connect to test MySQL as root: {e}"),
        }
    };

    let (admin, admin_password) = CONTAINER_ADMIN;
    let (guest, guest_password) = CONTAINER_GUEST;
    let statements = [
        format!("CREATE USER IF NOT EXISTS '{admin}'@'%' IDENTIFIED BY '{admin_password}'"),
        format!("GRANT ALL PRIVILEGES ON {CONTAINER_DATABASE}.* TO '{admin}'@'%'"),
        format!("CREATE USER IF NOT EXISTS '{guest}'@'%' IDENTIFIED BY '{guest_password}'"),
        format!("GRANT SELECT ON {CONTAINER_DATABASE}.* TO '{guest}'@'%'"),
        "FLUSH PRIVILEGES".to_string(),
    ];
    for statement in &statements {
        sqlx::raw_sql(statement)
            .execute(&mut conn)
            .await
            .unwrap_or_else(|e| panic!("provision test roles ({statement}): {e}"));
    }
    conn.close().await.ok();
}

/// Router over eagerly connected pools built from `config`.
pub async fn app_with(config: Config) -> Router {
    let pools = PoolManager::connect(&config)
        .await
        .expect("connect test database");
    build_router(AppState::new(pools, config)).expect("build router")
}

pub async fn mysql_app() -> Router {
    app_with(mysql_config().await).await
}

/// Serializes database tests that count rows in the shared `patient` table.
pub async fn integration_guard() -> tokio::sync::MutexGuard<'static, ()> {
    static GUARD: OnceLock<tokio::sync::Mutex<()>> = OnceLock::new();
    GUARD.get_or_init(|| tokio::sync::Mutex::new(())).lock().await
}

pub async fn send(app: &Router, method: Method, uri: &str) -> TestResponse {
    let request = Request::builder()
        .method(method)
        .uri(uri)
        .body(Body::empty())
        .unwrap();
    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let headers = response.headers().clone();
    let body = to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("read body")
        .to_vec();
    TestResponse {
        status,
        headers,
        body,
    }
}

pub fn assert_gateway_headers(response: &TestResponse) {
    assert_eq!(
        response.headers.get("access-control-allow-origin").unwrap(),
        TEST_ORIGIN
    );
    assert_eq!(
        response.headers.get("access-control-allow-methods").unwrap(),
        "GET, POST, OPTIONS"
    );
    assert_eq!(
        response.headers.get("content-type").unwrap(),
        "application/json"
    );
}
