#![allow(dead_code)]

use std::process::{Child, Command, Stdio};
use std::sync::OnceLock;
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use reqwest::StatusCode;
use serde_json::{json, Value};

static SERVER: OnceLock<TestServer> = OnceLock::new();

pub struct TestServer {
    pub port: u16,
    pub base_url: String,
    child: Child,
}

impl TestServer {
    fn spawn() -> Result<Self> {
        // Pick an unused port for isolation
        let port = portpicker::pick_unused_port().context("failed to pick free port")?;
        let base_url = format!("http://127.0.0.1:{}", port);

        // Cargo builds the binary before integration tests and exposes its path
        let mut cmd = Command::new(env!("CARGO_BIN_EXE_socialconnect-api"));
        cmd.env("PORT", port.to_string())
            .env("SERVER_HOST", "127.0.0.1")
            .env("DATABASE_RUN_MIGRATIONS", "true")
            .stdin(Stdio::null())
            .stdout(Stdio::inherit())
            .stderr(Stdio::inherit());

        // Inherit environment so the server can see DATABASE_URL and JWT_SECRET (or load them from .env)
        let child = cmd.spawn().context("failed to spawn server binary")?;

        Ok(Self { port, base_url, child })
    }

    async fn wait_ready(&self, timeout: Duration) -> Result<()> {
        let client = reqwest::Client::new();
        let deadline = Instant::now() + timeout;
        loop {
            if Instant::now() > deadline {
                break;
            }
            let url = format!("{}/health", self.base_url);
            if let Ok(resp) = client.get(&url).send().await {
                if resp.status() == StatusCode::OK {
                    return Ok(());
                }
            }
            tokio::time::sleep(Duration::from_millis(150)).await;
        }
        anyhow::bail!("server did not become ready on {} within {:?}", self.base_url, timeout)
    }

    pub fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }
}

/// End-to-end tests need a live PostgreSQL. Without DATABASE_URL they skip.
pub fn database_configured() -> bool {
    let _ = dotenvy::dotenv();
    match std::env::var("DATABASE_URL") {
        Ok(url) if !url.trim().is_empty() => true,
        _ => {
            eprintln!("skipping: DATABASE_URL is not set");
            false
        }
    }
}

pub async fn ensure_server() -> Result<&'static TestServer> {
    let server = SERVER.get_or_init(|| TestServer::spawn().expect("failed to spawn server binary"));
    server.wait_ready(Duration::from_secs(15)).await?;
    Ok(server)
}

/// Freshly registered account
pub struct TestUser {
    pub id: String,
    pub username: String,
    pub email: String,
    pub password: String,
    pub token: String,
}

/// Unique, pattern-valid username (3-20 chars of [A-Za-z0-9_])
pub fn unique_username(prefix: &str) -> String {
    let suffix = uuid::Uuid::new_v4().simple().to_string();
    format!("{}_{}", prefix, &suffix[..10])
}

pub async fn register_user(client: &reqwest::Client, server: &TestServer, prefix: &str) -> Result<TestUser> {
    let username = unique_username(prefix);
    let email = format!("{}@example.com", username);
    let password = "secret123".to_string();

    let res = client
        .post(server.url("/api/auth/register"))
        .json(&json!({ "email": email, "password": password, "username": username }))
        .send()
        .await?;

    anyhow::ensure!(res.status() == StatusCode::CREATED, "register failed: {}", res.status());
    let body: Value = res.json().await?;

    Ok(TestUser {
        id: body["data"]["user"]["id"].as_str().context("missing user id")?.to_string(),
        token: body["data"]["token"].as_str().context("missing token")?.to_string(),
        username,
        email,
        password,
    })
}

pub async fn create_post(client: &reqwest::Client, server: &TestServer, user: &TestUser, content: &str) -> Result<String> {
    let res = client
        .post(server.url("/api/posts/create"))
        .bearer_auth(&user.token)
        .json(&json!({ "content": content }))
        .send()
        .await?;

    anyhow::ensure!(res.status() == StatusCode::CREATED, "create post failed: {}", res.status());
    let body: Value = res.json().await?;
    Ok(body["data"]["id"].as_str().context("missing post id")?.to_string())
}
