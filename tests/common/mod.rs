//! Test helpers for integration tests.
//!
//! Provides local stand-ins for the forum listing endpoint and the Twilio
//! Messages endpoint, each served by axum on an ephemeral port.

#![allow(dead_code)]

use std::collections::{HashMap, VecDeque};
use std::net::SocketAddr;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use axum::extract::{Form, Path, State};
use axum::http::{HeaderMap, StatusCode};
use axum::routing::{get, post};
use axum::Router;
use base64::Engine;
use tokio::net::TcpListener;

use freebie_alert::{Config, Subscription, TwilioCredentials};

pub const ACCOUNT_ID: &str = "AC123";
pub const AUTH_TOKEN: &str = "secret";
pub const FROM_NUMBER: &str = "+15550001111";
pub const TO_NUMBER: &str = "+15552223333";

/// One scripted forum response.
#[derive(Clone)]
pub struct ForumResponse {
    pub status: StatusCode,
    pub body: String,
    pub delay: Duration,
}

impl ForumResponse {
    pub fn ok(body: String) -> Self {
        Self {
            status: StatusCode::OK,
            body,
            delay: Duration::ZERO,
        }
    }

    pub fn status(status: StatusCode) -> Self {
        Self {
            status,
            body: r#"{"message": "Not Found", "error": 404}"#.to_string(),
            delay: Duration::ZERO,
        }
    }

    pub fn delayed(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }
}

/// A request seen by the forum stub.
#[derive(Clone, Debug)]
pub struct ForumRequest {
    pub forum: String,
    pub user_agent: Option<String>,
}

#[derive(Clone, Default)]
struct ForumState {
    script: Arc<Mutex<VecDeque<ForumResponse>>>,
    requests: Arc<Mutex<Vec<ForumRequest>>>,
}

/// Forum stub serving `/r/:forum/new.json` from a script, then 404.
pub struct ForumStub {
    pub addr: SocketAddr,
    state: ForumState,
}

impl ForumStub {
    pub async fn start(script: Vec<ForumResponse>) -> Self {
        let state = ForumState {
            script: Arc::new(Mutex::new(script.into())),
            requests: Arc::default(),
        };
        let app = Router::new()
            .route("/r/:forum/new.json", get(serve_listing))
            .with_state(state.clone());
        let addr = serve(app).await;
        Self { addr, state }
    }

    pub fn base_url(&self) -> String {
        format!("http://{}", self.addr)
    }

    pub fn requests(&self) -> Vec<ForumRequest> {
        self.state.requests.lock().unwrap().clone()
    }
}

async fn serve_listing(
    State(state): State<ForumState>,
    Path(forum): Path<String>,
    headers: HeaderMap,
) -> (StatusCode, String) {
    state.requests.lock().unwrap().push(ForumRequest {
        forum,
        user_agent: headers
            .get("user-agent")
            .and_then(|v| v.to_str().ok())
            .map(str::to_string),
    });

    let next = state.script.lock().unwrap().pop_front();
    match next {
        Some(response) => {
            if !response.delay.is_zero() {
                tokio::time::sleep(response.delay).await;
            }
            (response.status, response.body)
        }
        None => (StatusCode::NOT_FOUND, String::new()),
    }
}

/// A message received by the Twilio stub.
#[derive(Clone, Debug)]
pub struct SentMessage {
    pub account_id: String,
    pub basic_auth: Option<(String, String)>,
    pub form: HashMap<String, String>,
}

impl SentMessage {
    pub fn body(&self) -> &str {
        self.form.get("Body").map(String::as_str).unwrap_or_default()
    }
}

#[derive(Clone)]
struct TwilioState {
    reject_with: Option<StatusCode>,
    sent: Arc<Mutex<Vec<SentMessage>>>,
}

/// Twilio stub accepting `POST /2010-04-01/Accounts/:sid/Messages.json`.
pub struct TwilioStub {
    pub addr: SocketAddr,
    state: TwilioState,
}

impl TwilioStub {
    pub async fn start() -> Self {
        Self::start_with(None).await
    }

    /// Start a stub that answers every message with `status` and an error body.
    pub async fn rejecting(status: StatusCode) -> Self {
        Self::start_with(Some(status)).await
    }

    async fn start_with(reject_with: Option<StatusCode>) -> Self {
        let state = TwilioState {
            reject_with,
            sent: Arc::default(),
        };
        let app = Router::new()
            .route(
                "/2010-04-01/Accounts/:sid/Messages.json",
                post(create_message),
            )
            .with_state(state.clone());
        let addr = serve(app).await;
        Self { addr, state }
    }

    pub fn api_base(&self) -> String {
        format!("http://{}", self.addr)
    }

    pub fn sent(&self) -> Vec<SentMessage> {
        self.state.sent.lock().unwrap().clone()
    }

    pub fn bodies(&self) -> Vec<String> {
        self.sent().iter().map(|m| m.body().to_string()).collect()
    }
}

async fn create_message(
    State(state): State<TwilioState>,
    Path(account_id): Path<String>,
    headers: HeaderMap,
    Form(form): Form<HashMap<String, String>>,
) -> (StatusCode, String) {
    if let Some(status) = state.reject_with {
        return (
            status,
            r#"{"code": 20003, "message": "Authenticate", "status": 401}"#.to_string(),
        );
    }

    state.sent.lock().unwrap().push(SentMessage {
        account_id,
        basic_auth: decode_basic_auth(&headers),
        form,
    });
    (
        StatusCode::CREATED,
        r#"{"sid": "SM1", "status": "queued"}"#.to_string(),
    )
}

fn decode_basic_auth(headers: &HeaderMap) -> Option<(String, String)> {
    let value = headers.get("authorization")?.to_str().ok()?;
    let encoded = value.strip_prefix("Basic ")?;
    let decoded = base64::engine::general_purpose::STANDARD
        .decode(encoded)
        .ok()?;
    let decoded = String::from_utf8(decoded).ok()?;
    let (user, pass) = decoded.split_once(':')?;
    Some((user.to_string(), pass.to_string()))
}

async fn serve(app: Router) -> SocketAddr {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    addr
}

/// Render a listing body from `(id, title, created_utc)` triples.
pub fn listing_json(items: &[(&str, &str, f64)]) -> String {
    let children: Vec<serde_json::Value> = items
        .iter()
        .map(|(id, title, created_utc)| {
            serde_json::json!({
                "kind": "t3",
                "data": {
                    "id": id,
                    "title": title,
                    "permalink": format!("/r/freebies/comments/{id}/"),
                    "created_utc": created_utc,
                }
            })
        })
        .collect();

    serde_json::json!({
        "kind": "Listing",
        "data": { "after": null, "children": children }
    })
    .to_string()
}

/// A creation time comfortably inside any recency window.
pub fn fresh_timestamp() -> f64 {
    // Slightly ahead of now so slow test machines cannot push it out.
    chrono::Utc::now().timestamp() as f64 + 60.0
}

/// A creation time far outside any recency window.
pub fn stale_timestamp() -> f64 {
    1_000_000.0
}

pub fn subscription(poll_interval_secs: u64) -> Subscription {
    Subscription {
        credentials: TwilioCredentials {
            account_id: ACCOUNT_ID.to_string(),
            auth_token: AUTH_TOKEN.to_string(),
            from_number: FROM_NUMBER.to_string(),
            to_number: TO_NUMBER.to_string(),
        },
        forum_name: "freebies".to_string(),
        poll_interval_secs,
    }
}

pub fn config(forum: &ForumStub, twilio: &TwilioStub) -> Config {
    let mut config = Config::default();
    config.forum.base_url = forum.base_url();
    config.forum.link_host = "www.example.com".to_string();
    config.twilio.api_base = twilio.api_base();
    config.http.connect_timeout_secs = 2;
    config.http.total_timeout_secs = 2;
    config
}
