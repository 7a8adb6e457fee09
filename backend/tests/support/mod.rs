//! Shared harness driving the full HTTP app over the in-memory store.
#![allow(dead_code, reason = "each test crate uses a different subset of helpers")]

use std::sync::Arc;

use actix_web::http::StatusCode;
use actix_web::http::header::AUTHORIZATION;
use actix_web::{App, test as actix_test, web};
use chrono::{DateTime, TimeZone, Utc};
use mockable::MockClock;
use serde_json::Value;

use greencare::Trace;
use greencare::domain::{UserId, UserProfile};
use greencare::inbound::http::configure_api;
use greencare::inbound::http::error::json_error_handler;
use greencare::inbound::http::state::HttpState;
use greencare::outbound::memory::MemoryStore;

#[path = "../../src/server/state_builders.rs"]
mod state_builders;

use state_builders::{StoreBackend, build_http_state_with_clock};

/// 2024-01-05T12:00:00Z, between a reminder due on the 1st and its weekly successor.
pub fn harness_now() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 1, 5, 12, 0, 0)
        .single()
        .expect("valid timestamp")
}

/// A registered user and the bearer token that authenticates them.
#[derive(Debug, Clone)]
pub struct Account {
    pub id: UserId,
    pub token: String,
}

/// Status and decoded JSON body (or `Null` for an empty body).
#[derive(Debug)]
pub struct Reply {
    pub status: StatusCode,
    pub body: Value,
}

pub struct Harness {
    pub store: Arc<MemoryStore>,
    state: web::Data<HttpState>,
}

impl Harness {
    pub fn new() -> Self {
        let store = Arc::new(MemoryStore::new());
        let mut clock = MockClock::new();
        clock.expect_utc().returning(harness_now);
        let state =
            build_http_state_with_clock(&StoreBackend::Memory(Arc::clone(&store)), Arc::new(clock));
        Self { store, state }
    }

    /// Seed a user as the identity service would, and issue them a token.
    pub fn register(&self, name: &str) -> Account {
        let id = UserId::random();
        let email = format!("{}@example.com", name.to_lowercase());
        self.store
            .seed_user(UserProfile::new(id, name, email, harness_now()));
        let token = format!("token-{id}");
        self.store.issue_token(id, &token);
        Account { id, token }
    }

    /// The wired services, for driving them without HTTP.
    pub fn state(&self) -> web::Data<HttpState> {
        self.state.clone()
    }

    pub fn profile(&self, account: &Account) -> UserProfile {
        self.store.user(&account.id).expect("seeded user")
    }

    /// Send `req` as `caller` (or anonymously) through the full app.
    pub async fn send(&self, caller: Option<&Account>, req: actix_test::TestRequest) -> Reply {
        let app = actix_test::init_service(
            App::new()
                .app_data(self.state.clone())
                .app_data(web::JsonConfig::default().error_handler(json_error_handler))
                .wrap(Trace)
                .service(web::scope("/api").configure(configure_api)),
        )
        .await;
        let req = match caller {
            Some(account) => {
                req.insert_header((AUTHORIZATION, format!("Bearer {}", account.token)))
            }
            None => req,
        };
        let res = actix_test::call_service(&app, req.to_request()).await;
        let status = res.status();
        let bytes = actix_test::read_body(res).await;
        let body = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).expect("JSON body")
        };
        Reply { status, body }
    }

    pub async fn get(&self, caller: &Account, uri: &str) -> Reply {
        self.send(Some(caller), actix_test::TestRequest::get().uri(uri))
            .await
    }

    pub async fn post(&self, caller: &Account, uri: &str, body: Option<Value>) -> Reply {
        let req = actix_test::TestRequest::post().uri(uri);
        let req = match body {
            Some(json) => req.set_json(json),
            None => req,
        };
        self.send(Some(caller), req).await
    }

    pub async fn put(&self, caller: &Account, uri: &str, body: Option<Value>) -> Reply {
        let req = actix_test::TestRequest::put().uri(uri);
        let req = match body {
            Some(json) => req.set_json(json),
            None => req,
        };
        self.send(Some(caller), req).await
    }

    pub async fn delete(&self, caller: &Account, uri: &str) -> Reply {
        self.send(Some(caller), actix_test::TestRequest::delete().uri(uri))
            .await
    }

    /// Publish a post and return its id.
    pub async fn publish(&self, author: &Account, caption: &str) -> String {
        let reply = self
            .post(
                author,
                "/api/posts",
                Some(serde_json::json!({ "caption": caption })),
            )
            .await;
        assert_eq!(reply.status, StatusCode::CREATED, "{:?}", reply.body);
        reply.body["id"].as_str().expect("post id").to_owned()
    }
}
