#![allow(dead_code)]
use async_trait::async_trait;
use axum::{
    body::Body,
    http::{header::CONTENT_TYPE, Method, Request, StatusCode},
    Router,
};
use chrono::{TimeZone, Utc};
use http_body_util::BodyExt;
use legitidevs_backend::{
    app::build_router,
    config::Config,
    models::world::{UserContent, World},
    repositories::{InMemoryProfileAuthStore, InMemoryWorldStore},
    services::{IdentityProvider, IdentityProviderError},
    state::AppState,
    types::{ProfileId, WorldId},
    utils::time::ManualClock,
};
use serde_json::Value;
use std::{collections::HashMap, sync::Arc};
use tower::ServiceExt;

pub const OWNER_SHORT: &str = "11111111111111111111111111111111";
pub const OWNER: &str = "11111111-1111-1111-1111-111111111111";
pub const OTHER: &str = "22222222-2222-2222-2222-222222222222";

pub const OWNER_ACCESS: &str = "owner-access";
pub const OTHER_ACCESS: &str = "other-access";
/// Makes `StaticIdentityProvider` behave as if the provider were down.
pub const UNAVAILABLE_ACCESS: &str = "provider-down";

/// Identity provider with a fixed token table.
pub struct StaticIdentityProvider {
    profiles: HashMap<String, ProfileId>,
}

impl StaticIdentityProvider {
    pub fn new() -> Self {
        let mut profiles = HashMap::new();
        profiles.insert(OWNER_ACCESS.to_string(), profile(OWNER_SHORT));
        profiles.insert(OTHER_ACCESS.to_string(), profile(OTHER));
        Self { profiles }
    }
}

#[async_trait]
impl IdentityProvider for StaticIdentityProvider {
    async fn resolve_profile(
        &self,
        access_token: &str,
    ) -> Result<ProfileId, IdentityProviderError> {
        if access_token == UNAVAILABLE_ACCESS {
            return Err(IdentityProviderError::Unavailable("timed out".to_string()));
        }
        self.profiles
            .get(access_token)
            .copied()
            .ok_or_else(|| IdentityProviderError::Rejected("Unauthorized".to_string()))
    }
}

pub fn profile(raw: &str) -> ProfileId {
    ProfileId::parse(raw).expect("valid profile id")
}

pub fn test_config() -> Config {
    Config {
        database_url: None,
        identity_provider_url: "http://127.0.0.1:9/profile".to_string(),
        ..Config::default()
    }
}

pub struct TestApp {
    pub router: Router,
    pub state: AppState,
    pub clock: Arc<ManualClock>,
    pub profile_auth: Arc<InMemoryProfileAuthStore>,
    pub worlds: Arc<InMemoryWorldStore>,
}

impl TestApp {
    pub fn new() -> Self {
        Self::with_config(test_config())
    }

    pub fn with_config(config: Config) -> Self {
        let clock = Arc::new(ManualClock::new(
            Utc.with_ymd_and_hms(2024, 6, 1, 12, 0, 0)
                .single()
                .expect("valid start time"),
        ));
        let profile_auth = Arc::new(InMemoryProfileAuthStore::new());
        let worlds = Arc::new(InMemoryWorldStore::new());
        let state = AppState::new(
            config,
            profile_auth.clone(),
            worlds.clone(),
            Arc::new(StaticIdentityProvider::new()),
            clock.clone(),
        );
        Self {
            router: build_router(state.clone()),
            state,
            clock,
            profile_auth,
            worlds,
        }
    }

    pub async fn send(&self, request: Request<Body>) -> (StatusCode, Value) {
        let response = self
            .router
            .clone()
            .oneshot(request)
            .await
            .expect("router response");
        let status = response.status();
        let bytes = response
            .into_body()
            .collect()
            .await
            .expect("read body")
            .to_bytes();
        let json = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap_or(Value::Null)
        };
        (status, json)
    }

    /// Logs in through the API and returns `(session_token, refresh_token)`.
    pub async fn login(&self, access_token: &str) -> (String, String) {
        let (status, body) = self
            .send(json_request(
                Method::POST,
                "/login",
                &[],
                serde_json::json!({ "access_token": access_token }),
            ))
            .await;
        assert_eq!(status, StatusCode::OK, "login failed: {body}");
        (
            body["sessionToken"].as_str().expect("sessionToken").to_string(),
            body["refreshToken"].as_str().expect("refreshToken").to_string(),
        )
    }

    pub fn seed_world(&self, owner_uuid: &str, unlisted: bool) -> World {
        let world = sample_world(owner_uuid, unlisted);
        self.worlds.insert_world(world.clone());
        world
    }
}

pub fn sample_world(owner_uuid: &str, unlisted: bool) -> World {
    World {
        world_uuid: WorldId::new(),
        owner_uuid: owner_uuid.to_string(),
        name: "Skyblock".to_string(),
        raw_name: "{\"text\":\"Skyblock\"}".to_string(),
        description: "A floating island".to_string(),
        raw_description: "{\"text\":\"A floating island\"}".to_string(),
        version: "1.21.4".to_string(),
        locked: false,
        player_count: 3,
        visits: 120,
        votes: 7,
        creation_date_unix_seconds: 1_700_000_000,
        last_scraped: 1_717_000_000,
        legitidevs: UserContent {
            description: None,
            unlisted,
        },
    }
}

pub fn json_request(
    method: Method,
    uri: &str,
    headers: &[(&str, &str)],
    body: Value,
) -> Request<Body> {
    let mut builder = Request::builder()
        .method(method)
        .uri(uri)
        .header(CONTENT_TYPE, "application/json");
    for (name, value) in headers {
        builder = builder.header(*name, *value);
    }
    builder
        .body(Body::from(body.to_string()))
        .expect("build request")
}

pub fn get_request(uri: &str) -> Request<Body> {
    Request::builder()
        .uri(uri)
        .body(Body::empty())
        .expect("build request")
}

/// A well-formed token that was never issued.
pub fn unknown_token() -> String {
    "ab".repeat(32)
}
