//! Example login server backed by websession.
//!
//! Run with: cargo run -p web-server-demo
//!
//! Then:
//!   curl -c jar -X POST 'http://localhost:3000/login?user=alice'
//!   curl -b jar 'http://localhost:3000/me'
//!   curl -b jar -c jar -X POST 'http://localhost:3000/logout'

use std::{collections::HashMap, net::SocketAddr, sync::Arc};

use axum::{
    Router,
    extract::{Query, State},
    http::{HeaderMap, HeaderValue, StatusCode, header},
    response::IntoResponse,
    routing::{get, post},
};
use base64::{Engine as _, engine::general_purpose::STANDARD as BASE64};
use cookie::Cookie;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use websession::{DEFAULT_COOKIE_NAME, MemoryStore, SessionManager};
use websession_core::{CookieConfig, CookieTransport, SessionPayload, TransportError};

/// Cookie transport carrying the payload as base64-encoded JSON in plain
/// header maps.
///
/// Unsigned and unencrypted: demo only. A real deployment supplies a
/// signing cookie manager behind the same trait.
struct PlainCookieTransport;

impl CookieTransport for PlainCookieTransport {
    type Request = HeaderMap;
    type Response = HeaderMap;

    fn set_value(
        &self,
        response: &mut HeaderMap,
        name: &str,
        config: &CookieConfig,
        values: &SessionPayload,
    ) -> Result<(), TransportError> {
        let json =
            serde_json::to_vec(values).map_err(|e| TransportError::Rejected(e.to_string()))?;

        let mut cookie = Cookie::new(name.to_owned(), BASE64.encode(json));
        cookie.set_path("/");
        cookie.set_http_only(config.http_only);
        cookie.set_secure(config.secure);
        if config.max_age_secs > 0 {
            cookie.set_max_age(cookie::time::Duration::seconds(i64::from(config.max_age_secs)));
        }

        let value = HeaderValue::from_str(&cookie.to_string())
            .map_err(|e| TransportError::Rejected(e.to_string()))?;
        response.append(header::SET_COOKIE, value);

        Ok(())
    }

    fn get_value(
        &self,
        request: &HeaderMap,
        name: &str,
    ) -> Result<Option<SessionPayload>, TransportError> {
        let Some(header_value) = request.get(header::COOKIE) else {
            return Ok(None);
        };
        let raw = header_value
            .to_str()
            .map_err(|e| TransportError::Malformed(e.to_string()))?;

        for parsed in Cookie::split_parse(raw.to_owned()) {
            let cookie = parsed.map_err(|e| TransportError::Malformed(e.to_string()))?;
            if cookie.name() == name {
                let bytes = BASE64
                    .decode(cookie.value())
                    .map_err(|e| TransportError::Malformed(e.to_string()))?;
                let values = serde_json::from_slice(&bytes)
                    .map_err(|e| TransportError::Malformed(e.to_string()))?;
                return Ok(Some(values));
            }
        }

        Ok(None)
    }

    fn delete(&self, response: &mut HeaderMap, name: &str) {
        let mut cookie = Cookie::new(name.to_owned(), "");
        cookie.set_path("/");
        cookie.set_max_age(cookie::time::Duration::ZERO);

        if let Ok(value) = HeaderValue::from_str(&cookie.to_string()) {
            response.append(header::SET_COOKIE, value);
        }
    }
}

/// Application state shared across handlers.
#[derive(Clone)]
struct AppState {
    sessions: Arc<SessionManager<MemoryStore, PlainCookieTransport>>,
}

#[tokio::main]
async fn main() {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer())
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .init();

    // Insecure cookie flags: this demo serves plain HTTP on localhost.
    let state = AppState {
        sessions: Arc::new(SessionManager::with_config(
            MemoryStore::new(),
            PlainCookieTransport,
            DEFAULT_COOKIE_NAME,
            CookieConfig::insecure(),
        )),
    };

    // Build router
    let app = Router::new()
        .route("/", get(index_handler))
        .route("/login", post(login_handler))
        .route("/me", get(me_handler))
        .route("/logout", post(logout_handler))
        .with_state(state);

    // Start server
    let addr = SocketAddr::from(([127, 0, 0, 1], 3000));
    tracing::info!("Server listening on http://{addr}");

    let listener = tokio::net::TcpListener::bind(addr).await.unwrap();
    axum::serve(listener, app).await.unwrap();
}

async fn index_handler() -> &'static str {
    "POST /login?user=<name>  start a session\n\
     GET  /me                 show the current session\n\
     POST /logout             end the session\n"
}

async fn login_handler(
    State(state): State<AppState>,
    Query(params): Query<HashMap<String, String>>,
) -> impl IntoResponse {
    let user = params
        .get("user")
        .cloned()
        .unwrap_or_else(|| "anonymous".to_owned());

    let mut payload = SessionPayload::new();
    payload.insert("user", user.clone());

    let mut headers = HeaderMap::new();
    match state.sessions.set(&mut headers, payload).await {
        Ok(id) => (headers, format!("logged in as {user}, session {id}\n")).into_response(),
        Err(e) => {
            tracing::error!("failed to start session: {e}");
            (StatusCode::INTERNAL_SERVER_ERROR, "session error\n").into_response()
        }
    }
}

async fn me_handler(State(state): State<AppState>, request_headers: HeaderMap) -> impl IntoResponse {
    match state.sessions.get(&request_headers).await {
        Ok(Some(payload)) => {
            let user = payload.get("user").unwrap_or("unknown");
            format!("logged in as {user}\n").into_response()
        }
        Ok(None) => (StatusCode::UNAUTHORIZED, "no session\n").into_response(),
        Err(e) => {
            tracing::error!("failed to resolve session: {e}");
            (StatusCode::INTERNAL_SERVER_ERROR, "session error\n").into_response()
        }
    }
}

async fn logout_handler(
    State(state): State<AppState>,
    request_headers: HeaderMap,
) -> impl IntoResponse {
    let mut headers = HeaderMap::new();
    match state.sessions.del(&request_headers, &mut headers).await {
        Ok(()) => (headers, "logged out\n").into_response(),
        Err(e) => {
            tracing::error!("failed to end session: {e}");
            (StatusCode::INTERNAL_SERVER_ERROR, "session error\n").into_response()
        }
    }
}
