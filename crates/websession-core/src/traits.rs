//! Core traits for session storage and cookie transport.

use std::sync::Arc;

use async_trait::async_trait;
use thiserror::Error;
use uuid::Uuid;

use crate::SessionPayload;

/// Session identifier.
pub type SessionId = Uuid;

/// Storage error.
///
/// "Key absent" is not an error: [`SessionStore::get`] reports it as
/// `Ok(None)`.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("corrupt session record: {0}")]
    Decode(String),
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("storage error: {0}")]
    Internal(String),
}

/// Trait for session payload persistence backends.
#[async_trait]
pub trait SessionStore: Send + Sync {
    /// Store a payload under an id, replacing any existing payload.
    async fn put(&self, id: SessionId, payload: SessionPayload) -> Result<(), StoreError>;

    /// Look up the payload for an id. Unknown ids yield `Ok(None)`.
    async fn get(&self, id: SessionId) -> Result<Option<SessionPayload>, StoreError>;

    /// Remove the payload for an id. Removing an absent id is a no-op.
    async fn del(&self, id: SessionId) -> Result<(), StoreError>;
}

#[async_trait]
impl<T: SessionStore + ?Sized> SessionStore for Arc<T> {
    async fn put(&self, id: SessionId, payload: SessionPayload) -> Result<(), StoreError> {
        (**self).put(id, payload).await
    }

    async fn get(&self, id: SessionId) -> Result<Option<SessionPayload>, StoreError> {
        (**self).get(id).await
    }

    async fn del(&self, id: SessionId) -> Result<(), StoreError> {
        (**self).del(id).await
    }
}

/// Cookie flag and lifetime configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CookieConfig {
    /// Only send the cookie over HTTPS.
    pub secure: bool,
    /// Hide the cookie from client-side scripts.
    pub http_only: bool,
    /// Lifetime in seconds; 0 means the session ends when the browser closes.
    pub max_age_secs: u32,
}

impl CookieConfig {
    /// Production flags: secure, http-only, browser-session lifetime.
    #[must_use]
    pub const fn browser_session() -> Self {
        Self {
            secure: true,
            http_only: true,
            max_age_secs: 0,
        }
    }

    /// Insecure flags for local HTTP testing.
    #[must_use]
    pub const fn insecure() -> Self {
        Self {
            secure: false,
            http_only: false,
            max_age_secs: 0,
        }
    }
}

impl Default for CookieConfig {
    fn default() -> Self {
        Self::browser_session()
    }
}

/// Cookie transport error.
#[derive(Debug, Error)]
pub enum TransportError {
    #[error("cookie value is malformed: {0}")]
    Malformed(String),
    #[error("cookie transport rejected the operation: {0}")]
    Rejected(String),
}

/// Trait for binding session values to an HTTP cookie.
///
/// The transport owns signing, encryption, and the cookie's wire encoding.
/// The HTTP request and response objects stay opaque to this crate via the
/// associated types.
pub trait CookieTransport: Send + Sync {
    /// Inbound carrier the cookie is read from.
    type Request;
    /// Outbound carrier the cookie is written to.
    type Response;

    /// Bind `values` to the named cookie on the response.
    fn set_value(
        &self,
        response: &mut Self::Response,
        name: &str,
        config: &CookieConfig,
        values: &SessionPayload,
    ) -> Result<(), TransportError>;

    /// Read the named cookie's values from the request.
    ///
    /// An absent cookie is `Ok(None)`; a present but undecodable cookie is
    /// an error.
    fn get_value(
        &self,
        request: &Self::Request,
        name: &str,
    ) -> Result<Option<SessionPayload>, TransportError>;

    /// Clear the named cookie binding on the response.
    fn delete(&self, response: &mut Self::Response, name: &str);
}
