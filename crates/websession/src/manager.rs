//! Session manager binding cookies to stored payloads.

use std::path::PathBuf;

use uuid::Uuid;
use websession_core::{
    CookieConfig, CookieTransport, SESSION_ID_KEY, SessionId, SessionPayload, SessionStore,
    StoreError, TransportError,
};

use crate::storage::{FileSystemStore, MemoryStore};

/// Default cookie name.
pub const DEFAULT_COOKIE_NAME: &str = "_session";

/// Session manager error.
#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    #[error("storage error: {0}")]
    Store(#[from] StoreError),
    #[error("cookie transport error: {0}")]
    Transport(#[from] TransportError),
}

/// Session manager composing a cookie transport and a payload store.
///
/// Per-session lifecycle: absent → active (`set`) → active (`get`…) →
/// absent (`del` or cookie expiry). The store is always the source of
/// truth for payload data; the cookie only attests the session id.
pub struct SessionManager<S, C>
where
    S: SessionStore,
    C: CookieTransport,
{
    store: S,
    transport: C,
    cookie_name: String,
    cookie_config: CookieConfig,
}

impl<C: CookieTransport> SessionManager<FileSystemStore, C> {
    /// Create a manager with production defaults: filesystem-backed store
    /// under `store_dir`, secure http-only cookie, browser-session lifetime.
    ///
    /// # Errors
    /// Returns error if the store directory cannot be created.
    pub async fn production(
        store_dir: impl Into<PathBuf>,
        transport: C,
    ) -> Result<Self, SessionError> {
        let store = FileSystemStore::open(store_dir).await?;
        Ok(Self::with_config(
            store,
            transport,
            DEFAULT_COOKIE_NAME,
            CookieConfig::browser_session(),
        ))
    }
}

impl<C: CookieTransport> SessionManager<MemoryStore, C> {
    /// Create a manager with test defaults: volatile in-memory store and
    /// insecure cookie flags for plain-HTTP use.
    #[must_use]
    pub fn for_testing(transport: C) -> Self {
        Self::with_config(
            MemoryStore::new(),
            transport,
            DEFAULT_COOKIE_NAME,
            CookieConfig::insecure(),
        )
    }
}

impl<S, C> SessionManager<S, C>
where
    S: SessionStore,
    C: CookieTransport,
{
    /// Create a fully custom manager.
    #[must_use]
    pub fn with_config(
        store: S,
        transport: C,
        cookie_name: impl Into<String>,
        cookie_config: CookieConfig,
    ) -> Self {
        Self {
            store,
            transport,
            cookie_name: cookie_name.into(),
            cookie_config,
        }
    }

    /// The configured cookie name.
    #[must_use]
    pub fn cookie_name(&self) -> &str {
        &self.cookie_name
    }

    /// Start a session: generate a fresh id, record it in the payload
    /// under [`SESSION_ID_KEY`], persist the payload, and bind it to the
    /// response cookie.
    ///
    /// # Errors
    /// Returns the store or transport error verbatim. If the cookie write
    /// fails after the store write, the store entry is rolled back so no
    /// half-committed session is left behind.
    pub async fn set(
        &self,
        response: &mut C::Response,
        mut payload: SessionPayload,
    ) -> Result<SessionId, SessionError> {
        let id = Uuid::new_v4();
        payload.insert(SESSION_ID_KEY, id.to_string());

        self.store.put(id, payload.clone()).await?;

        if let Err(e) =
            self.transport
                .set_value(response, &self.cookie_name, &self.cookie_config, &payload)
        {
            if let Err(del_err) = self.store.del(id).await {
                tracing::warn!(%id, "failed to roll back session after cookie error: {del_err}");
            }
            return Err(e.into());
        }

        tracing::debug!(%id, "session created");
        Ok(id)
    }

    /// Resolve the request's session payload.
    ///
    /// `Ok(None)` means "no active session" — either no cookie was sent or
    /// the store no longer holds the referenced id (e.g. a volatile
    /// backend restarted). Neither is a failure.
    ///
    /// # Errors
    /// Returns [`TransportError::Malformed`] when a cookie is present but
    /// carries no parseable session id, and store errors verbatim.
    pub async fn get(
        &self,
        request: &C::Request,
    ) -> Result<Option<SessionPayload>, SessionError> {
        let Some(values) = self.transport.get_value(request, &self.cookie_name)? else {
            return Ok(None);
        };

        let Some(raw) = values.session_id() else {
            return Err(
                TransportError::Malformed("cookie value carries no session id".into()).into(),
            );
        };
        let id = Uuid::parse_str(raw)
            .map_err(|e| TransportError::Malformed(format!("bad session id: {e}")))?;

        Ok(self.store.get(id).await?)
    }

    /// End the request's session: clear the cookie binding and delete the
    /// store entry for the referenced id, when one can be read.
    ///
    /// Safe to call with no session active; an unreadable cookie still
    /// gets cleared.
    ///
    /// # Errors
    /// Returns store errors verbatim.
    pub async fn del(
        &self,
        request: &C::Request,
        response: &mut C::Response,
    ) -> Result<(), SessionError> {
        let id = self
            .transport
            .get_value(request, &self.cookie_name)
            .ok()
            .flatten()
            .and_then(|values| values.session_id().and_then(|raw| Uuid::parse_str(raw).ok()));

        self.transport.delete(response, &self.cookie_name);

        if let Some(id) = id {
            self.store.del(id).await?;
            tracing::debug!(%id, "session deleted");
        }

        Ok(())
    }
}
