//! Cookie-bound session management with pluggable payload stores.
//!
//! Provides:
//! - `SessionManager` - Generate ids, bind them to a cookie, persist payloads
//! - Store implementations (memory, filesystem)
//! - Payload codec (JSON)

pub mod codec;
pub mod manager;
pub mod storage;

pub use manager::{DEFAULT_COOKIE_NAME, SessionError, SessionManager};
pub use storage::{FileSystemStore, MemoryStore};
pub use websession_core::{
    CookieConfig, CookieTransport, SESSION_ID_KEY, SessionId, SessionPayload, SessionStore,
    StoreError, TransportError,
};
