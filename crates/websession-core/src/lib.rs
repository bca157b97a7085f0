//! Core abstractions for HTTP session management.
//!
//! This crate provides the fundamental building blocks:
//! - `SessionPayload` - Ordered string→string session data
//! - `SessionStore` - Trait for payload persistence backends
//! - `CookieTransport` - Trait binding a session to an HTTP cookie
//! - `CookieConfig` - Cookie flag/lifetime configuration

pub mod payload;
pub mod traits;

pub use payload::{SESSION_ID_KEY, SessionPayload};
pub use traits::{CookieConfig, CookieTransport, SessionId, SessionStore, StoreError, TransportError};
