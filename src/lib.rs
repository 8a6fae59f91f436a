//! Cookie based HTTP sessions for Starberry.
//!
//! `SessionMiddleware` gives every request a session keyed by an opaque
//! token in a cookie (`bareASGI-session` by default). The session state is a
//! `SessionData` map attached to the request context, loaded from and saved
//! to a pluggable `SessionStorage` backend.
//!
//! ```rust
//! use starberry_core::{App, BoxError, HttpReqCtx};
//! use starberry_core::http::response::response_templates::text_response;
//! use starberry_session::{add_session_middleware, session_data, MemorySessionStorage, SessionConfig};
//!
//! let mut app = App::new(|mut ctx: HttpReqCtx| async move {
//!     let session = session_data(&mut ctx)?;
//!     let visits = session.get("visits").and_then(|v| v.as_i64()).unwrap_or(0) + 1;
//!     session.insert("visits", visits);
//!     ctx.response = text_response(format!("visit {}", visits));
//!     Ok::<_, BoxError>(ctx)
//! });
//! add_session_middleware(&mut app, MemorySessionStorage::new(), SessionConfig::new());
//! ```

pub mod config;
pub mod cookie;
pub mod data;
pub mod error;
pub mod key;
pub mod middleware;
pub mod storage;

pub use config::{CookiePolicy, SessionConfig, SESSION_CONTEXT_KEY};
pub use cookie::{CookieAttributes, SESSION_COOKIE_NAME};
pub use data::SessionData;
pub use error::{Result, SessionError};
pub use key::{KeyPolicy, SessionKey};
pub use middleware::{add_session_middleware, session_data, session_data_at, SessionMiddleware};
pub use storage::{MemorySessionStorage, SessionStorage};
