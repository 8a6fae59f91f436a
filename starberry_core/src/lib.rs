//! Minimal host contract for Starberry middlewares: request and response
//! types with ordered headers, cookies, the per-request context and the
//! async middleware chain.

pub mod app;
pub mod extensions;
pub mod http;

pub use app::application::App;
pub use app::middleware::{AsyncFinalHandler, AsyncMiddleware, BoxError, MiddlewareResult, Next};
pub use http::context::HttpReqCtx;
