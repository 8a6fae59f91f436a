use std::any::Any;
use std::fmt;
use std::sync::Arc;

use futures::future::BoxFuture;
use starberry_core::app::application::App;
use starberry_core::app::middleware::{AsyncMiddleware, MiddlewareResult, Next};
use starberry_core::http::context::HttpReqCtx;
use starberry_core::http::cookie::Cookie;
use starberry_core::http::meta::HeaderList;
use tracing::{debug, instrument, warn};

use crate::config::{CookiePolicy, SessionConfig, SESSION_CONTEXT_KEY};
use crate::data::SessionData;
use crate::error::{Result, SessionError};
use crate::key::{resolve_session_key, ResolvedKey};
use crate::storage::{MemorySessionStorage, SessionStorage};

/// Cookie based session middleware.
///
/// For every request it:
/// 1. reads the session key from the session cookie, or mints a new one;
/// 2. loads the session from storage and attaches it to the request
///    context under the configured context key;
/// 3. runs the rest of the chain;
/// 4. saves the session, as left in the context by the handler;
/// 5. writes the session `set-cookie` header, replacing one the handler may
///    already have set for the same cookie name.
///
/// If the handler fails (or the request is dropped while the handler runs)
/// nothing is saved and the error is passed up untouched.
#[derive(Clone)]
pub struct SessionMiddleware {
    storage: Arc<dyn SessionStorage>,
    config: Arc<SessionConfig>,
}

impl SessionMiddleware {
    pub fn new<S: SessionStorage>(storage: S, config: SessionConfig) -> Self {
        Self::with_shared_storage(Arc::new(storage), config)
    }

    pub fn with_shared_storage(storage: Arc<dyn SessionStorage>, config: SessionConfig) -> Self {
        Self {
            storage,
            config: Arc::new(config),
        }
    }

    /// A middleware backed by a fresh `MemorySessionStorage`.
    pub fn in_memory(config: SessionConfig) -> Self {
        Self::new(MemorySessionStorage::new(), config)
    }

    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    pub fn storage(&self) -> Arc<dyn SessionStorage> {
        self.storage.clone()
    }

    /// Runs one request through the session lifecycle, calling `next` once.
    #[instrument(name = "session", skip_all, fields(path = %ctx.path()))]
    pub async fn process(&self, mut ctx: HttpReqCtx, next: Next<HttpReqCtx>) -> MiddlewareResult<HttpReqCtx> {
        let config = &self.config;
        let context_key = config.context_key();

        let ResolvedKey { key, is_new } =
            resolve_session_key(ctx.get_cookies(), config.cookie_name(), config.key_policy);
        debug!(is_new, "resolved session key");

        let session = self.storage.load(key.as_str()).await?;
        ctx.locals.set(context_key, session);

        let mut ctx = next(ctx).await?;

        match ctx.locals.take::<SessionData>(context_key) {
            Some(session) => {
                debug!(entries = session.len(), "saving session");
                self.storage.save(key.as_str(), session).await?;
            }
            None => warn!(context_key, "session data was removed from the request context; not saved"),
        }

        if is_new || config.cookie_policy == CookiePolicy::Always {
            let host = ctx.get_host();
            let set_cookie = config.cookie.create_cookie(&key, host.as_deref())?;
            let replaced = merge_set_cookie(&mut ctx.response.meta.header, config.cookie_name(), set_cookie);
            debug!(replaced, "session cookie written");
        }

        Ok(ctx)
    }
}

impl fmt::Debug for SessionMiddleware {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SessionMiddleware")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

impl AsyncMiddleware<HttpReqCtx> for SessionMiddleware {
    fn as_any(&self) -> &dyn Any {
        self
    }

    fn handle(&self, ctx: HttpReqCtx, next: Next<HttpReqCtx>) -> BoxFuture<'static, MiddlewareResult<HttpReqCtx>> {
        let this = self.clone();
        Box::pin(async move { this.process(ctx, next).await })
    }
}

/// Puts `set_cookie` into `headers`: the first `set-cookie` header whose
/// cookie is named `cookie_name` is replaced in place, otherwise the header
/// is appended. Other headers, including `set-cookie` headers for other
/// cookies, are left in their original order.
///
/// Returns `true` when an existing header was replaced.
pub fn merge_set_cookie(headers: &mut HeaderList, cookie_name: &str, set_cookie: String) -> bool {
    headers.upsert_by(
        |name, value| name == "set-cookie" && Cookie::parse_set_cookie(value).0 == cookie_name,
        "set-cookie",
        set_cookie,
    )
}

/// Installs a `SessionMiddleware` on `app`, inside any middleware already
/// registered.
pub fn add_session_middleware<S: SessionStorage>(app: &mut App, storage: S, config: SessionConfig) -> &mut App {
    app.append_middleware(SessionMiddleware::new(storage, config))
}

/// The session attached by a `SessionMiddleware` using the default context
/// key.
///
/// Fails with `SessionError::NotInContext` for a request the middleware did
/// not process.
pub fn session_data(ctx: &mut HttpReqCtx) -> Result<&mut SessionData> {
    session_data_at(ctx, SESSION_CONTEXT_KEY)
}

/// Like `session_data`, for a middleware configured with its own context key.
pub fn session_data_at<'a>(ctx: &'a mut HttpReqCtx, context_key: &str) -> Result<&'a mut SessionData> {
    ctx.locals
        .get_mut::<SessionData>(context_key)
        .ok_or_else(|| SessionError::NotInContext(context_key.to_string()))
}

#[cfg(test)]
mod test {
    use super::*;
    use starberry_core::http::request::request_templates::get_request;

    const NAME: &str = "bareASGI-session";

    fn headers(pairs: &[(&str, &str)]) -> HeaderList {
        pairs.iter().copied().collect()
    }

    #[test]
    fn merge_replaces_session_cookie_in_place() {
        let mut h = headers(&[
            ("content-type", "text/plain"),
            ("set-cookie", "theme=dark; Path=/"),
            ("set-cookie", "bareASGI-session=; Max-Age=0"),
            ("x-request-id", "1"),
        ]);
        let replaced = merge_set_cookie(&mut h, NAME, "bareASGI-session=abc".to_string());
        assert!(replaced);
        assert_eq!(
            h.iter().collect::<Vec<_>>(),
            vec![
                ("content-type", "text/plain"),
                ("set-cookie", "theme=dark; Path=/"),
                ("set-cookie", "bareASGI-session=abc"),
                ("x-request-id", "1"),
            ]
        );
    }

    #[test]
    fn merge_appends_when_absent() {
        let mut h = headers(&[("set-cookie", "theme=dark"), ("set-cookie", "lang=en")]);
        assert!(!merge_set_cookie(&mut h, NAME, "bareASGI-session=abc".to_string()));
        assert_eq!(h.get_all("set-cookie"), vec!["theme=dark", "lang=en", "bareASGI-session=abc"]);
    }

    #[test]
    fn merge_matches_on_cookie_name_not_prefix() {
        let mut h = headers(&[("set-cookie", "bareASGI-session-old=x")]);
        assert!(!merge_set_cookie(&mut h, NAME, "bareASGI-session=abc".to_string()));
        assert_eq!(h.len(), 2);
    }

    #[test]
    fn merge_ignores_other_headers_with_matching_text() {
        let mut h = headers(&[("x-note", "bareASGI-session=zzz")]);
        assert!(!merge_set_cookie(&mut h, NAME, "bareASGI-session=abc".to_string()));
        assert_eq!(h.get("x-note"), Some("bareASGI-session=zzz"));
    }

    #[test]
    fn session_data_outside_middleware_fails() {
        let mut ctx = HttpReqCtx::new(get_request("/"));
        match session_data(&mut ctx) {
            Err(SessionError::NotInContext(key)) => assert_eq!(key, SESSION_CONTEXT_KEY),
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn session_data_at_custom_key() {
        let mut ctx = HttpReqCtx::new(get_request("/"));
        ctx.locals.set("custom", SessionData::new());
        session_data_at(&mut ctx, "custom").unwrap().insert("a", 1);
        assert_eq!(ctx.locals.get::<SessionData>("custom").unwrap().len(), 1);
        assert!(session_data(&mut ctx).is_err());
    }

    #[test]
    fn debug_shows_config() {
        let middleware = SessionMiddleware::in_memory(SessionConfig::new().with_cookie_name("sid"));
        assert!(format!("{:?}", middleware).contains("sid"));
    }
}
