use std::future::Future;
use std::sync::Arc;

use tracing::debug;

use super::middleware::{run_chain, AsyncFinalHandler, AsyncMiddleware, BoxError, MiddlewareResult};
use crate::http::context::HttpReqCtx;
use crate::http::request::HttpRequest;
use crate::http::response::HttpResponse;

/// An endpoint together with the middlewares wrapped around it.
///
/// Built once at startup, then shared (usually in an `Arc`) by every
/// request.
pub struct App {
    middlewares: Vec<Arc<dyn AsyncMiddleware<HttpReqCtx>>>,
    handler: Arc<dyn AsyncFinalHandler<HttpReqCtx>>,
}

impl App {
    pub fn new<F, Fut>(handler: F) -> Self
    where
        F: Fn(HttpReqCtx) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = MiddlewareResult<HttpReqCtx>> + Send + 'static,
    {
        Self {
            middlewares: Vec::new(),
            handler: Arc::new(handler),
        }
    }

    /// Adds a middleware inside the ones already registered.
    pub fn append_middleware<M: AsyncMiddleware<HttpReqCtx>>(&mut self, middleware: M) -> &mut Self {
        self.middlewares.push(Arc::new(middleware));
        self
    }

    pub fn middlewares(&self) -> &[Arc<dyn AsyncMiddleware<HttpReqCtx>>] {
        &self.middlewares
    }

    /// Runs `request` through the middlewares and the endpoint.
    pub async fn handle(&self, request: HttpRequest) -> Result<HttpResponse, BoxError> {
        debug!(method = %request.method, path = %request.path, "handling request");
        let ctx = HttpReqCtx::new(request);
        let ctx = run_chain(self.middlewares.clone(), self.handler.clone(), ctx).await?;
        Ok(ctx.into_response())
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::http::request::request_templates::get_request;
    use crate::http::response::response_templates::text_response;

    #[tokio::test]
    async fn handler_sets_response() {
        let app = App::new(|mut ctx: HttpReqCtx| async move {
            ctx.response = text_response(format!("path={}", ctx.path()));
            Ok::<_, BoxError>(ctx)
        });
        let response = app.handle(get_request("/x")).await.unwrap();
        assert_eq!(response.body, b"path=/x".to_vec());
    }
}
