use futures::future::BoxFuture;
use std::any::Any;
use std::future::Future;
use std::sync::Arc;

/// Error type travelling through the middleware chain. Middlewares pass
/// errors from further down the chain back up without rewrapping them, so
/// callers can still downcast to the concrete error.
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

pub type MiddlewareResult<R> = Result<R, BoxError>;

/// The rest of the chain, handed to each middleware.
pub type Next<R> = Box<dyn Fn(R) -> BoxFuture<'static, MiddlewareResult<R>> + Send + Sync + 'static>;

pub trait AsyncMiddleware<R>: Send + Sync + 'static {
    fn as_any(&self) -> &dyn Any;

    /// Processes `rc`, calling `next` at most once to continue the chain.
    fn handle(&self, rc: R, next: Next<R>) -> BoxFuture<'static, MiddlewareResult<R>>;
}

/// The endpoint at the end of a middleware chain.
pub trait AsyncFinalHandler<R>: Send + Sync + 'static {
    fn handle(&self, rc: R) -> BoxFuture<'static, MiddlewareResult<R>>;
}

impl<R, F, Fut> AsyncFinalHandler<R> for F
where
    F: Fn(R) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = MiddlewareResult<R>> + Send + 'static,
{
    fn handle(&self, rc: R) -> BoxFuture<'static, MiddlewareResult<R>> {
        Box::pin(self(rc))
    }
}

/// Runs `rc` through `middlewares` in order and then through `handler`.
///
/// The first middleware in the list is the outermost one: it sees the
/// request first and the response last.
pub async fn run_chain<R: Send + 'static>(
    middlewares: Vec<Arc<dyn AsyncMiddleware<R>>>,
    handler: Arc<dyn AsyncFinalHandler<R>>,
    rc: R,
) -> MiddlewareResult<R> {
    let mut next: Next<R> = Box::new(move |rc| handler.handle(rc));
    for middleware in middlewares.into_iter().rev() {
        let inner = Arc::new(next);
        next = Box::new(move |rc| {
            let inner = inner.clone();
            middleware.handle(rc, Box::new(move |rc| (**inner)(rc)))
        });
    }
    next(rc).await
}

#[cfg(test)]
mod test {
    use super::*;
    use std::sync::Mutex;

    struct Trace {
        name: &'static str,
        log: Arc<Mutex<Vec<String>>>,
    }

    impl AsyncMiddleware<Vec<String>> for Trace {
        fn as_any(&self) -> &dyn Any {
            self
        }

        fn handle(
            &self,
            mut rc: Vec<String>,
            next: Next<Vec<String>>,
        ) -> BoxFuture<'static, MiddlewareResult<Vec<String>>> {
            let name = self.name;
            let log = self.log.clone();
            Box::pin(async move {
                log.lock().unwrap().push(format!("{} in", name));
                rc.push(name.to_string());
                let rc = next(rc).await?;
                log.lock().unwrap().push(format!("{} out", name));
                Ok(rc)
            })
        }
    }

    fn chain(log: &Arc<Mutex<Vec<String>>>) -> Vec<Arc<dyn AsyncMiddleware<Vec<String>>>> {
        vec![
            Arc::new(Trace { name: "outer", log: log.clone() }),
            Arc::new(Trace { name: "inner", log: log.clone() }),
        ]
    }

    #[tokio::test]
    async fn middlewares_wrap_handler_in_order() {
        let log = Arc::new(Mutex::new(Vec::new()));
        let handler: Arc<dyn AsyncFinalHandler<Vec<String>>> = Arc::new(|mut rc: Vec<String>| async move {
            rc.push("handler".to_string());
            Ok::<_, BoxError>(rc)
        });
        let rc = run_chain(chain(&log), handler, Vec::new()).await.unwrap();
        assert_eq!(rc, vec!["outer", "inner", "handler"]);
        assert_eq!(
            *log.lock().unwrap(),
            vec!["outer in", "inner in", "inner out", "outer out"]
        );
    }

    #[tokio::test]
    async fn handler_error_unwinds_chain() {
        let log = Arc::new(Mutex::new(Vec::new()));
        let handler: Arc<dyn AsyncFinalHandler<Vec<String>>> =
            Arc::new(|_rc: Vec<String>| async move { Err::<Vec<String>, BoxError>("boom".into()) });
        let err = run_chain(chain(&log), handler, Vec::new()).await.unwrap_err();
        assert_eq!(err.to_string(), "boom");
        assert_eq!(*log.lock().unwrap(), vec!["outer in", "inner in"]);
    }

    #[tokio::test]
    async fn empty_chain_runs_handler() {
        let handler: Arc<dyn AsyncFinalHandler<u32>> = Arc::new(|rc: u32| async move { Ok::<_, BoxError>(rc + 1) });
        assert_eq!(run_chain(Vec::new(), handler, 1).await.unwrap(), 2);
    }
}
