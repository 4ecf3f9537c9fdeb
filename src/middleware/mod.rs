//! Middleware pipeline wrapped around every route handler.
//!
//! The [`Router`](crate::router::Router) builds a chain of
//! [`MiddlewareHandler`]s per request, with the matched endpoint as the last
//! link. Each middleware may pass through, short-circuit, or decorate the
//! downstream response.

use std::{future::Future, pin::Pin, sync::Arc};
use tokio::time::Instant;

use crate::{Response, StatusCode, context::Context};

/// A type-erased, reference-counted middleware function.
pub type MiddlewareHandler = Arc<
    dyn Fn(Context, Next) -> Pin<Box<dyn Future<Output = Response> + Send>> + Send + Sync + 'static,
>;

/// Converts a [`Middleware`] implementation into a [`MiddlewareHandler`].
pub fn from_middleware<M>(middleware: Arc<M>) -> MiddlewareHandler
where
    M: Middleware + 'static,
{
    Arc::new(move |ctx: Context, next: Next| middleware.handle(ctx, next))
}

/// Cursor into the remaining chain for a single request.
///
/// Consumed by [`run`](Self::run), so a middleware can forward at most once.
pub struct Next {
    chain: Vec<MiddlewareHandler>,
    index: usize,
}

impl Next {
    pub fn new(chain: Vec<MiddlewareHandler>) -> Self {
        Self { chain, index: 0 }
    }

    /// Invokes the next link. An exhausted chain answers `500`, which means a
    /// chain was built without an endpoint.
    pub async fn run(mut self, ctx: Context) -> Response {
        match self.chain.get(self.index).cloned() {
            Some(handler) => {
                self.index += 1;
                handler(ctx, self).await
            }
            None => Response::text(
                StatusCode::InternalServerError,
                "No response generated by middleware pipeline",
            ),
        }
    }
}

/// Implemented by everything that wraps route handlers.
pub trait Middleware: Send + Sync {
    fn handle(&self, ctx: Context, next: Next) -> Pin<Box<dyn Future<Output = Response> + Send>>;
}

/// Logs method, path, status and duration of each request at `info`.
pub struct LoggerMiddleware;

impl Middleware for LoggerMiddleware {
    fn handle(&self, ctx: Context, next: Next) -> Pin<Box<dyn Future<Output = Response> + Send>> {
        Box::pin(async move {
            let start = Instant::now();
            let method = ctx.request().method().to_string();
            let path = ctx.request().path().to_owned();

            let response = next.run(ctx).await;

            tracing::info!(
                %method,
                %path,
                status = response.status().as_u16(),
                elapsed = ?start.elapsed(),
                "request served"
            );

            response
        })
    }
}
