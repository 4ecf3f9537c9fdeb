//! Request routing — map exact paths and methods to handlers.
//!
//! The console serves a handful of fixed paths, so routes match literally
//! (a trailing slash is ignored). A path that exists under another method
//! answers `405 Method Not Allowed` with an `Allow` header; anything else
//! answers `404 Not Found`. Both fallbacks still pass through the middleware
//! chain so they are logged like any other request.

use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

use crate::console::QueryConsole;
use crate::context::Context;
use crate::middleware::{MiddlewareHandler, Next};
use crate::{Method, Request, Response, StatusCode};

type ResponseFuture = Pin<Box<dyn Future<Output = Response> + Send>>;

/// Type-erased async route handler.
pub type Handler = Arc<dyn Fn(Context) -> ResponseFuture + Send + Sync + 'static>;

/// Conversion trait for async handler functions.
///
/// Any `Fn(Context) -> impl Future<Output = Response> + Send` that is also
/// `Send + Sync + 'static` implements this trait through the blanket impl.
pub trait IntoHandler: Send + Sync + 'static {
    fn call(&self, ctx: Context) -> ResponseFuture;
}

impl<T, F> IntoHandler for T
where
    T: Fn(Context) -> F + Send + Sync + 'static,
    F: Future<Output = Response> + Send + 'static,
{
    fn call(&self, ctx: Context) -> ResponseFuture {
        Box::pin((self)(ctx))
    }
}

struct Route {
    method: Method,
    path: String,
    handler: Handler,
}

enum Resolution<'a> {
    Matched(&'a Handler),
    MethodNotAllowed(Vec<&'a str>),
    NotFound,
}

/// Dispatches requests to handlers, wrapping each in the registered middleware.
///
/// # Examples
///
/// ```rust,no_run
/// use std::sync::Arc;
/// use query_console::config::{ConsoleConfig, parse_endpoint};
/// use query_console::console::QueryConsole;
/// use query_console::router::Router;
/// use query_console::{Response, StatusCode};
///
/// let config = ConsoleConfig::new(parse_endpoint("http://localhost:5000/query").unwrap());
/// let mut router = Router::new(Arc::new(QueryConsole::new(config).unwrap()));
/// router.get("/healthz", |_ctx| async { Response::text(StatusCode::Ok, "ok") });
/// assert_eq!(router.len(), 1);
/// ```
pub struct Router {
    routes: Vec<Route>,
    middlewares: Vec<MiddlewareHandler>,
    console: Arc<QueryConsole>,
}

impl Router {
    pub fn new(console: Arc<QueryConsole>) -> Self {
        Self {
            routes: Vec::new(),
            middlewares: Vec::new(),
            console,
        }
    }

    pub fn get(&mut self, path: &str, handler: impl IntoHandler) {
        self.add_route(Method::Get, path, handler);
    }

    pub fn post(&mut self, path: &str, handler: impl IntoHandler) {
        self.add_route(Method::Post, path, handler);
    }

    /// Appends a middleware. Middleware runs in registration order, outermost first.
    pub fn layer(&mut self, middleware: MiddlewareHandler) {
        self.middlewares.push(middleware);
    }

    fn add_route(&mut self, method: Method, path: &str, handler: impl IntoHandler) {
        let handler: Handler = Arc::new(move |ctx| handler.call(ctx));
        self.routes.push(Route {
            method,
            path: normalize(path).to_owned(),
            handler,
        });
    }

    pub fn len(&self) -> usize {
        self.routes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.routes.is_empty()
    }

    fn resolve(&self, method: &Method, path: &str) -> Resolution<'_> {
        let path = normalize(path);
        let mut allowed = Vec::new();

        for route in self.routes.iter().filter(|route| route.path == path) {
            if &route.method == method {
                return Resolution::Matched(&route.handler);
            }
            allowed.push(route.method.as_str());
        }

        if allowed.is_empty() {
            Resolution::NotFound
        } else {
            Resolution::MethodNotAllowed(allowed)
        }
    }

    /// Dispatches `request` through the middleware chain to the first matching route.
    pub async fn route(&self, request: Request) -> Response {
        let handler = match self.resolve(request.method(), request.path()) {
            Resolution::Matched(handler) => Arc::clone(handler),
            Resolution::MethodNotAllowed(allowed) => method_not_allowed(allowed.join(", ")),
            Resolution::NotFound => not_found(),
        };

        let mut chain = self.middlewares.clone();
        chain.push(Arc::new(
            move |ctx: Context, _next: Next| -> ResponseFuture { handler(ctx) },
        ));

        Next::new(chain)
            .run(Context::new(request, Arc::clone(&self.console)))
            .await
    }
}

fn normalize(path: &str) -> &str {
    if path != "/" && path.ends_with('/') {
        &path[..path.len() - 1]
    } else {
        path
    }
}

fn method_not_allowed(allow: String) -> Handler {
    Arc::new(move |_ctx: Context| -> ResponseFuture {
        let allow = allow.clone();
        Box::pin(async move {
            Response::text(StatusCode::MethodNotAllowed, "Method Not Allowed").header("Allow", allow)
        })
    })
}

fn not_found() -> Handler {
    Arc::new(|_ctx: Context| -> ResponseFuture {
        Box::pin(async { Response::text(StatusCode::NotFound, "Not Found") })
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{ConsoleConfig, parse_endpoint};

    fn router() -> Router {
        let config = ConsoleConfig::new(parse_endpoint("http://localhost:5000/query").unwrap());
        Router::new(Arc::new(QueryConsole::new(config).unwrap()))
    }

    fn make_request(method: &str, path: &str) -> Request {
        let raw = format!("{method} {path} HTTP/1.1\r\nHost: localhost\r\n\r\n");
        let (req, _) = Request::parse(raw.as_bytes()).unwrap();
        req
    }

    #[test]
    fn normalize_strips_trailing_slash() {
        assert_eq!(normalize("/"), "/");
        assert_eq!(normalize("/query/"), "/query");
        assert_eq!(normalize("/query"), "/query");
    }

    #[test]
    fn starts_empty() {
        let router = router();
        assert!(router.is_empty());
        assert_eq!(router.len(), 0);
    }

    #[tokio::test]
    async fn empty_router_returns_404() {
        let res = router().route(make_request("GET", "/")).await;
        assert_eq!(res.status(), StatusCode::NotFound);
    }

    #[tokio::test]
    async fn get_and_post_dispatch() {
        let mut router = router();
        router.get("/", |_ctx| async { Response::new(StatusCode::Ok) });
        router.post("/query", |_ctx| async { Response::new(StatusCode::NoContent) });
        assert_eq!(router.len(), 2);

        assert_eq!(
            router.route(make_request("GET", "/")).await.status(),
            StatusCode::Ok
        );
        assert_eq!(
            router.route(make_request("POST", "/query/")).await.status(),
            StatusCode::NoContent
        );
    }

    #[tokio::test]
    async fn wrong_method_is_405_with_allow() {
        let mut router = router();
        router.post("/query", |_ctx| async { Response::new(StatusCode::Ok) });
        let res = router.route(make_request("GET", "/query")).await;
        assert_eq!(res.status(), StatusCode::MethodNotAllowed);
        assert_eq!(res.headers().get("allow"), Some("POST"));
    }

    #[tokio::test]
    async fn unknown_path_is_404() {
        let mut router = router();
        router.get("/", |_ctx| async { Response::new(StatusCode::Ok) });
        let res = router.route(make_request("GET", "/admin")).await;
        assert_eq!(res.status(), StatusCode::NotFound);
    }

    #[tokio::test]
    async fn first_matching_route_wins() {
        let mut router = router();
        router.get("/", |_ctx| async { Response::new(StatusCode::Ok) });
        router.get("/", |_ctx| async { Response::new(StatusCode::NoContent) });
        let res = router.route(make_request("GET", "/")).await;
        assert_eq!(res.status(), StatusCode::Ok);
    }

    #[tokio::test]
    async fn handler_sees_console() {
        let mut router = router();
        router.get("/", |ctx: Context| async move {
            Response::text(StatusCode::Ok, ctx.console().config().default_query.clone())
        });
        let res = router.route(make_request("GET", "/")).await;
        assert_eq!(res.body_text(), "SELECT * FROM artists LIMIT 5");
    }

    #[tokio::test]
    async fn middleware_wraps_fallbacks() {
        let mut router = router();
        router.layer(Arc::new(
            |ctx: Context, next: Next| -> ResponseFuture {
                Box::pin(async move {
                    let mut res = next.run(ctx).await;
                    res.add_header("X-Wrapped", "yes");
                    res
                })
            },
        ));
        let res = router.route(make_request("GET", "/missing")).await;
        assert_eq!(res.status(), StatusCode::NotFound);
        assert_eq!(res.headers().get("x-wrapped"), Some("yes"));
    }
}
