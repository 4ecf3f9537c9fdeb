//! Routes of the console and the serve loop that ties them to a [`Server`].
//!
//! | Route          | Handler                                        |
//! |----------------|------------------------------------------------|
//! | `GET /`        | idle console                                   |
//! | `POST /query`  | submit the `query` form field, show the outcome |
//! | `GET /healthz` | liveness probe                                 |

use std::future::Future;
use std::sync::Arc;

use tracing::{info, warn};

use crate::config::ConsoleConfig;
use crate::console::QueryConsole;
use crate::context::Context;
use crate::error::ConsoleError;
use crate::middleware::{LoggerMiddleware, from_middleware};
use crate::router::Router;
use crate::server::Server;
use crate::{Response, StatusCode};

/// Builds the console's router with request logging.
pub fn router(console: Arc<QueryConsole>) -> Router {
    let mut router = Router::new(console);
    router.layer(from_middleware(Arc::new(LoggerMiddleware)));
    router.get("/", index);
    router.post("/query", submit);
    router.get("/healthz", healthz);
    router
}

/// Binds `config.bind` and serves the console until `shutdown` resolves.
///
/// # Errors
///
/// [`ConsoleError`] if the HTTP client cannot be built or the address cannot
/// be bound.
pub async fn serve<S>(config: ConsoleConfig, shutdown: S) -> Result<(), ConsoleError>
where
    S: Future<Output = ()>,
{
    let server = Server::bind(&config.bind).await?;
    serve_on(server, config, shutdown).await
}

/// Like [`serve`], on an already bound server (tests bind port `0`).
pub async fn serve_on<S>(
    server: Server,
    config: ConsoleConfig,
    shutdown: S,
) -> Result<(), ConsoleError>
where
    S: Future<Output = ()>,
{
    info!(
        address = %server.local_addr(),
        endpoint = %config.endpoint,
        schema_panel = config.show_schema,
        "starting query console"
    );

    let router = Arc::new(router(Arc::new(QueryConsole::new(config)?)));
    server
        .run_until(
            move |request| {
                let router = Arc::clone(&router);
                async move { router.route(request).await }
            },
            shutdown,
        )
        .await?;
    Ok(())
}

async fn index(ctx: Context) -> Response {
    let console = ctx.console();
    Response::html(StatusCode::Ok, console.render(&console.idle()))
}

async fn submit(ctx: Context) -> Response {
    let Some(form) = ctx.form() else {
        warn!(
            content_type = ctx.request().headers().get("content-type").unwrap_or_default(),
            "query submitted with unsupported body"
        );
        return Response::text(
            StatusCode::UnsupportedMediaType,
            "expected application/x-www-form-urlencoded",
        );
    };

    // A missing field is forwarded as an empty query.
    let query = form.get("query").unwrap_or_default().to_owned();
    let console = ctx.console();
    let view = console.on_submit(query).await;
    Response::html(StatusCode::Ok, console.render(&view))
}

async fn healthz(_ctx: Context) -> Response {
    Response::text(StatusCode::Ok, "ok")
}
