//! Async TCP server using Tokio.
//!
//! Accepts TCP connections and dispatches HTTP/1.1 requests to a handler
//! function, one task per connection, honouring keep-alive.

use std::future::Future;
use std::net::SocketAddr;
use std::sync::Arc;

use bytes::BytesMut;
use thiserror::Error;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{TcpListener, TcpStream};
use tracing::{debug, error, info, warn};

use crate::http::{
    StatusCode,
    request::{MAX_REQUEST_SIZE, Request, RequestError},
    response::Response,
};

/// Errors produced by the server.
#[derive(Debug, Error)]
pub enum ServerError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to bind to {addr}: {source}")]
    Bind {
        addr: String,
        #[source]
        source: std::io::Error,
    },
}

const INITIAL_BUF_SIZE: usize = 4096;

/// The HTTP server behind the console.
///
/// Integration tests also bind one on port `0` to stand in for the remote
/// query service.
///
/// # Examples
///
/// ```rust,no_run
/// use query_console::http::{Response, StatusCode};
/// use query_console::server::Server;
///
/// #[tokio::main]
/// async fn main() -> Result<(), Box<dyn std::error::Error>> {
///     let server = Server::bind("127.0.0.1:8501").await?;
///     server
///         .run_until(
///             |_req| async { Response::text(StatusCode::Ok, "ok") },
///             async { let _ = tokio::signal::ctrl_c().await; },
///         )
///         .await?;
///     Ok(())
/// }
/// ```
pub struct Server {
    listener: TcpListener,
    local_addr: SocketAddr,
}

impl Server {
    /// Binds the server to the given TCP address.
    ///
    /// # Errors
    ///
    /// Returns [`ServerError::Bind`] if the address cannot be bound.
    pub async fn bind(addr: impl AsRef<str>) -> Result<Self, ServerError> {
        let addr = addr.as_ref();
        let listener = TcpListener::bind(addr)
            .await
            .map_err(|e| ServerError::Bind {
                addr: addr.to_owned(),
                source: e,
            })?;
        let local_addr = listener.local_addr()?;
        Ok(Self {
            listener,
            local_addr,
        })
    }

    /// Returns the address actually bound (useful after binding port `0`).
    pub fn local_addr(&self) -> SocketAddr {
        self.local_addr
    }

    /// Accepts connections until the process exits.
    pub async fn run<H, F>(self, handler: H) -> Result<(), ServerError>
    where
        H: Fn(Request) -> F + Send + Sync + 'static,
        F: Future<Output = Response> + Send + 'static,
    {
        self.run_until(handler, std::future::pending::<()>()).await
    }

    /// Accepts connections until `shutdown` resolves.
    ///
    /// Connections already accepted keep running on their own tasks and finish
    /// their in-flight request; only the accept loop stops.
    ///
    /// # Errors
    ///
    /// Currently infallible once bound; accept errors are logged and skipped.
    pub async fn run_until<H, F, S>(self, handler: H, shutdown: S) -> Result<(), ServerError>
    where
        H: Fn(Request) -> F + Send + Sync + 'static,
        F: Future<Output = Response> + Send + 'static,
        S: Future<Output = ()>,
    {
        let handler = Arc::new(handler);
        info!(address = %self.local_addr, "query console listening");

        tokio::pin!(shutdown);

        loop {
            let accepted = tokio::select! {
                () = &mut shutdown => {
                    info!(address = %self.local_addr, "shutdown requested, no longer accepting");
                    return Ok(());
                }
                accepted = self.listener.accept() => accepted,
            };

            let (stream, peer_addr) = match accepted {
                Ok(pair) => pair,
                Err(e) => {
                    error!(error = %e, "failed to accept connection");
                    continue;
                }
            };

            debug!(peer = %peer_addr, "connection accepted");
            let handler = Arc::clone(&handler);

            tokio::spawn(async move {
                if let Err(e) = handle_connection(stream, peer_addr, handler).await {
                    warn!(peer = %peer_addr, error = %e, "connection closed with error");
                }
            });
        }
    }
}

/// Serves requests on one connection until the peer closes it or asks for
/// `Connection: close`.
async fn handle_connection<H, F>(
    mut stream: TcpStream,
    peer_addr: SocketAddr,
    handler: Arc<H>,
) -> Result<(), std::io::Error>
where
    H: Fn(Request) -> F + Send + Sync + 'static,
    F: Future<Output = Response> + Send + 'static,
{
    let mut buf = BytesMut::with_capacity(INITIAL_BUF_SIZE);

    loop {
        // A previous read may already hold the next pipelined request.
        let (request, consumed) = match Request::parse(&buf) {
            Ok(pair) => pair,
            Err(RequestError::Incomplete) if buf.len() > MAX_REQUEST_SIZE => {
                warn!(peer = %peer_addr, "request headers too large, sending 413");
                send_payload_too_large(&mut stream).await?;
                break;
            }
            Err(e @ RequestError::BodyTooLarge { .. }) => {
                warn!(peer = %peer_addr, error = %e, "request too large, sending 413");
                send_payload_too_large(&mut stream).await?;
                break;
            }
            Err(RequestError::Incomplete) => {
                if stream.read_buf(&mut buf).await? == 0 {
                    debug!(peer = %peer_addr, "connection closed by peer");
                    break;
                }
                continue;
            }
            Err(e) => {
                warn!(peer = %peer_addr, error = %e, "bad request, sending 400");
                let response = Response::text(StatusCode::BadRequest, format!("Bad Request: {e}"))
                    .keep_alive(false);
                stream.write_all(&response.into_bytes()).await?;
                break;
            }
        };

        let keep_alive = request.is_keep_alive();

        debug!(
            peer = %peer_addr,
            method = %request.method(),
            path = %request.path(),
            "dispatching request"
        );

        let response = handler(request).await.keep_alive(keep_alive);
        stream.write_all(&response.into_bytes()).await?;
        stream.flush().await?;

        let _ = buf.split_to(consumed);

        if !keep_alive {
            debug!(peer = %peer_addr, "Connection: close, shutting down");
            break;
        }
    }

    Ok(())
}

async fn send_payload_too_large(stream: &mut TcpStream) -> Result<(), std::io::Error> {
    let response =
        Response::text(StatusCode::PayloadTooLarge, "Request entity too large").keep_alive(false);
    stream.write_all(&response.into_bytes()).await
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn roundtrip(raw: &[u8]) -> String {
        let server = Server::bind("127.0.0.1:0").await.unwrap();
        let addr = server.local_addr();
        tokio::spawn(server.run(|req: Request| async move {
            Response::text(StatusCode::Ok, format!("{} {}", req.method(), req.path()))
        }));

        let mut stream = TcpStream::connect(addr).await.unwrap();
        stream.write_all(raw).await.unwrap();
        let mut out = String::new();
        stream.read_to_string(&mut out).await.unwrap();
        out
    }

    #[tokio::test]
    async fn bind_port_zero_reports_real_port() {
        let server = Server::bind("127.0.0.1:0").await.unwrap();
        assert_ne!(server.local_addr().port(), 0);
    }

    #[tokio::test]
    async fn bind_failure_is_reported() {
        let err = Server::bind("not-an-address").await.err().unwrap();
        assert!(matches!(err, ServerError::Bind { .. }));
    }

    #[tokio::test]
    async fn serves_request_and_closes() {
        let out = roundtrip(b"GET /healthz HTTP/1.1\r\nConnection: close\r\n\r\n").await;
        assert!(out.starts_with("HTTP/1.1 200 OK\r\n"));
        assert!(out.contains("Connection: close\r\n"));
        assert!(out.ends_with("GET /healthz"));
    }

    #[tokio::test]
    async fn pipelined_requests_are_answered_in_order() {
        let out = roundtrip(
            b"GET /a HTTP/1.1\r\n\r\nPOST /b HTTP/1.1\r\nContent-Length: 0\r\nConnection: close\r\n\r\n",
        )
        .await;
        let first = out.find("GET /a").unwrap();
        let second = out.find("POST /b").unwrap();
        assert!(first < second);
    }

    #[tokio::test]
    async fn malformed_request_gets_400() {
        let out = roundtrip(b"GET / HTTP/1.1\r\nContent-Length: x\r\n\r\n").await;
        assert!(out.starts_with("HTTP/1.1 400 Bad Request\r\n"));
    }

    #[tokio::test]
    async fn oversized_body_gets_413_without_waiting_for_it() {
        let raw = format!(
            "POST /query HTTP/1.1\r\nContent-Length: {}\r\n\r\n",
            MAX_REQUEST_SIZE + 1
        );
        let out = roundtrip(raw.as_bytes()).await;
        assert!(out.starts_with("HTTP/1.1 413 Payload Too Large\r\n"));
    }

    #[tokio::test]
    async fn content_length_of_usize_max_gets_413() {
        let raw = format!(
            "POST /query HTTP/1.1\r\nContent-Length: {}\r\n\r\n",
            usize::MAX
        );
        let out = roundtrip(raw.as_bytes()).await;
        assert!(out.starts_with("HTTP/1.1 413 Payload Too Large\r\n"));
    }

    #[tokio::test]
    async fn shutdown_stops_accept_loop() {
        let server = Server::bind("127.0.0.1:0").await.unwrap();
        let (tx, rx) = tokio::sync::oneshot::channel::<()>();
        let task = tokio::spawn(server.run_until(
            |_req: Request| async { Response::new(StatusCode::Ok) },
            async {
                let _ = rx.await;
            },
        ));
        tx.send(()).unwrap();
        task.await.unwrap().unwrap();
    }
}
