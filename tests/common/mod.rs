use std::net::SocketAddr;
use std::sync::{Arc, Mutex};

use query_console::config::{ConsoleConfig, parse_endpoint};
use query_console::{Request, Response, Server, StatusCode};

/// A stand-in for the remote query service that answers every request with
/// the same status and body and records the bodies it received.
pub struct MockService {
    pub addr: SocketAddr,
    received: Arc<Mutex<Vec<String>>>,
}

impl MockService {
    pub async fn start(status: StatusCode, body: &'static str) -> Self {
        let server = Server::bind("127.0.0.1:0").await.unwrap();
        let addr = server.local_addr();
        let received = Arc::new(Mutex::new(Vec::new()));

        let log = Arc::clone(&received);
        tokio::spawn(server.run(move |req: Request| {
            log.lock()
                .unwrap()
                .push(String::from_utf8_lossy(req.body()).into_owned());
            async move {
                Response::new(status)
                    .header("Content-Type", "application/json")
                    .body(body)
            }
        }));

        Self { addr, received }
    }

    pub fn endpoint(&self) -> String {
        format!("http://{}/query", self.addr)
    }

    pub fn config(&self) -> ConsoleConfig {
        ConsoleConfig::new(parse_endpoint(&self.endpoint()).unwrap())
    }

    /// Request bodies received so far, parsed as JSON.
    pub fn received(&self) -> Vec<serde_json::Value> {
        self.received
            .lock()
            .unwrap()
            .iter()
            .map(|body| serde_json::from_str(body).unwrap())
            .collect()
    }
}

/// An address nothing listens on.
pub async fn closed_endpoint() -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);
    format!("http://{addr}/query")
}
