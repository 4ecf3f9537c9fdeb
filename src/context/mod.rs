//! Per-request context handed to route handlers and middleware.

use std::sync::Arc;

use crate::console::QueryConsole;
use crate::http::{FormData, Request};

/// A request paired with the shared console.
pub struct Context {
    request: Request,
    console: Arc<QueryConsole>,
}

impl Context {
    pub fn new(request: Request, console: Arc<QueryConsole>) -> Self {
        Self { request, console }
    }

    pub fn request(&self) -> &Request {
        &self.request
    }

    pub fn console(&self) -> &QueryConsole {
        &self.console
    }

    /// The submitted form, or `None` if the body is not urlencoded.
    pub fn form(&self) -> Option<FormData> {
        self.request.form()
    }
}
