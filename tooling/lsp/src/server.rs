//! Blocking stdio server loop.
//!
//! Requests are processed one at a time, to completion, in arrival order.
//! Notifications the dispatcher produces while handling a message (published
//! diagnostics, progress) are queued and written before the message's own
//! response. Cancellation is coarse: a `$/cancelRequest` that arrives before
//! its request is honored by answering the request with a cancellation
//! error; once a request has started it runs to the end.

use std::cell::RefCell;
use std::collections::HashSet;
use std::io::{BufRead, BufReader, BufWriter, Read, Write};
use std::rc::Rc;

use serde_json::{Value, json};
use thiserror::Error;

use javelin::analysis::client::EditorClient;
use javelin::analysis::results::PublishedDiagnostic;
use javelin::analysis::JavaLanguageService;
use javelin::facility::FacilityHost;

use crate::handlers::{self, HandlerAction};
use crate::transport::{self, TransportError};

#[derive(Debug, Error)]
pub enum ServerError {
    #[error(transparent)]
    Transport(#[from] TransportError),
}

pub type ServerResult<T> = Result<T, ServerError>;

/// Notifications queued by the dispatcher, drained by the server loop.
struct OutboundQueue {
    queue: Rc<RefCell<Vec<Value>>>,
}

impl EditorClient for OutboundQueue {
    fn publish_diagnostics(&mut self, uri: &str, diagnostics: Vec<PublishedDiagnostic>) {
        self.queue
            .borrow_mut()
            .push(handlers::publish_notification(uri, &diagnostics));
    }

    fn register_watched_files(&mut self, glob: &str) {
        self.queue.borrow_mut().push(json!({
            "jsonrpc": "2.0",
            "id": "register-watchers",
            "method": "client/registerCapability",
            "params": {
                "registrations": [{
                    "id": "watch-java-sources",
                    "method": "workspace/didChangeWatchedFiles",
                    "registerOptions": {
                        "watchers": [{"globPattern": glob}]
                    }
                }]
            }
        }));
    }

    fn start_progress(&mut self, title: &str) {
        self.queue.borrow_mut().push(json!({
            "jsonrpc": "2.0",
            "method": "java/startProgress",
            "params": {"title": title}
        }));
    }

    fn report_progress(&mut self, message: &str) {
        self.queue.borrow_mut().push(json!({
            "jsonrpc": "2.0",
            "method": "java/reportProgress",
            "params": {"message": message}
        }));
    }

    fn end_progress(&mut self) {
        self.queue.borrow_mut().push(json!({
            "jsonrpc": "2.0",
            "method": "java/endProgress",
            "params": Value::Null
        }));
    }
}

pub fn serve<R: Read, W: Write>(
    host: Box<dyn FacilityHost>,
    input: R,
    output: W,
) -> ServerResult<()> {
    let mut reader = BufReader::new(input);
    let mut writer = BufWriter::new(output);
    serve_buffered(host, &mut reader, &mut writer)
}

fn serve_buffered<R: BufRead, W: Write>(
    host: Box<dyn FacilityHost>,
    reader: &mut R,
    writer: &mut W,
) -> ServerResult<()> {
    let outbound = Rc::new(RefCell::new(Vec::new()));
    let client = OutboundQueue {
        queue: Rc::clone(&outbound),
    };
    let mut service = JavaLanguageService::new(host, Box::new(client));
    let mut cancelled_requests: HashSet<String> = HashSet::new();

    loop {
        let message = match transport::read_message(reader) {
            Ok(Some(message)) => message,
            Ok(None) => return Ok(()),
            Err(TransportError::InvalidJson(_)) => {
                let reply = json!({
                    "jsonrpc": "2.0",
                    "error": {"code": -32700, "message": "parse error"}
                });
                transport::write_message(writer, &reply)?;
                continue;
            }
            Err(error) => return Err(error.into()),
        };

        if is_cancel_notification(&message) {
            if let Some(cancelled) = cancelled_request_id(&message) {
                cancelled_requests.insert(cancelled);
            }
            continue;
        }
        // Responses to our own client-bound requests (capability
        // registration) need no handling.
        if is_client_response(&message) {
            continue;
        }
        if let Some(key) = request_id_key(&message)
            && cancelled_requests.remove(&key)
        {
            if let Some(id) = message.get("id") {
                let reply = json!({
                    "jsonrpc": "2.0",
                    "id": id,
                    "error": {"code": -32800, "message": "request cancelled"}
                });
                transport::write_message(writer, &reply)?;
            }
            continue;
        }

        let (action, response) = handlers::handle_message(&mut service, message);
        let notifications: Vec<Value> = outbound.borrow_mut().drain(..).collect();
        for notification in notifications {
            transport::write_message(writer, &notification)?;
        }
        if let Some(response) = response {
            transport::write_message(writer, &response)?;
        }
        if action == HandlerAction::Exit {
            return Ok(());
        }
    }
}

fn is_cancel_notification(message: &Value) -> bool {
    message.get("method").and_then(Value::as_str) == Some("$/cancelRequest")
}

fn cancelled_request_id(message: &Value) -> Option<String> {
    message
        .get("params")
        .and_then(|params| params.get("id"))
        .map(id_key)
}

fn is_client_response(message: &Value) -> bool {
    message.get("method").is_none()
        && message.get("id").is_some()
        && (message.get("result").is_some() || message.get("error").is_some())
}

fn request_id_key(message: &Value) -> Option<String> {
    if message.get("method").is_none() {
        return None;
    }
    message.get("id").map(id_key)
}

fn id_key(id: &Value) -> String {
    match id {
        Value::String(s) => format!("s:{s}"),
        other => format!("v:{other}"),
    }
}
