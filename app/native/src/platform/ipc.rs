//! Unix Domain Socket IPC for CLI<->daemon communication.
//!
//! The running slideshow listens on a socket in the cache directory. CLI
//! commands connect, send one JSON query line and read one JSON response
//! line. If the socket doesn't exist or the connection is refused, no
//! slideshow is running.
//!
//! # Query Format
//!
//! ```json
//! {"type": "ping"}
//! {"type": "stop"}
//! ```
//!
//! # Response Format
//!
//! ```json
//! {"data": {"pid": 4242}}
//! {"error": "Invalid query"}
//! ```

use std::io::{BufRead, BufReader, Write};
use std::os::unix::net::{UnixListener, UnixStream};
use std::path::PathBuf;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::thread::spawn_named_thread;
use crate::cache::get_cache_dir;

/// Socket filename within the cache directory.
const SOCKET_FILENAME: &str = "wallslide.sock";

/// Default timeout for socket operations.
const DEFAULT_TIMEOUT: Duration = Duration::from_millis(5000);

/// Number of retry attempts for transient connection failures.
const MAX_RETRIES: u32 = 3;

/// Delay between retry attempts.
const RETRY_DELAY: Duration = Duration::from_millis(100);

/// Whether the server is running.
static SERVER_RUNNING: AtomicBool = AtomicBool::new(false);

/// Queries the CLI can send to the running slideshow.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum IpcQuery {
    /// Check whether a slideshow is running.
    Ping,
    /// Ask the slideshow to finish its current tick and exit.
    Stop,
}

/// Response from the slideshow to the CLI.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum IpcResponse {
    /// Successful response with data.
    Success { data: serde_json::Value },
    /// Error response.
    Error { error: String },
}

impl IpcResponse {
    /// Creates a success response.
    pub fn success(data: impl Serialize) -> Self {
        Self::Success {
            data: serde_json::to_value(data).unwrap_or(serde_json::Value::Null),
        }
    }

    /// Creates an error response.
    pub fn error(message: impl Into<String>) -> Self { Self::Error { error: message.into() } }

    /// Returns `true` for a success response.
    #[must_use]
    pub const fn is_success(&self) -> bool { matches!(self, Self::Success { .. }) }
}

/// Error type for IPC client operations.
#[derive(Debug, Error)]
pub enum IpcError {
    /// No slideshow is running (socket doesn't exist or can't connect).
    #[error("Wallslide is not running")]
    NotRunning,
    /// Connection timeout.
    #[error("Connection timed out")]
    Timeout,
    /// IO error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    /// Invalid response from the slideshow.
    #[error("Invalid response: {0}")]
    InvalidResponse(String),
}

/// Gets the path to the IPC socket.
#[must_use]
pub fn get_socket_path() -> PathBuf { get_cache_dir().join(SOCKET_FILENAME) }

/// Removes the socket file if it exists.
fn remove_socket() {
    let path = get_socket_path();
    if path.exists() {
        let _ = std::fs::remove_file(&path);
    }
}

/// Starts the IPC socket server.
///
/// The server runs in a background thread and answers each connection with
/// `handler`. Any stale socket file left by a crashed daemon is replaced.
///
/// # Errors
///
/// Returns an error if the socket cannot be bound.
pub fn start_server<F>(handler: F) -> Result<(), IpcError>
where F: Fn(IpcQuery) -> IpcResponse + Send + Sync + 'static {
    if SERVER_RUNNING.swap(true, Ordering::SeqCst) {
        tracing::debug!("ipc server already running");
        return Ok(());
    }

    remove_socket();

    let socket_path = get_socket_path();
    if let Some(parent) = socket_path.parent() {
        let _ = std::fs::create_dir_all(parent);
    }

    let listener = match UnixListener::bind(&socket_path) {
        Ok(listener) => listener,
        Err(err) => {
            SERVER_RUNNING.store(false, Ordering::SeqCst);
            return Err(IpcError::Io(err));
        }
    };

    tracing::debug!(socket = %socket_path.display(), "ipc server listening");

    let handler = Arc::new(handler);
    spawn_named_thread("ipc-server", move || server_loop(&listener, &handler));
    Ok(())
}

/// Accepts connections until the server is stopped.
fn server_loop<F>(listener: &UnixListener, handler: &Arc<F>)
where F: Fn(IpcQuery) -> IpcResponse + Send + Sync + 'static {
    for stream in listener.incoming() {
        if !SERVER_RUNNING.load(Ordering::SeqCst) {
            break;
        }

        match stream {
            Ok(stream) => {
                let handler = Arc::clone(handler);
                spawn_named_thread("ipc-connection", move || {
                    handle_connection(stream, handler.as_ref());
                });
            }
            Err(err) => tracing::warn!(error = %err, "ipc connection error"),
        }
    }
}

/// Handles a single client connection.
#[allow(clippy::needless_pass_by_value)] // Ownership needed - stream is consumed
fn handle_connection<F>(stream: UnixStream, handler: &F)
where F: Fn(IpcQuery) -> IpcResponse {
    let _ = stream.set_read_timeout(Some(DEFAULT_TIMEOUT));

    let Ok(read_half) = stream.try_clone() else {
        return;
    };
    let mut reader = BufReader::new(read_half);
    let mut line = String::new();

    if reader.read_line(&mut line).is_err() {
        return;
    }

    let response = match serde_json::from_str::<IpcQuery>(line.trim()) {
        Ok(query) => handler(query),
        Err(err) => IpcResponse::error(format!("Invalid query: {err}")),
    };

    let response_json = serde_json::to_string(&response)
        .unwrap_or_else(|_| r#"{"error":"Failed to serialize response"}"#.to_string());

    let mut stream = stream;
    let _ = writeln!(stream, "{response_json}");
}

/// Stops the IPC server and removes the socket file.
pub fn stop_server() {
    if SERVER_RUNNING.swap(false, Ordering::SeqCst) {
        remove_socket();
    }
}

/// Sends a query to the running slideshow and returns the response.
///
/// Retries transient connection failures up to three times.
///
/// # Errors
///
/// Returns `IpcError::NotRunning` if no slideshow answers, or another
/// variant for timeouts and malformed responses.
pub fn send_query(query: &IpcQuery) -> Result<IpcResponse, IpcError> {
    let mut last_error = IpcError::NotRunning;

    for attempt in 0..MAX_RETRIES {
        match send_query_once(query) {
            Ok(response) => return Ok(response),
            Err(err) => {
                last_error = err;

                // Timeouts and bad responses mean a daemon answered; retrying won't help
                if !matches!(last_error, IpcError::NotRunning) {
                    break;
                }

                if attempt < MAX_RETRIES - 1 {
                    std::thread::sleep(RETRY_DELAY);
                }
            }
        }
    }

    Err(last_error)
}

/// Sends a query once without retrying.
fn send_query_once(query: &IpcQuery) -> Result<IpcResponse, IpcError> {
    let socket_path = get_socket_path();

    if !socket_path.exists() {
        return Err(IpcError::NotRunning);
    }

    let mut stream = UnixStream::connect(&socket_path).map_err(|err| match err.kind() {
        std::io::ErrorKind::ConnectionRefused
        | std::io::ErrorKind::NotFound
        | std::io::ErrorKind::BrokenPipe
        | std::io::ErrorKind::ConnectionReset => IpcError::NotRunning,
        _ => IpcError::Io(err),
    })?;

    stream.set_read_timeout(Some(DEFAULT_TIMEOUT))?;
    stream.set_write_timeout(Some(DEFAULT_TIMEOUT))?;

    let query_json = serde_json::to_string(query)
        .map_err(|err| IpcError::InvalidResponse(format!("Failed to serialize query: {err}")))?;

    writeln!(stream, "{query_json}").map_err(|err| {
        if err.kind() == std::io::ErrorKind::BrokenPipe {
            IpcError::NotRunning
        } else {
            IpcError::Io(err)
        }
    })?;

    let mut reader = BufReader::new(stream);
    let mut response_line = String::new();
    reader.read_line(&mut response_line).map_err(|err| match err.kind() {
        std::io::ErrorKind::WouldBlock | std::io::ErrorKind::TimedOut => IpcError::Timeout,
        std::io::ErrorKind::BrokenPipe | std::io::ErrorKind::ConnectionReset => {
            IpcError::NotRunning
        }
        _ => IpcError::Io(err),
    })?;

    serde_json::from_str(response_line.trim())
        .map_err(|err| IpcError::InvalidResponse(format!("Failed to parse response: {err}")))
}

/// Checks whether a slideshow is running by sending a ping query.
#[must_use]
pub fn is_daemon_running() -> bool {
    send_query(&IpcQuery::Ping).is_ok_and(|response| response.is_success())
}
