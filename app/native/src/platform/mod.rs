//! Platform abstractions for Wallslide.
//!
//! - [`ipc`] - Unix socket IPC between the CLI and the running slideshow
//! - [`path`] - Shell-like path expansion
//! - [`process`] - Locating, launching and terminating wallslide processes
//! - [`thread`] - Named thread spawning

pub mod ipc;
pub mod path;
pub mod process;
pub mod thread;

pub use ipc::{IpcError, IpcQuery, IpcResponse, is_daemon_running, send_query, start_server};
pub use thread::spawn_named_thread;
