//! Logger module
//!
//! Structured log lines for the asset server:
//! - Server lifecycle logging
//! - Per-request access lines and serve outcomes
//! - The highlighted atlas trace line
//! - Error and warning logging with optional file targets

mod format;
pub mod writer;

pub use format::AccessLogEntry;

use crate::config::Config;
use std::net::SocketAddr;

/// Initialize the logger with configuration
///
/// Should be called once at application startup.
pub fn init(config: &Config) -> std::io::Result<()> {
    writer::init(
        config.logging.access_log_file.as_deref(),
        config.logging.error_log_file.as_deref(),
    )
}

/// Write to info/access log
fn write_info(message: &str) {
    match writer::get() {
        Some(w) => w.write_access(message),
        None => println!("{message}"),
    }
}

/// Write to error log
fn write_error(message: &str) {
    match writer::get() {
        Some(w) => w.write_error(message),
        None => eprintln!("{message}"),
    }
}

pub fn log_server_start(addr: &SocketAddr, config: &Config) {
    write_info("======================================");
    write_info("Atlas asset server started");
    write_info(&format!("Listening on: http://{addr}"));
    write_info(&format!("Asset root: {}", config.assets.root));
    write_info("MIME overrides: .atlas -> text/plain, .json -> application/json");
    if let Some(workers) = config.server.workers {
        write_info(&format!("Worker threads: {workers}"));
    }
    if let Some(ref path) = config.logging.access_log_file {
        write_info(&format!("Access log: {path}"));
    }
    if let Some(ref path) = config.logging.error_log_file {
        write_info(&format!("Error log: {path}"));
    }
    write_info("Stop: Ctrl+C");
    write_info("======================================\n");
}

/// Request line, emitted before any processing
pub fn log_request(method: &hyper::Method, path: &str) {
    write_info(&format!("[HTTP] {method} {path}"));
}

/// Highlighted trace for atlas requests. Observational only.
pub fn log_atlas_request(method: &hyper::Method, path: &str) {
    write_info(&format!("[ATLAS] Atlas request detected: {method} {path}"));
}

pub fn log_serving_atlas(path: &str) {
    write_info(&format!("[SERVE] Serving .atlas file: {path}"));
}

/// Outcome line: byte count served
pub fn log_served(path: &str, bytes: u64) {
    write_info(&format!("[OK] Served {path} ({bytes} bytes)"));
}

/// Formatted access log entry, one per completed request
pub fn log_access(entry: &AccessLogEntry, format: &str) {
    match writer::get() {
        Some(w) => w.write_access(&entry.format(format)),
        None => println!("{}", entry.format(format)),
    }
}

pub fn log_connection_accepted(peer_addr: &SocketAddr) {
    write_info(&format!("[Connection] Accepted from: {peer_addr}"));
}

pub fn log_connection_error(err: &impl std::fmt::Debug) {
    write_error(&format!("[ERROR] Failed to serve connection: {err:?}"));
}

pub fn log_error(message: &str) {
    write_error(&format!("[ERROR] {message}"));
}

pub fn log_warning(message: &str) {
    write_error(&format!("[WARN] {message}"));
}

pub fn log_shutdown() {
    write_info("\n[STOP] Server stopped");
}

/// Fatal bind diagnostic; the process exits after this.
pub fn log_bind_failed(addr: &SocketAddr, err: &std::io::Error) {
    log_error(&format!("Failed to bind {addr}: {err}"));
    write_error(&format!(
        "       Port {} may already be in use by another process",
        addr.port()
    ));
}
