//! Stdio JSON-RPC shell for the javelin analysis core.
//!
//! This crate keeps protocol and transport concerns isolated from compiler
//! semantics. The compiler facility itself is pluggable: the embedder links
//! its javac bridge, implements [`javelin::facility::FacilityHost`], and
//! hands it to [`server::serve`]:
//!
//! ```ignore
//! javelin_lsp::init_tracing();
//! let host = Box::new(my_javac_bridge::Host::new());
//! javelin_lsp::server::serve(host, std::io::stdin(), std::io::stdout())?;
//! ```
//!
//! Logging goes to stderr (stdout carries the protocol) and is enabled with
//! `RUST_LOG`.

use std::sync::OnceLock;

use tracing_subscriber::{EnvFilter, prelude::*};

pub mod handlers;
pub mod server;
pub mod transport;

static TRACING: OnceLock<()> = OnceLock::new();

/// Install the stderr tracing subscriber. Safe to call more than once; only
/// the first call takes effect.
pub fn init_tracing() {
    TRACING.get_or_init(|| {
        if std::env::var("RUST_LOG").is_ok() {
            tracing_subscriber::registry()
                .with(
                    tracing_subscriber::fmt::layer()
                        .with_target(true)
                        .with_writer(std::io::stderr)
                        .compact(),
                )
                .with(EnvFilter::from_default_env())
                .init();
        }
    });
}
