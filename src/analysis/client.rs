//! Outbound notifications to the editor.
//!
//! The dispatcher never writes to the transport directly; everything the
//! client should see goes through this trait so the protocol layer decides
//! framing and ordering.

use crate::analysis::results::PublishedDiagnostic;
use crate::facility::Progress;

pub trait EditorClient {
    /// One publish per URI, including empty lists to clear stale markers.
    fn publish_diagnostics(&mut self, uri: &str, diagnostics: Vec<PublishedDiagnostic>);
    /// Ask the editor to watch files matching `glob`.
    fn register_watched_files(&mut self, glob: &str);
    fn start_progress(&mut self, title: &str);
    fn report_progress(&mut self, message: &str);
    fn end_progress(&mut self);
}

/// Adapts the client into the facility-construction progress sink.
pub(crate) struct ClientProgress<'a>(pub &'a mut dyn EditorClient);

impl Progress for ClientProgress<'_> {
    fn report(&mut self, message: &str) {
        self.0.report_progress(message);
    }
}
