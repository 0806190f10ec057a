//! Application state for the web layer.

use std::sync::Arc;

use crate::lookup::{FailureSink, TracingSink};

/// Shared application state.
///
/// Generic over the catalog so the same router serves in-memory and
/// HTTP-backed data.
pub struct AppState<C> {
    /// Bus stop and service data
    pub catalog: Arc<C>,

    /// Receives masked lookup failures
    pub sink: Arc<dyn FailureSink>,
}

impl<C> AppState<C> {
    /// Create a new app state that logs failures through `tracing`.
    pub fn new(catalog: C) -> Self {
        Self::with_sink(catalog, TracingSink)
    }

    /// Create a new app state with a custom failure sink.
    pub fn with_sink(catalog: C, sink: impl FailureSink + 'static) -> Self {
        Self {
            catalog: Arc::new(catalog),
            sink: Arc::new(sink),
        }
    }
}

// Manual impl: deriving would require `C: Clone`.
impl<C> Clone for AppState<C> {
    fn clone(&self) -> Self {
        Self {
            catalog: Arc::clone(&self.catalog),
            sink: Arc::clone(&self.sink),
        }
    }
}
