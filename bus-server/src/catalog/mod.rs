//! Bus catalog: where stops and services come from.
//!
//! The lookup only sees the [`BusCatalog`] trait. Two implementations are
//! provided: an in-memory catalog (built in code or loaded from a JSON
//! snapshot) and an HTTP catalog that queries a remote bus API.

mod error;
mod http;
mod memory;

use std::collections::BTreeSet;
use std::future::Future;

use crate::domain::{ServiceNo, Stop, StopId};

pub use error::CatalogError;
pub use http::{HttpCatalog, HttpCatalogConfig};
pub use memory::InMemoryCatalog;

/// Source of bus stop and service data.
///
/// Implementations must be shareable across worker threads: the lookup
/// queries one catalog from many spawned tasks at once.
pub trait BusCatalog: Send + Sync {
    /// Resolve a stop id to a stop, or `None` if no such stop exists.
    fn stop(&self, id: &StopId) -> impl Future<Output = Result<Option<Stop>, CatalogError>> + Send;

    /// Services calling at the given stop, sorted and without duplicates.
    fn services_at(
        &self,
        stop: &Stop,
    ) -> impl Future<Output = Result<Vec<ServiceNo>, CatalogError>> + Send;

    /// Stops on the service's route whose name contains `fragment`.
    ///
    /// See [`BusService::find_stops_with`](crate::domain::BusService::find_stops_with)
    /// for the matching rules.
    fn stops_matching(
        &self,
        service: &ServiceNo,
        fragment: &str,
    ) -> impl Future<Output = Result<BTreeSet<Stop>, CatalogError>> + Send;
}
