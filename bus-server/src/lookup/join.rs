//! Fan-out over the services at a stop, then join.

use std::collections::{BTreeMap, BTreeSet};
use std::sync::Arc;

use futures::future::join_all;
use tracing::debug;

use crate::catalog::{BusCatalog, CatalogError};
use crate::domain::{ServiceNo, Stop, StopId};

use super::route_match::RouteMatch;
use super::sink::FailureSink;

/// Why a lookup degraded. Never returned to callers of [`find_matches`];
/// it is reported to the sink and kept as a message on the result.
#[derive(Debug, thiserror::Error)]
pub enum LookupError {
    /// Listing the services at the origin failed
    #[error("failed to list services at {stop}: {source}")]
    ServicesAt {
        stop: StopId,
        #[source]
        source: CatalogError,
    },

    /// A per-service lookup returned an error
    #[error("lookup for service {service} failed: {source}")]
    Service {
        service: ServiceNo,
        #[source]
        source: CatalogError,
    },

    /// A per-service task panicked or was aborted
    #[error("lookup task for service {service} did not complete: {message}")]
    Task { service: ServiceNo, message: String },
}

/// Find the services at `origin` whose routes include a stop matching
/// `fragment`.
///
/// Returns `None` if either input is missing; nothing is dispatched in that
/// case. Otherwise always returns `Some`: any failure empties the result and
/// is reported to `sink` rather than returned.
///
/// One task per service is spawned onto the tokio runtime, so the lookups
/// run in parallel on a multi-threaded runtime.
pub async fn find_matches<C>(
    catalog: &Arc<C>,
    sink: &dyn FailureSink,
    origin: Option<&Stop>,
    fragment: Option<&str>,
) -> Option<RouteMatch>
where
    C: BusCatalog + 'static,
{
    let (Some(origin), Some(fragment)) = (origin, fragment) else {
        debug!("route lookup needs both an origin stop and a name");
        return None;
    };

    let result = match collect_matches(catalog, origin, fragment).await {
        Ok(services) => RouteMatch::new(origin.clone(), fragment, services),
        Err(e) => {
            let message = format!("Unable to complete query: {e}");
            sink.report(&message);
            RouteMatch::degraded(origin.clone(), fragment, message)
        }
    };

    Some(result)
}

async fn collect_matches<C>(
    catalog: &Arc<C>,
    origin: &Stop,
    fragment: &str,
) -> Result<BTreeMap<ServiceNo, BTreeSet<Stop>>, LookupError>
where
    C: BusCatalog + 'static,
{
    let services = catalog
        .services_at(origin)
        .await
        .map_err(|source| LookupError::ServicesAt {
            stop: origin.id.clone(),
            source,
        })?;

    debug!(
        origin = %origin.id,
        fragment,
        services = services.len(),
        "dispatching route lookups"
    );

    let fragment: Arc<str> = Arc::from(fragment);
    let handles: Vec<_> = services
        .iter()
        .map(|service| {
            let catalog = Arc::clone(catalog);
            let fragment = Arc::clone(&fragment);
            let service = service.clone();
            tokio::spawn(async move { catalog.stops_matching(&service, &fragment).await })
        })
        .collect();

    // Wait for every task, even after a failure: there is no cancellation.
    let results = join_all(handles).await;

    let mut matches = BTreeMap::new();
    for (service, joined) in services.into_iter().zip(results) {
        let stops = match joined {
            Ok(Ok(stops)) => stops,
            Ok(Err(source)) => return Err(LookupError::Service { service, source }),
            Err(e) => {
                return Err(LookupError::Task {
                    service,
                    message: e.to_string(),
                });
            }
        };

        if !stops.is_empty() {
            matches.insert(service, stops);
        }
    }

    debug!(matched = matches.len(), "route lookups joined");

    Ok(matches)
}
