//! In-memory bus catalog.
//!
//! Holds a fixed set of stops and services. Can be built directly from
//! domain values or loaded from a JSON snapshot of the form:
//!
//! ```json
//! {
//!   "stops": [{"id": "Stop-001", "name": "Opp Blk 1"}],
//!   "services": [{"number": "Svc-10", "stops": ["Stop-001"]}]
//! }
//! ```

use std::collections::{BTreeSet, HashMap};
use std::path::Path;

use serde::Deserialize;

use crate::domain::{BusService, ServiceNo, Stop, StopId};

use super::BusCatalog;
use super::error::CatalogError;

/// On-disk snapshot layout.
#[derive(Debug, Deserialize)]
struct Snapshot {
    stops: Vec<Stop>,
    services: Vec<ServiceRecord>,
}

/// A service in the snapshot, with its route given as stop ids.
#[derive(Debug, Deserialize)]
struct ServiceRecord {
    number: ServiceNo,
    stops: Vec<StopId>,
}

/// Immutable catalog of stops and services held in memory.
#[derive(Debug, Clone, Default)]
pub struct InMemoryCatalog {
    stops: HashMap<StopId, Stop>,
    services: HashMap<ServiceNo, BusService>,
    /// Stop -> services calling there, built once at construction.
    by_stop: HashMap<StopId, BTreeSet<ServiceNo>>,
}

impl InMemoryCatalog {
    /// Build a catalog from stops and services.
    ///
    /// Fails if a stop id or service number appears twice, or if a route
    /// calls at a stop that is not in `stops`.
    pub fn new(stops: Vec<Stop>, services: Vec<BusService>) -> Result<Self, CatalogError> {
        let mut stop_map = HashMap::with_capacity(stops.len());
        for stop in stops {
            if stop_map.contains_key(&stop.id) {
                return Err(CatalogError::InvalidData(format!(
                    "duplicate stop id {}",
                    stop.id
                )));
            }
            stop_map.insert(stop.id.clone(), stop);
        }

        let mut service_map = HashMap::with_capacity(services.len());
        let mut by_stop: HashMap<StopId, BTreeSet<ServiceNo>> = HashMap::new();

        for service in services {
            if service_map.contains_key(&service.number) {
                return Err(CatalogError::InvalidData(format!(
                    "duplicate service number {}",
                    service.number
                )));
            }

            for stop in &service.stops {
                if stop_map.get(&stop.id) != Some(stop) {
                    return Err(CatalogError::InvalidData(format!(
                        "service {} calls at unknown stop {}",
                        service.number, stop.id
                    )));
                }
                by_stop
                    .entry(stop.id.clone())
                    .or_default()
                    .insert(service.number.clone());
            }

            service_map.insert(service.number.clone(), service);
        }

        Ok(Self {
            stops: stop_map,
            services: service_map,
            by_stop,
        })
    }

    /// Parse a catalog from a JSON snapshot string.
    pub fn from_json(json: &str) -> Result<Self, CatalogError> {
        let snapshot: Snapshot = serde_json::from_str(json).map_err(|e| CatalogError::Json {
            message: e.to_string(),
        })?;

        let lookup: HashMap<&StopId, &Stop> = snapshot.stops.iter().map(|s| (&s.id, s)).collect();

        let mut services = Vec::with_capacity(snapshot.services.len());
        for record in &snapshot.services {
            let mut route = Vec::with_capacity(record.stops.len());
            for id in &record.stops {
                let stop = lookup.get(id).ok_or_else(|| {
                    CatalogError::InvalidData(format!(
                        "service {} calls at unknown stop {}",
                        record.number, id
                    ))
                })?;
                route.push((*stop).clone());
            }
            services.push(BusService::new(record.number.clone(), route));
        }

        Self::new(snapshot.stops, services)
    }

    /// Load a catalog from a JSON snapshot file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, CatalogError> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path).map_err(|e| CatalogError::Io {
            path: path.display().to_string(),
            message: e.to_string(),
        })?;
        Self::from_json(&json)
    }

    /// Returns the number of stops.
    pub fn stop_count(&self) -> usize {
        self.stops.len()
    }

    /// Returns the number of services.
    pub fn service_count(&self) -> usize {
        self.services.len()
    }
}

impl BusCatalog for InMemoryCatalog {
    async fn stop(&self, id: &StopId) -> Result<Option<Stop>, CatalogError> {
        Ok(self.stops.get(id).cloned())
    }

    async fn services_at(&self, stop: &Stop) -> Result<Vec<ServiceNo>, CatalogError> {
        let services: Vec<ServiceNo> = self
            .by_stop
            .get(&stop.id)
            .map(|services| services.iter().cloned().collect())
            .unwrap_or_default();
        debug_assert!(
            services
                .iter()
                .all(|n| self.services.get(n).is_some_and(|s| s.calls_at(stop))),
            "stop index out of step with routes at {}",
            stop.id
        );
        Ok(services)
    }

    async fn stops_matching(
        &self,
        service: &ServiceNo,
        fragment: &str,
    ) -> Result<BTreeSet<Stop>, CatalogError> {
        self.services
            .get(service)
            .map(|s| s.find_stops_with(fragment))
            .ok_or_else(|| CatalogError::UnknownService(service.clone()))
    }
}
