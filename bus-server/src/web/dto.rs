//! Data transfer objects for web requests and responses.

use serde::{Deserialize, Serialize};

use crate::domain::Stop;
use crate::lookup::RouteMatch;

/// Query string for route lookups.
///
/// Both fields are optional at the HTTP level; a lookup with either
/// missing is rejected as an invalid query.
#[derive(Debug, Default, Deserialize)]
pub struct RouteQuery {
    /// Origin stop id
    pub stop: Option<String>,

    /// Partial name of the destination stop
    pub name: Option<String>,
}

/// A stop in responses.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StopResult {
    pub id: String,
    pub name: String,
}

impl From<&Stop> for StopResult {
    fn from(stop: &Stop) -> Self {
        Self {
            id: stop.id.to_string(),
            name: stop.name.clone(),
        }
    }
}

/// A service and the matching stops it reaches.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServiceMatch {
    pub service: String,
    pub stops: Vec<StopResult>,
}

/// Response for `GET /routes`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RouteMatchResponse {
    pub origin: StopResult,

    /// The name fragment searched for
    pub query: String,

    /// Matching services, sorted by service number
    pub services: Vec<ServiceMatch>,

    /// True if the lookup failed and `services` was emptied
    pub degraded: bool,

    /// Failure message when degraded
    pub error: Option<String>,
}

impl From<&RouteMatch> for RouteMatchResponse {
    fn from(result: &RouteMatch) -> Self {
        let services = result
            .services()
            .iter()
            .map(|(service, stops)| ServiceMatch {
                service: service.to_string(),
                stops: stops.iter().map(StopResult::from).collect(),
            })
            .collect();

        Self {
            origin: StopResult::from(result.origin()),
            query: result.fragment().to_string(),
            services,
            degraded: result.is_degraded(),
            error: result.failure().map(str::to_string),
        }
    }
}

/// Error body.
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
}
