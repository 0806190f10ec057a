//! Lookup result type.

use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

use crate::domain::{ServiceNo, Stop};

/// Services connecting an origin stop to stops matching a name fragment.
///
/// A service is present in [`services`](Self::services) only if it has at
/// least one matching stop. When [`failure`](Self::failure) is set, the
/// lookup degraded and `services` is empty.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RouteMatch {
    origin: Stop,
    fragment: String,
    services: BTreeMap<ServiceNo, BTreeSet<Stop>>,
    failure: Option<String>,
}

impl RouteMatch {
    /// A completed lookup.
    pub fn new(
        origin: Stop,
        fragment: impl Into<String>,
        services: BTreeMap<ServiceNo, BTreeSet<Stop>>,
    ) -> Self {
        let services = services
            .into_iter()
            .filter(|(_, stops)| !stops.is_empty())
            .collect();

        Self {
            origin,
            fragment: fragment.into(),
            services,
            failure: None,
        }
    }

    /// A lookup that failed and was masked to an empty result.
    pub fn degraded(origin: Stop, fragment: impl Into<String>, failure: impl Into<String>) -> Self {
        Self {
            origin,
            fragment: fragment.into(),
            services: BTreeMap::new(),
            failure: Some(failure.into()),
        }
    }

    pub fn origin(&self) -> &Stop {
        &self.origin
    }

    pub fn fragment(&self) -> &str {
        &self.fragment
    }

    /// Matching services and the stops each one reaches, in service order.
    pub fn services(&self) -> &BTreeMap<ServiceNo, BTreeSet<Stop>> {
        &self.services
    }

    /// Matched stops for one service.
    pub fn stops_for(&self, service: &ServiceNo) -> Option<&BTreeSet<Stop>> {
        self.services.get(service)
    }

    /// The masked failure, if the lookup degraded.
    pub fn failure(&self) -> Option<&str> {
        self.failure.as_deref()
    }

    pub fn is_degraded(&self) -> bool {
        self.failure.is_some()
    }

    /// True if no service matched (whether or not the lookup degraded).
    pub fn is_empty(&self) -> bool {
        self.services.is_empty()
    }
}

impl fmt::Display for RouteMatch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Search for: {} <-> {}:", self.origin.id, self.fragment)?;

        if self.services.is_empty() {
            return write!(f, "No bus services found.");
        }

        let mut first = true;
        for (service, stops) in &self.services {
            if !first {
                writeln!(f)?;
            }
            first = false;

            write!(f, "From {}, take bus {} to:", self.origin.id, service)?;
            for stop in stops {
                write!(f, "\n- {stop}")?;
            }
        }

        Ok(())
    }
}
