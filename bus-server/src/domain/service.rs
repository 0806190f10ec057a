//! Bus service types.
//!
//! A `BusService` is a line with an ordered sequence of stops. Its one
//! capability is finding the stops on its route whose name matches a query.

use std::collections::BTreeSet;
use std::fmt;

use serde::{Deserialize, Serialize};

use super::stop::check_ident;
use super::Stop;

/// Error returned when parsing an invalid service number.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid service number: {reason}")]
pub struct InvalidServiceNo {
    reason: &'static str,
}

/// A bus service number such as `96`, `151A` or `Svc-10`.
///
/// Follows the same lexical rules as [`StopId`](super::StopId).
#[derive(Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ServiceNo(String);

impl ServiceNo {
    /// Parse a service number from a string.
    pub fn parse(s: &str) -> Result<Self, InvalidServiceNo> {
        check_ident(s).map_err(|reason| InvalidServiceNo { reason })?;
        Ok(ServiceNo(s.to_string()))
    }

    /// Returns the service number as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for ServiceNo {
    type Error = InvalidServiceNo;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        check_ident(&s).map_err(|reason| InvalidServiceNo { reason })?;
        Ok(ServiceNo(s))
    }
}

impl From<ServiceNo> for String {
    fn from(no: ServiceNo) -> Self {
        no.0
    }
}

impl fmt::Debug for ServiceNo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ServiceNo({})", self.0)
    }
}

impl fmt::Display for ServiceNo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A bus service with its full route.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BusService {
    pub number: ServiceNo,
    /// Stops in route order. A stop may appear more than once on loop services.
    pub stops: Vec<Stop>,
}

impl BusService {
    /// Creates a new service.
    pub fn new(number: ServiceNo, stops: Vec<Stop>) -> Self {
        Self { number, stops }
    }

    /// Find the stops on this route whose name contains `fragment`.
    ///
    /// Matching ignores case. An empty fragment matches every stop.
    pub fn find_stops_with(&self, fragment: &str) -> BTreeSet<Stop> {
        let needle = fragment.to_lowercase();
        self.stops
            .iter()
            .filter(|stop| stop.name.to_lowercase().contains(&needle))
            .cloned()
            .collect()
    }

    /// Does this service call at the given stop?
    pub fn calls_at(&self, stop: &Stop) -> bool {
        self.stops.iter().any(|s| s.id == stop.id)
    }

    /// Returns the number of stops on the route.
    pub fn len(&self) -> usize {
        self.stops.len()
    }

    /// Returns true if the route has no stops.
    pub fn is_empty(&self) -> bool {
        self.stops.is_empty()
    }
}


#[cfg(test)]
mod proptests {
    use super::*;
    use crate::domain::StopId;
    use proptest::prelude::*;

    fn route() -> impl Strategy<Value = BusService> {
        proptest::collection::vec("[A-Za-z ]{0,12}", 0..12).prop_map(|names| {
            let stops = names
                .into_iter()
                .enumerate()
                .map(|(i, name)| Stop::new(StopId::parse(&format!("S{i}")).unwrap(), name))
                .collect();
            BusService::new(ServiceNo::parse("P1").unwrap(), stops)
        })
    }

    proptest! {
        /// Every match contains the fragment, ignoring case
        #[test]
        fn matches_contain_fragment(service in route(), fragment in "[A-Za-z]{0,3}") {
            let needle = fragment.to_lowercase();
            for stop in service.find_stops_with(&fragment) {
                prop_assert!(stop.name.to_lowercase().contains(&needle));
            }
        }

        /// No stop containing the fragment is missed
        #[test]
        fn no_match_missed(service in route(), fragment in "[A-Za-z]{0,3}") {
            let matches = service.find_stops_with(&fragment);
            let needle = fragment.to_lowercase();
            for stop in &service.stops {
                if stop.name.to_lowercase().contains(&needle) {
                    prop_assert!(matches.contains(stop));
                }
            }
        }

        /// Empty fragment returns the whole route
        #[test]
        fn empty_fragment_is_whole_route(service in route()) {
            prop_assert_eq!(service.find_stops_with("").len(), service.len());
        }
    }
}
