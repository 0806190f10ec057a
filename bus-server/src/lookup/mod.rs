//! Concurrent route lookup.
//!
//! Given an origin stop and part of a destination's name, finds every bus
//! service at the origin whose route passes a matching stop. One task is
//! spawned per service and the results are joined into a [`RouteMatch`].
//!
//! Failures are fail-closed: if any part of the lookup fails, the result
//! carries no services at all, plus a [`RouteMatch::failure`] message.

mod join;
mod route_match;
mod sink;

pub use join::{LookupError, find_matches};
pub use route_match::RouteMatch;
pub use sink::{FailureSink, TracingSink};
