//! Domain types for bus route lookup.
//!
//! Identifiers enforce their lexical rules at construction time, so code
//! that receives a `StopId` or `ServiceNo` can trust its validity.

mod service;
mod stop;

pub use service::{BusService, InvalidServiceNo, ServiceNo};
pub use stop::{InvalidStopId, Stop, StopId};
