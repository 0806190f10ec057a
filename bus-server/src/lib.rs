//! Bus route lookup server.
//!
//! Answers: "Which buses from this stop go somewhere whose name looks
//! like this?"

pub mod catalog;
pub mod config;
pub mod domain;
pub mod lookup;
pub mod web;
