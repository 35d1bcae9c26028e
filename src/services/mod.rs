//! Contracts for the two upstream APIs.

pub mod details_api;
pub mod status_api;
