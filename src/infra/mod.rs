//! Concrete API clients and local credential loading.

pub mod keys;
pub mod marudor;
pub mod travelynx;
