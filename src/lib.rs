//! Status-bar helper for travelynx check-ins.
//!
//! Asks travelynx whether the user is on a train, looks up the next stop on
//! marudor.de and renders a single i3bar block.

pub mod fetch;
pub mod format;
pub mod infra;
pub mod output;
pub mod services;
pub mod status;
