// Library root: the client-side domain layer shared by the terminal front
// end and the integration tests.

pub mod actions;
pub mod api;
pub mod config;
pub mod db;
pub mod gate;
pub mod lineup;
pub mod models;
pub mod roster;
pub mod search;
pub mod session;

#[cfg(test)]
pub(crate) mod fake;
