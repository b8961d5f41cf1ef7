//! Domain model of time tracking. Everything here is synchronous and free of IO; persistence and
//! scheduling live in [crate::daemon].

pub mod categories;
pub mod domain;
pub mod focus;
pub mod ledger;
pub mod weekly;
