//! Typed client for the project resources of the Tracker REST API, plus the
//! configuration the `ptracker` command line tool persists.

pub mod config;
pub mod tracker;
