//! VR-Admin: operate on a volunteer roster snapshot from the command line.
//!
//! Loads a JSON export of the database into the in-memory record store,
//! runs one membership operation, prints the outcome and, for mutations,
//! writes the database back.

pub mod cli;
pub mod runner;
pub mod snapshot;
