//! # Race Conditions
//!
//! Concurrent mutations of shared records. Store latency widens the window
//! between each read and the write that depends on it, which is where an
//! unserialized read-modify-write loses updates.
