//! JSON API for tickets.

pub mod tickets;
