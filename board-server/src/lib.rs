//! Public-transport departure board server.
//!
//! Polls a transit backend for bus, tram and train departures around a
//! set of stops, keeps the latest snapshot in memory, and serves a kiosk
//! page that rotates through the stops.

pub mod board;
pub mod config;
pub mod domain;
pub mod transit;
pub mod weather;
pub mod web;
