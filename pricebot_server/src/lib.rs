//! # Pricebot console host
//! This crate wires the pricebot engine up to local data so that it can be used from a terminal. It is responsible
//! for:
//! * Loading the catalog from JSON files and refreshing it periodically.
//! * Reading prices from a JSON price sheet.
//! * Driving the tracking scheduler on a timer.
//! * Reading commands from stdin and writing replies and tracking notices to stdout.
//!
//! ## Configuration
//! The bot is configured via environment variables. See [config](config/index.html) for more information.
pub mod catalog_source;
pub mod catalog_worker;
pub mod cli;
pub mod config;
pub mod console;
pub mod errors;
pub mod price_sheet;
pub mod tracking_worker;
