// src/lib.rs

#[macro_use]
pub mod macros;

pub mod config;
pub mod core;
pub mod specs;

pub mod catalog;
pub mod csv;
pub mod error;
pub mod logger;
pub mod occupancy;
pub mod progress;
pub mod room;
pub mod scan;
pub mod store;
pub mod table;

#[cfg(feature = "cli")]
pub mod cli;

pub use error::ParseError;
pub use occupancy::{Event, Occupancy, Timeslot, WeekOccupancy};
pub use room::Room;
