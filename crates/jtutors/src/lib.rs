//! Domain library for the JTutors tutoring marketplace: tutor profiles with
//! derived completion scoring, hire bookings, and the payout ledger.

pub mod config;
pub mod error;
pub mod marketplace;
pub mod telemetry;
