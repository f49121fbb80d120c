//! Domain logic for the tourism reservation core.
//!
//! Everything here is pure: no database, no HTTP. The `db` and `api` crates
//! build on these types.

pub mod booking;
pub mod booking_code;
pub mod error;
pub mod roles;
pub mod status;
pub mod summary;
pub mod types;
