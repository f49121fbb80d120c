//! Domain model structs and DTOs.
//!
//! Each submodule contains:
//! - A `FromRow` + `Serialize` entity struct matching the database row
//! - `Deserialize` DTOs for the writes the API accepts

pub mod line_item;
pub mod provider;
pub mod reservation;
pub mod service;
pub mod user;
