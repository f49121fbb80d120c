pub mod auth;
pub mod cart;
pub mod catalog;
pub mod line_item;
pub mod reservation;
