//! Repository layer.
//!
//! Each repository is a zero-sized struct providing async methods. Single
//! statement methods accept any [`sqlx::PgExecutor`] so callers can pass
//! either `&PgPool` or `&mut *tx`; methods that issue several statements
//! take `&mut PgConnection` and are meant to run inside a transaction.

pub mod line_item_repo;
pub mod provider_repo;
pub mod reservation_repo;
pub mod service_repo;
pub mod user_repo;

pub use line_item_repo::LineItemRepo;
pub use provider_repo::ProviderRepo;
pub use reservation_repo::ReservationRepo;
pub use service_repo::ServiceRepo;
pub use user_repo::UserRepo;
