//! Data models
//!
//! Shared between epos-server and the admin console (via API).
//! JSON is camelCase. DB row types use `#[cfg_attr(feature = "db", derive(sqlx::FromRow))]`;
//! money-bearing rows are mapped by the server repositories since SQLite stores
//! decimals as TEXT.
//! All IDs are `i64` snowflakes.

pub mod category;
pub mod order;
pub mod product;
pub mod role;
pub mod transaction;
pub mod user;

// Re-exports
pub use category::*;
pub use order::*;
pub use product::*;
pub use role::*;
pub use transaction::*;
pub use user::*;
