pub mod manager;
pub mod memory;
pub mod models;
pub mod postgres;
pub mod store;

pub use manager::{DatabaseError, DatabaseManager};
pub use memory::{MemoryPostStore, MemoryUserStore};
pub use postgres::{PgPostStore, PgUserStore};
pub use store::{PostStore, UserStore};
