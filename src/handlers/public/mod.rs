// handlers/public/mod.rs - Public handlers (no authentication required)
//
// Read-only post and profile views plus token acquisition.
pub mod posts;
pub mod users;
