pub mod config;
pub mod leave;
pub mod map;
pub mod queries;
pub mod visit;
