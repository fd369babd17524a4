pub mod connection;
pub mod entity;
pub mod migration;
pub mod repository;

pub use connection::establish_connection;
pub use migration::Migrator;
