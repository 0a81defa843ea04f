pub mod accounts;
pub mod db;
pub mod models;
pub mod outcomes;
pub mod payloads;
pub mod schema;

mod error;

pub use error::Error;

pub type Result<T, E = Error> = std::result::Result<T, E>;
