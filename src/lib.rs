pub mod aggregate;
pub mod cli;
pub mod color;
pub mod config;
pub mod dates;
pub mod db;
pub mod export;
pub mod legacy;
pub mod logging;
pub mod store;
pub mod types;
