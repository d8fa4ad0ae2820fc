pub mod config;
pub mod csv_io;
pub mod db;
pub mod server;
pub mod telemetry;
