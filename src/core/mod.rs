//! Configuration and the data shapes shared by the API and worker sides

pub mod config;
pub mod models;
