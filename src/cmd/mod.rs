pub mod config;
pub mod environment;
pub mod generate;
pub mod stories;
