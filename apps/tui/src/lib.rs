// Modules shared by the binary and its tests
pub mod cli;
pub mod config;
pub mod data;
