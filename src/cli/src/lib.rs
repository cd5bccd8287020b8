pub mod commands;
pub mod config;
pub mod handlers;
pub mod logging;
pub mod process_command;
