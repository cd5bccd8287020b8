pub mod constants;
pub mod files;
pub mod filter;
pub mod notice;
pub mod types;
