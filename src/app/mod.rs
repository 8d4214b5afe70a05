pub mod config;
pub mod dto;
pub mod suite;
