pub mod fixture;
pub mod ports;
pub mod resource;
pub mod runner;
