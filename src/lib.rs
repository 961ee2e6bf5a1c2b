pub mod cli;
pub mod config;
pub mod controller;
pub mod launcher;
pub mod listing;
pub mod native;
