//! Server Routes
//!
//! Handlers organized by functionality.

pub mod config;
pub mod health;
pub mod pages;
pub mod projects;
