//! DevConnect API Library
//!
//! Social profile backend: registration and token authentication,
//! developer profiles with experience/education history, GitHub repository
//! lookup, and posts.

pub mod api;
pub mod auth;
pub mod config;
pub mod domain;
pub mod infrastructure;
pub mod state;
pub mod telemetry;
