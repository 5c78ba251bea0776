//! Forum service - status and reset endpoints for a forum database
//!
//! This library provides the data-access layer behind the forum's service
//! endpoints: counting posts, users, forums and threads, and wiping every
//! forum table.

pub mod api;
pub mod config;
pub mod db;
pub mod models;
pub mod services;
