//! # Timetable Backend
//!
//! Weekly academic timetable engine and REST API.
//!
//! Institution settings (start time, slot length, slots per day, an optional
//! break, working days) define a grid of labelled time slots. Timetables are
//! sets of entries placed on that grid, produced by an external solver or
//! edited by hand, and every render recomputes the grid from the settings
//! stored with the timetable.
//!
//! ## Architecture
//!
//! - [`models`]: Timetables, entries, settings, and the faculty/room directory
//! - [`services`]: Slot grid computation, entry indexing, rendering, validation,
//!   the solver client, and the generation orchestrator
//! - [`db`]: Repository traits, local and file backends, and the service layer
//! - [`config`]: TOML and environment configuration
//! - [`http`]: Axum-based HTTP server and request handlers

// Allow large error types - RepositoryError contains rich context for debugging
#![allow(clippy::result_large_err)]

pub mod config;
pub mod db;
pub mod models;
pub mod services;

#[cfg(feature = "http-server")]
pub mod http;
