//! Construction cost estimation service for Saudi residential and commercial
//! projects.
//!
//! The [`estimator`] module is a pure calculation engine; everything else is
//! the HTTP service around it.

pub mod api;
pub mod app;
pub mod config;
pub mod db;
pub mod domain;
pub mod error;
pub mod estimator;
pub mod logging;
pub mod middleware;
pub mod routes;
pub mod services;
