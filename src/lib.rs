//! diagnosys: an interactive terminal dashboard for host diagnostics and
//! reconnaissance.
//!
//! This library exposes the core modules for use by the binary and by tests.

pub mod app;
pub mod collectors;
pub mod config;
pub mod controller;
pub mod error;
pub mod layout;
pub mod model;
pub mod view;
