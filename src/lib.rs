//! Tutoring portal web shell: session verification, role-based path gating
//! and the dashboard page routes behind it.

pub mod api;
pub mod app;
pub mod config;
pub mod error;
pub mod middleware;
pub mod services;
pub mod state;
