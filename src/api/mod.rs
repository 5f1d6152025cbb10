/*
 * Responsibility
 * - HTTP 境界 (routes / handlers / extractors / dto)
 */
pub mod dto;
pub mod extractors;
pub mod handlers;
pub mod routes;

pub use routes::{gated, public};
