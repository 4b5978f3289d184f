//! Resume review core and the HTTP handlers that expose it.

pub mod actionable;
pub mod dates;
pub mod entities;
pub mod handlers;
pub mod heuristics;
pub mod redact;
pub mod sections;
pub mod turkish;
