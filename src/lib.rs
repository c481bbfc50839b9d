//! Placement orchestration for school enrollment.
//!
//! The crate is organized around a pure recommendation engine
//! ([`workflows::enrollment::placement`]) that ranks section programs for an
//! applicant profile, plus the intake, persistence, and HTTP plumbing that
//! the enrollment portal drives it with.

pub mod config;
pub mod error;
pub mod telemetry;
pub mod workflows;
