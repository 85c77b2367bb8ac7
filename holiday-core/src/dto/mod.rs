//! Data Transfer Objects for the holiday API
//!
//! Request bodies, query shapes and result payloads exchanged with the
//! `/api/holidays` and `/auth` endpoints.

pub mod activity;
pub mod auth;
pub mod insights;
pub mod plan;
pub mod query;
pub mod sharing;
