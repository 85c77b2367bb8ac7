//! Core domain types
//!
//! These types mirror the entities served by the holiday planning API. They are pure
//! data-transfer shapes: the server owns every invariant, the client only reads and
//! forwards them.

pub mod activity;
pub mod plan;
pub mod user;
pub mod weather;
