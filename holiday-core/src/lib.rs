//! Holiday Core
//!
//! Core types shared by the holiday planner client and CLI.
//!
//! This crate contains:
//! - Domain types: the entities the holiday API serves (plans, activities, weather, users)
//! - DTOs: request forms, query shapes and result payloads exchanged with the API

pub mod domain;
pub mod dto;
