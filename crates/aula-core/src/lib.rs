//! # aula-core
//!
//! Core types, enrollment rules, and error types for Aula.
//!
//! This crate provides the foundational types shared across all Aula crates:
//! - Entity structs for students, subjects, professors, and enrollment edges
//! - Semester and entity-type enums
//! - ID prefix constants
//! - Enrollment limits and the pure rule evaluator
//! - Cross-cutting error types

pub mod entities;
pub mod enums;
pub mod errors;
pub mod ids;
pub mod limits;
pub mod rules;
