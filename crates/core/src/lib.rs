//! Core library for jtools
//!
//! This crate implements the **Functional Core** of the jtools application,
//! following the Functional Core - Imperative Shell architectural pattern.
//!
//! # Architecture Overview
//!
//! The jtools project uses a two-crate architecture to enforce separation of concerns:
//!
//! - **`jtools_core`** (this crate): Pure transformation functions with zero I/O
//! - **`jtools`**: I/O operations and orchestration (the Imperative Shell)
//!
//! ## Functional Core Principles
//!
//! All functions in this crate adhere to these principles:
//!
//! - **Pure functions**: Same input always produces the same output
//! - **No side effects**: No I/O operations, no external state mutations
//! - **Deterministic**: Behavior is predictable and reproducible
//! - **Testable**: Can be tested with simple fixture data, no mocking required
//!
//! # Module Organization
//!
//! The core crate is organized by domain:
//!
//! - [`markup`]: Bidirectional Jira wiki markup / Markdown text conversion
//! - [`compose`]: Issue-buffer decomposition into summary, description, and directives
//! - [`fields`]: Field schema coercion and display-value extraction
//! - [`jql`]: JQL query assembly from structured criteria
//! - [`text`]: Terminal text fitting helpers (trim, wrap, fence)
//! - [`tracker`]: REST response models and pure response transforms
//!
//! Each module contains:
//!
//! - **Domain models**: Structured types representing API responses and outputs
//! - **Transformation functions**: Pure functions that convert data between forms
//! - **Comprehensive tests**: Unit tests using fixture data (no mocking)
//!
//! # Pattern Reference
//!
//! This architecture is based on Gary Bernhardt's Functional Core, Imperative Shell pattern.
//! The key insight: **data transformation logic should be pure and ignorant of where data
//! comes from or where it goes**.

pub mod compose;
pub mod fields;
pub mod jql;
pub mod markup;
pub mod text;
pub mod tracker;
