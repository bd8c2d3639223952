//! # enseada-contracts
//!
//! Shared types and error contracts for the Enseada console.
//!
//! Every crate in the workspace imports from here. No business logic lives in
//! this crate, only data definitions and the error type.

pub mod error;
pub mod page;
pub mod permission;
pub mod scope;
pub mod user;
