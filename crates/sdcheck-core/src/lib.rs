//! Core types and definitions for sdcheck.
//!
//! This crate holds the declarative command registry: one [`CommandSpec`]
//! per SDC command, describing which flags take values, which arguments are
//! required, how many positional arguments are accepted, and which value
//! [`Validator`] applies to each argument. The registry is consulted by the
//! parser for flag/value disambiguation and by the checker for argument
//! validation.

pub mod registry;

pub use registry::{ArgKind, ArgSpec, CommandSpec, Registry, UnknownValidator, Validator};
