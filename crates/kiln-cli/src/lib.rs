//! kiln CLI library: argument parsing, command dispatch, and the monorepo
//! metadata loader around the `kiln-config` resolution engine.

pub mod cli;
pub mod commands;
pub mod error;
pub mod logger;
pub mod workspace;
