//! Command implementations.

mod plan;

pub use plan::execute as plan_execute;
