//! Utility modules: file persistence.

pub mod persistence;
