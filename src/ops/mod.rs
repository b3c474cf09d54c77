//! High-level operations.
//!
//! This module contains the implementation of sourceroots commands.

pub mod calculate;

pub use calculate::{
    calculate_content_entries, Calculation, CalculatorOptions, SourceDirectoryCalculator,
};
