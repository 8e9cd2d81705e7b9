//! Backend test support utilities
//!
//! This crate provides utilities specifically for backend testing: unified
//! logging initialization, unique test data and Problem Details assertions.

pub mod problem_details;
pub mod test_logging;
pub mod unique_helpers;
