//! Integration test suite.
//!
//! 1. Conversion laws
//! 2. Concurrent first use
//! 3. Catalog export, drift and configuration files

pub mod helpers;
pub mod laws;
