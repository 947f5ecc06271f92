//! Grievance Common - Shared Types and Utilities
//!
//! Foundational types, error handling, and utilities used across all
//! grievance console components. Provides the canonical domain shapes that
//! the client library, the web dashboard and the command-line tool share.
//!
//! Key Features:
//! - Unified error type with failure classification
//! - Core domain types (User, Request, Mail, Priority, Status)
//! - API configuration with environment and file overrides
//! - Formatting utilities for sizes, percentages and dates
//!
//! @version 0.1.0
//! @author AutomataNexus Development Team

pub mod config;
pub mod error;
pub mod types;
pub mod utils;

pub use config::ApiConfig;
pub use error::{GrievanceError, Result};
pub use types::*;
