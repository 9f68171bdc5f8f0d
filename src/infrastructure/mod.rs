//! Infrastructure layer module
//!
//! This module contains the ambient services around the cache:
//! - Configuration management
//! - Logging infrastructure
//! - Project setup and wiring of media and stores from configuration

pub mod config;
pub mod logging;
pub mod setup;
