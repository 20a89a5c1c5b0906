//! Configuration

pub mod config;

pub use config::{AnnotationConfig, ConfigurationManager};
