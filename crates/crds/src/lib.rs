//! MyService CRD Definitions
//!
//! Kubernetes Custom Resource Definitions for the MyService controller.

pub mod my_service;

pub use my_service::*;
