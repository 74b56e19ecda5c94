//! Core use-case services.
//!
//! # Responsibility
//! - Orchestrate repository calls into use-case level APIs: browsing,
//!   composing and backup.
//! - Keep frontend layers decoupled from storage details.

pub mod backup_service;
pub mod browse_service;
pub mod compose_service;
