//! ChronoQuest Engine library.
//!
//! This crate contains the server side of ChronoQuest: chapter content,
//! the AI worker proxy with its image cache, and the progress mirror.
//!
//! ## Structure
//!
//! - `use_cases/` - User story orchestration across ports
//! - `infrastructure/` - External dependency implementations (ports + adapters)
//! - `api/` - HTTP entry points
//! - `app` - Application composition
//! - `config` - Environment configuration

pub mod api;
pub mod app;
pub mod config;
pub mod infrastructure;
pub mod use_cases;

pub use app::App;
