//! Core of the syllabus toolchain.
//!
//! This crate turns syllabus text into dated tasks and defines the seams the
//! binaries plug into:
//! - `resolve` and `context` for deterministic date resolution
//! - `event` for the calendar event payload built from a task
//! - `auth` and `sync` for the calendar interface and its token-refresh retry
//! - `storage` for per-owner task persistence
//! - `extract` for document-to-text extraction

pub mod auth;
pub mod clock;
pub mod config;
pub mod context;
pub mod dates;
pub mod error;
pub mod event;
pub mod extract;
pub mod holiday;
pub mod resolve;
pub mod storage;
pub mod sync;
pub mod task;
pub mod weekday;

pub use error::{SyllabusError, SyllabusResult};
pub use resolve::{Resolver, ResolverOptions, resolve};
pub use task::{StoredTask, Task, parse_tasks_json};
