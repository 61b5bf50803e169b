//! Google Calendar provider for syllabus.
//!
//! - [`GoogleCalendar`] creates and lists events with a bearer token
//! - [`GoogleTokenRefresher`] renews tokens with the app's OAuth credentials
//! - [`SessionStore`] keeps one token set per account on disk

pub mod app_config;
pub mod calendar;
mod convert;
pub mod session;

pub use calendar::GoogleCalendar;
pub use session::{GoogleTokenRefresher, SessionStore, with_saved_session};
