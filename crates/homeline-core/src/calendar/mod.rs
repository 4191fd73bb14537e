//! Calendar - Appointment booking backends
//!
//! `CalendarClient` is the seam the appointment executor books through.
//! `GoogleCalendarClient` talks to the Google Calendar v3 API with a
//! service-account key.

mod google;

pub use google::{GoogleCalendarClient, GoogleCalendarConfig, ServiceAccountKey, CALENDAR_SCOPE};

use crate::error::Result;
use async_trait::async_trait;
use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

/// A calendar entry to create
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CalendarEvent {
    /// Event title
    pub summary: String,
    /// Local start time
    pub start: NaiveDateTime,
    /// Local end time
    pub end: NaiveDateTime,
    /// IANA zone the local times are in
    pub timezone: String,
}

/// Creates events on an external calendar
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CalendarClient: Send + Sync {
    /// Insert `event`, returning the provider's event id
    async fn create_event(&self, event: &CalendarEvent) -> Result<String>;
}
