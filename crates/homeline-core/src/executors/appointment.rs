//! schedule-appointment executor
//!
//! Books a fixed one-hour sample slot; the client's requested time is not
//! parsed.

use super::{ActionContext, ActionExecutor};
use crate::actions::ActionKind;
use crate::calendar::{CalendarClient, CalendarEvent};
use crate::error::{Error, Result};
use crate::utils::{mask_for_logging, mask_phone};
use async_trait::async_trait;
use chrono::{Duration, NaiveDate, NaiveDateTime};
use std::sync::Arc;
use tracing::{info, warn};

/// Prompt sent back asking the client for a slot
pub const APPOINTMENT_PROMPT: &str =
    "Sure, what date and time would you like to schedule your appointment for?";

/// Result when no calendar is configured
pub const APPOINTMENT_NOT_CONFIGURED: &str = "Appointment scheduling is not configured";

const EVENT_SUMMARY: &str = "Appointment";

fn sample_slot() -> Result<NaiveDateTime> {
    NaiveDate::from_ymd_opt(2024, 1, 7)
        .and_then(|d| d.and_hms_opt(10, 0, 0))
        .ok_or_else(|| Error::Internal("invalid sample appointment time".to_string()))
}

/// Books appointments on the configured calendar
pub struct AppointmentExecutor {
    calendar: Option<Arc<dyn CalendarClient>>,
    timezone: String,
}

impl AppointmentExecutor {
    /// Executor that reports scheduling as not configured
    #[must_use]
    pub fn disabled() -> Self {
        Self {
            calendar: None,
            timezone: "UTC".to_string(),
        }
    }

    /// Executor booking through `calendar` in `timezone`
    #[must_use]
    pub fn new(calendar: Arc<dyn CalendarClient>, timezone: impl Into<String>) -> Self {
        Self {
            calendar: Some(calendar),
            timezone: timezone.into(),
        }
    }

    /// Whether a calendar is attached
    #[must_use]
    pub fn is_enabled(&self) -> bool {
        self.calendar.is_some()
    }
}

#[async_trait]
impl ActionExecutor for AppointmentExecutor {
    fn kind(&self) -> ActionKind {
        ActionKind::ScheduleAppointment
    }

    async fn execute(&self, ctx: &ActionContext, payload: &str) -> Result<Vec<String>> {
        let Some(calendar) = &self.calendar else {
            warn!(session_key = %mask_phone(&ctx.session_key), "Appointment requested but no calendar configured");
            return Ok(vec![APPOINTMENT_NOT_CONFIGURED.to_string()]);
        };

        let start = sample_slot()?;
        let event = CalendarEvent {
            summary: EVENT_SUMMARY.to_string(),
            start,
            end: start + Duration::hours(1),
            timezone: self.timezone.clone(),
        };

        let event_id = calendar.create_event(&event).await?;
        info!(session_key = %mask_phone(&ctx.session_key), event_id = %event_id, request = %mask_for_logging(payload), "Appointment booked");

        Ok(vec![
            APPOINTMENT_PROMPT.to_string(),
            format!("Your appointment has been booked. Event ID: {event_id}"),
        ])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::calendar::MockCalendarClient;

    #[tokio::test]
    async fn test_not_configured() {
        let exec = AppointmentExecutor::disabled();
        assert!(!exec.is_enabled());
        let out = exec
            .execute(&ActionContext::new("+15550001111"), "Saturday 10am")
            .await
            .unwrap();
        assert_eq!(out, vec![APPOINTMENT_NOT_CONFIGURED.to_string()]);
    }

    #[tokio::test]
    async fn test_books_sample_slot() {
        let mut calendar = MockCalendarClient::new();
        calendar
            .expect_create_event()
            .withf(|event| {
                event.summary == "Appointment"
                    && event.start.to_string() == "2024-01-07 10:00:00"
                    && event.end.to_string() == "2024-01-07 11:00:00"
                    && event.timezone == "America/New_York"
            })
            .times(1)
            .returning(|_| Ok("evt123".to_string()));

        let exec = AppointmentExecutor::new(Arc::new(calendar), "America/New_York");
        let out = exec
            .execute(&ActionContext::new("+15550001111"), "Saturday 10am")
            .await
            .unwrap();
        assert_eq!(
            out,
            vec![
                APPOINTMENT_PROMPT.to_string(),
                "Your appointment has been booked. Event ID: evt123".to_string(),
            ]
        );
    }

    #[tokio::test]
    async fn test_calendar_rejection_propagates() {
        let mut calendar = MockCalendarClient::new();
        calendar
            .expect_create_event()
            .returning(|_| Err(Error::Calendar("403 forbidden".to_string())));

        let exec = AppointmentExecutor::new(Arc::new(calendar), "UTC");
        let err = exec
            .execute(&ActionContext::new("+15550001111"), "now")
            .await
            .unwrap_err();
        assert!(matches!(err, Error::Calendar(_)));
    }
}
