//! Action kinds and key classification

use std::fmt;

/// Key routed to the client reply executor
pub const CLIENT_KEY: &str = "Client";
/// Key routed to the operator alert executor
pub const REALTOR_KEY: &str = "Realtor";
/// Key routed to the secondary agent executor
pub const AI_TEAM_KEY: &str = "AI-Team";

/// Lowercase fragments that mark a key as an appointment request
const APPOINTMENT_MARKERS: &[&str] = &["appointment", "schedule"];

/// The kinds of action the dispatcher can execute
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ActionKind {
    /// Text the client should receive
    ClientReply,
    /// Escalation to the human operator (realtor)
    OperatorAlert,
    /// Query for the secondary automated agent
    SecondaryAgentQuery,
    /// Appointment booking request
    ScheduleAppointment,
}

impl ActionKind {
    /// Short label used in logs and degraded results
    #[must_use]
    pub fn label(&self) -> &'static str {
        match self {
            Self::ClientReply => "notify-client",
            Self::OperatorAlert => "notify-operator",
            Self::SecondaryAgentQuery => "secondary-agent",
            Self::ScheduleAppointment => "schedule-appointment",
        }
    }
}

impl fmt::Display for ActionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// One dispatchable instruction with its text payload
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PlannerAction {
    /// Reply to the client
    ClientReply(String),
    /// Alert the operator
    OperatorAlert(String),
    /// Ask the secondary agent
    SecondaryAgentQuery(String),
    /// Book an appointment
    ScheduleAppointment(String),
}

impl PlannerAction {
    /// Build an action of `kind` carrying `payload`
    #[must_use]
    pub fn new(kind: ActionKind, payload: impl Into<String>) -> Self {
        let payload = payload.into();
        match kind {
            ActionKind::ClientReply => Self::ClientReply(payload),
            ActionKind::OperatorAlert => Self::OperatorAlert(payload),
            ActionKind::SecondaryAgentQuery => Self::SecondaryAgentQuery(payload),
            ActionKind::ScheduleAppointment => Self::ScheduleAppointment(payload),
        }
    }

    /// The action's kind
    #[must_use]
    pub fn kind(&self) -> ActionKind {
        match self {
            Self::ClientReply(_) => ActionKind::ClientReply,
            Self::OperatorAlert(_) => ActionKind::OperatorAlert,
            Self::SecondaryAgentQuery(_) => ActionKind::SecondaryAgentQuery,
            Self::ScheduleAppointment(_) => ActionKind::ScheduleAppointment,
        }
    }

    /// The action's text payload
    #[must_use]
    pub fn payload(&self) -> &str {
        match self {
            Self::ClientReply(p)
            | Self::OperatorAlert(p)
            | Self::SecondaryAgentQuery(p)
            | Self::ScheduleAppointment(p) => p,
        }
    }
}

/// Map a raw planner key to the action kinds it triggers
///
/// Matching is non-exclusive. The three routing keys match exactly and
/// case-sensitively; independently, any key containing "appointment" or
/// "schedule" in any case also triggers `ScheduleAppointment`. The routed
/// kind, if any, comes first. Unknown keys map to nothing.
#[must_use]
pub fn classify_key(key: &str) -> Vec<ActionKind> {
    let mut kinds = Vec::with_capacity(2);

    match key {
        CLIENT_KEY => kinds.push(ActionKind::ClientReply),
        REALTOR_KEY => kinds.push(ActionKind::OperatorAlert),
        AI_TEAM_KEY => kinds.push(ActionKind::SecondaryAgentQuery),
        _ => {}
    }

    let lower = key.to_lowercase();
    if APPOINTMENT_MARKERS.iter().any(|m| lower.contains(m)) {
        kinds.push(ActionKind::ScheduleAppointment);
    }

    kinds
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_primary_routes() {
        assert_eq!(classify_key("Client"), vec![ActionKind::ClientReply]);
        assert_eq!(classify_key("Realtor"), vec![ActionKind::OperatorAlert]);
        assert_eq!(
            classify_key("AI-Team"),
            vec![ActionKind::SecondaryAgentQuery]
        );
    }

    #[test]
    fn test_primary_routes_are_case_sensitive() {
        assert!(classify_key("client").is_empty());
        assert!(classify_key("REALTOR").is_empty());
        assert!(classify_key("ai-team").is_empty());
    }

    #[test]
    fn test_appointment_markers_any_case() {
        for key in [
            "Appointment request",
            "schedule",
            "SCHEDULE-VIEWING",
            "Schedule-Appointment",
            "bookAppointment",
        ] {
            assert_eq!(
                classify_key(key),
                vec![ActionKind::ScheduleAppointment],
                "key {key}"
            );
        }
    }

    #[test]
    fn test_unknown_keys_map_to_nothing() {
        assert!(classify_key("Lender").is_empty());
        assert!(classify_key("").is_empty());
    }

    #[test]
    fn test_action_accessors() {
        let action = PlannerAction::new(ActionKind::OperatorAlert, "Escalate now");
        assert_eq!(action, PlannerAction::OperatorAlert("Escalate now".to_string()));
        assert_eq!(action.kind(), ActionKind::OperatorAlert);
        assert_eq!(action.payload(), "Escalate now");
        assert_eq!(action.kind().to_string(), "notify-operator");
    }
}
