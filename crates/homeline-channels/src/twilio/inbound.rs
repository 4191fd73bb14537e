//! Inbound webhook decoding

use crate::error::{Error, Result};

/// Decode a form-encoded webhook body into its fields, in order
///
/// # Errors
///
/// Returns `Error::Parse` if the body is not valid form encoding.
pub fn parse_form(body: &[u8]) -> Result<Vec<(String, String)>> {
    serde_urlencoded::from_bytes(body).map_err(|e| Error::Parse(e.to_string()))
}

/// The fields of an inbound SMS the assistant acts on
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InboundSms {
    /// Sender number; the session key
    pub from: String,
    /// Our number the message was sent to
    pub to: Option<String>,
    /// Message text
    pub body: String,
    /// Twilio message id
    pub message_sid: Option<String>,
}

impl InboundSms {
    /// Extract a message from webhook fields
    ///
    /// Returns `None` for callbacks without a sender or text, such as
    /// delivery status updates.
    #[must_use]
    pub fn from_fields(fields: &[(String, String)]) -> Option<Self> {
        let get = |name: &str| {
            fields
                .iter()
                .find(|(k, _)| k == name)
                .map(|(_, v)| v.clone())
        };

        let from = get("From").filter(|f| !f.trim().is_empty())?;
        let body = get("Body").filter(|b| !b.is_empty())?;

        Some(Self {
            from,
            to: get("To"),
            body,
            message_sid: get("MessageSid").or_else(|| get("SmsSid")),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_twilio_payload() {
        let body = b"ToCountry=US&SmsMessageSid=SM11&NumMedia=0&Body=Is+12+Elm+St+still+available%3F\
&From=%2B15550001111&To=%2B15550009999&MessageSid=SM11";
        let fields = parse_form(body).unwrap();
        assert_eq!(fields[0], ("ToCountry".to_string(), "US".to_string()));

        let sms = InboundSms::from_fields(&fields).unwrap();
        assert_eq!(sms.from, "+15550001111");
        assert_eq!(sms.body, "Is 12 Elm St still available?");
        assert_eq!(sms.to.as_deref(), Some("+15550009999"));
        assert_eq!(sms.message_sid.as_deref(), Some("SM11"));
    }

    #[test]
    fn test_status_callback_is_not_a_message() {
        let fields = parse_form(b"MessageSid=SM11&MessageStatus=delivered&To=%2B15550001111").unwrap();
        assert!(InboundSms::from_fields(&fields).is_none());
    }

    #[test]
    fn test_empty_body_is_not_a_message() {
        let fields = parse_form(b"From=%2B15550001111&Body=").unwrap();
        assert!(InboundSms::from_fields(&fields).is_none());
    }

    #[test]
    fn test_empty_form() {
        assert!(parse_form(b"").unwrap().is_empty());
    }
}
