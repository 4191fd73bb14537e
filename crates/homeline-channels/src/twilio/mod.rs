//! Twilio Programmable Messaging adapter
//!
//! Inbound messages arrive as `application/x-www-form-urlencoded` webhooks
//! with `From`, `To`, `Body` and `MessageSid` among many other fields.
//! Outbound messages go through the Messages REST resource with HTTP basic
//! auth (account SID + auth token).

mod config;
mod inbound;
mod sender;

pub use config::{TwilioConfig, DEFAULT_API_BASE};
pub use inbound::{parse_form, InboundSms};
pub use sender::TwilioSender;
