//! Homeline Channels - SMS Channel Adapter
//!
//! This crate connects the dispatch engine to Twilio:
//! - inbound: decoding of the form-encoded status/message webhook
//! - outbound: `TwilioSender`, the `SmsSender` used for client replies
//!   and operator alerts

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod error;
pub mod twilio;
pub mod util;

pub use error::{Error, Result};

pub use twilio::{parse_form, InboundSms, TwilioConfig, TwilioSender};
