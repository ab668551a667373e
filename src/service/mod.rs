//! Service integrations for the chat platform.
//!
//! This module contains the two edges between the dispatch core and traQ:
//! - The REST API client used to send messages and stamps
//! - The webhook listener that feeds inbound events to the dispatcher
//!
//! The REST client is defined as a generic trait plus a concrete implementation,
//! allowing for extensibility and easy testing.

pub mod api;
pub mod webhook;
