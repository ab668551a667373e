//! Event handling and user interactions.
//!
//! This module is the dispatch core:
//! - Registering listen patterns and their handlers
//! - Deciding which patterns may run for an inbound message
//! - Handing handlers a response context bound to the originating channel and author

pub mod delivery;
pub mod dispatch;
pub mod event;
pub mod pattern;
pub mod response;
pub mod stamps;
