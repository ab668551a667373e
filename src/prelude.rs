pub use crate::{
    base::{
        config::Config,
        error::{ChatError, ChatResult},
        types::{Err, Res, Void},
    },
    interaction::{pattern::Handler, response::Response},
    runtime::BotClient,
};
pub use anyhow::anyhow;
pub use regex::Regex;
