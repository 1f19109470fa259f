//! J.A.R.V.I.S. library exports for the binary and integration tests

use clap::ValueEnum;

pub mod core;
pub mod inference;
pub mod render;
pub mod server;
pub mod speech;
pub mod tui;

#[cfg(test)]
pub mod test_support;

/// Where the chat client sends its requests.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, ValueEnum)]
pub enum Provider {
    /// A running `jarvis serve`, which holds the API key.
    #[default]
    Proxy,
    /// The upstream API directly, with the locally configured key.
    Gemini,
}

impl Provider {
    pub fn as_str(self) -> &'static str {
        match self {
            Provider::Proxy => "proxy",
            Provider::Gemini => "gemini",
        }
    }
}
