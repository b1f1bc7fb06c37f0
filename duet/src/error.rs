//! Startup failures surfaced by the binary before it exits non-zero.

use std::error::Error;
use std::fmt::{Display, Formatter};
use std::io;

use dprovider::ProviderError;

use crate::ConfigError;

#[derive(Debug)]
pub enum StartupError {
    Config(ConfigError),
    Transport(ProviderError),
    Bind { address: String, source: io::Error },
    Serve(io::Error),
}

impl Display for StartupError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Config(err) => write!(f, "{err}"),
            Self::Transport(err) => write!(f, "failed to build HTTP transport: {err}"),
            Self::Bind { address, source } => write!(f, "failed to bind {address}: {source}"),
            Self::Serve(err) => write!(f, "server error: {err}"),
        }
    }
}

impl Error for StartupError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Config(err) => Some(err),
            Self::Transport(err) => Some(err),
            Self::Bind { source, .. } => Some(source),
            Self::Serve(err) => Some(err),
        }
    }
}

impl From<ConfigError> for StartupError {
    fn from(err: ConfigError) -> Self {
        Self::Config(err)
    }
}

impl From<ProviderError> for StartupError {
    fn from(err: ProviderError) -> Self {
        Self::Transport(err)
    }
}
