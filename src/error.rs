use std::io;
use std::time::Duration;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum DriverError {
    #[error("failed to spawn engine `{path}`: {source}")]
    Spawn {
        path: String,
        #[source]
        source: io::Error,
    },

    #[error("failed to read from engine: {0}")]
    Read(#[source] io::Error),

    #[error("failed to send `{command}` to engine: {source}")]
    Write {
        command: String,
        #[source]
        source: io::Error,
    },

    #[error("engine produced no output for {0:?}")]
    Timeout(Duration),

    #[error("engine {0} was not captured")]
    MissingPipe(&'static str),
}
