//! Content-Length framed JSON protocol spoken with the editor host over
//! stdin/stdout. The host pushes document text and settings; the server
//! answers with annotation sets and completion items.

mod protocol;
#[allow(clippy::module_inception)]
mod server;

use std::io;
use thiserror::Error;

use crate::engine::{ConfigError, Scratchpad, Settings};
use crate::eval::ExprEvaluator;

pub use protocol::{read_message, write_message, Message, MessageContent};
pub use server::ScratchpadServer;

#[derive(Error, Debug)]
pub enum ServerError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("malformed message: {0}")]
    Json(#[from] serde_json::Error),

    #[error("message without a valid Content-Length header")]
    MissingContentLength,

    #[error("`{0}` requires arguments")]
    MissingArguments(String),

    #[error("invalid arguments for `{command}`: {source}")]
    InvalidArguments {
        command: String,
        source: serde_json::Error,
    },

    #[error("unknown command `{0}`")]
    UnknownCommand(String),

    #[error(transparent)]
    Config(#[from] ConfigError),
}

pub fn run_server_mode(settings: Settings) -> Result<(), ServerError> {
    log::info!("server starting");

    let stdin = io::stdin();
    let stdout = io::stdout();
    let pad = Scratchpad::new(ExprEvaluator::new(), settings);
    let mut server = ScratchpadServer::new(stdin.lock(), stdout.lock(), pad);
    server.run()?;

    log::info!("server exiting");
    Ok(())
}
