// error.rs

use std::io;
use std::path::PathBuf;

use nix::errno::Errno;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ShellError {
    #[error("{command}: {option}: unsupported option")]
    UnsupportedOption {
        command: &'static str,
        option: String,
    },
    #[error("{command}: too many arguments")]
    TooManyArguments { command: &'static str },
    #[error("{command}: {arg}: numeric argument required")]
    NotANumber { command: &'static str, arg: String },
    #[error("cd: HOME not set")]
    HomeNotSet,
    #[error("cd: {}: {source}", path.display())]
    ChangeDir { path: PathBuf, source: io::Error },
    #[error("pwd: {0}")]
    CurrentDir(#[source] io::Error),
    #[error("help: no help topics match '{0}'.")]
    NoHelpTopic(String),
    #[error("empty command")]
    EmptyCommand,
    #[error("{0}: argument contains a NUL byte")]
    NulByte(String),
    #[error("fork failed: {0}")]
    Fork(Errno),
    #[error("wait failed: {0}")]
    Wait(Errno),
    #[error("exec status pipe: {0}")]
    StatusPipe(Errno),
    #[error(transparent)]
    Io(#[from] io::Error),
}

pub type Result<T> = std::result::Result<T, ShellError>;
