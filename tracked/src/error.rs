use thiserror::Error;

#[derive(Debug, Error, PartialEq)]
pub enum TrackError {
    #[error("Matrix is not invertible")]
    NotInvertible,

    #[error("Transform stack underflow: restore without matching save")]
    StackUnderflow,

    #[error("Device error:{0}")]
    Device(String),

    #[error("File Error:'{0}'")]
    File(String),

    #[error("Script error at line {line}: {msg}")]
    Script { line: usize, msg: String },
}

pub type Result<T> = std::result::Result<T, TrackError>;
