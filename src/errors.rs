use std::error::Error;
use std::fmt::Display;

/// What went wrong while decoding or resolving a class structure.
#[derive(Debug)]
pub enum UnpackCause {
    /// The stream held fewer bytes than the requested shape needs.
    Truncated {
        format: &'static str,
        wanted: usize,
        present: usize,
    },
    /// The magic header did not match 0xCAFEBABE.
    NotAClassFile,
    /// A dereference was attempted against a pool that was never
    /// unpacked.
    NoPool,
    /// A pool index was zero where a nonzero index is required, points
    /// out of bounds, or lands on an entry of the wrong tag.
    InvalidReference(u16),
    /// An unknown constant tag or descriptor character; the class file
    /// uses features past this parser's knowledge.
    Unimplemented(String),
}

impl Display for UnpackCause {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            UnpackCause::Truncated {
                format,
                wanted,
                present,
            } => {
                write!(
                    f,
                    "Truncated: format {format} requires {wanted} bytes, only {present} present"
                )
            }
            UnpackCause::NotAClassFile => write!(f, "NotAClassFile"),
            UnpackCause::NoPool => write!(f, "NoPool"),
            UnpackCause::InvalidReference(index) => write!(f, "InvalidReference: {index}"),
            UnpackCause::Unimplemented(what) => write!(f, "Unimplemented: {what}"),
        }
    }
}

#[derive(Debug)]
pub struct UnpackError {
    cause: UnpackCause,
    msg: String,
}

impl UnpackError {
    pub fn new(cause: UnpackCause, msg: &str) -> UnpackError {
        UnpackError {
            cause,
            msg: msg.into(),
        }
    }

    pub fn cause(&self) -> &UnpackCause {
        &self.cause
    }
}

impl Error for UnpackError {}

impl Display for UnpackError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Unpack Error: {}, {}", self.cause, self.msg)
    }
}
