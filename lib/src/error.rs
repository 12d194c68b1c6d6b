use std::path::PathBuf;

/// All possible mailsend errors
#[derive(Debug)]
pub enum Error {
    /// Config file does not exist
    ConfigNotFound(PathBuf),
    /// Config file exists but could not be read
    ConfigIo(String),
    /// Malformed line or undecodable password, with 1-based line number
    ConfigParse { line: usize, msg: String },
    MissingKey(&'static str),
    InvalidValue { key: &'static str, msg: String },
    Address(String),
    Attachment { path: PathBuf, msg: String },
    Message(String),
    Smtp(String),
    /// Both the full send and the fallback send failed.
    /// Holds the error of the fallback attempt.
    FinalSend(Box<Error>),
}

impl Error {
    /// Process exit status for this error
    pub fn exit_code(&self) -> i32 {
        match *self {
            Error::Address(_) => 1,
            Error::ConfigNotFound(_) => 2,
            Error::ConfigIo(_)
            | Error::ConfigParse { .. }
            | Error::MissingKey(_)
            | Error::InvalidValue { .. } => 3,
            Error::Attachment { .. }
            | Error::Message(_)
            | Error::Smtp(_)
            | Error::FinalSend(_) => 4,
        }
    }
}

impl std::fmt::Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        match *self {
            Error::ConfigNotFound(ref path) => {
                write!(f, "Config file not found: {}", path.display())
            }
            Error::ConfigIo(ref msg) => write!(f, "Config: {}", msg),
            Error::ConfigParse { line, ref msg } => {
                write!(f, "Config: line {}: {}", line, msg)
            }
            Error::MissingKey(key) => write!(f, "Config: missing key \"{}\"", key),
            Error::InvalidValue { key, ref msg } => {
                write!(f, "Config: invalid value for \"{}\": {}", key, msg)
            }
            Error::Address(ref msg) => write!(f, "Address: {}", msg),
            Error::Attachment { ref path, ref msg } => {
                write!(f, "Attachment {}: {}", path.display(), msg)
            }
            Error::Message(ref msg) => write!(f, "Message: {}", msg),
            Error::Smtp(ref msg) => write!(f, "SMTP: {}", msg),
            Error::FinalSend(ref e) => write!(f, "Sending failed: {}", e),
        }
    }
}

impl std::error::Error for Error {}

impl From<lettre::address::AddressError> for Error {
    fn from(err: lettre::address::AddressError) -> Self {
        Self::Address(err.to_string())
    }
}

impl From<lettre::error::Error> for Error {
    fn from(err: lettre::error::Error) -> Self {
        Self::Message(err.to_string())
    }
}

impl From<lettre::transport::smtp::Error> for Error {
    fn from(err: lettre::transport::smtp::Error) -> Self {
        Self::Smtp(err.to_string())
    }
}
