use std::path::PathBuf;

pub const EXIT_USAGE: i32 = 1;
pub const EXIT_NO_CONFIG: i32 = 2;

#[derive(Debug)]
pub enum Error {
    /// Flags could not be parsed
    Usage(String),
    /// A required flag was left out; holds the flag
    MissingArgument(&'static str),
    ConfigNotFound(PathBuf),
    Mail(mailsend::Error),
}

impl Error {
    pub fn exit_code(&self) -> i32 {
        match *self {
            Error::Usage(_) | Error::MissingArgument(_) => EXIT_USAGE,
            Error::ConfigNotFound(_) => EXIT_NO_CONFIG,
            Error::Mail(ref e) => e.exit_code(),
        }
    }

    /// Whether the usage line should be printed along with this error
    pub fn wants_usage(&self) -> bool {
        match *self {
            Error::Usage(_) | Error::MissingArgument(_) => true,
            _ => false,
        }
    }
}

impl std::error::Error for Error {}

impl std::fmt::Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        match *self {
            Error::Usage(ref msg) => write!(f, "ERROR: {}", msg),
            Error::MissingArgument(flag) => write!(f, "ERROR: missing required argument {}", flag),
            Error::ConfigNotFound(ref path) => write!(
                f,
                "ERROR: specified configuration does not exist. ({})",
                path.display()
            ),
            Error::Mail(ref e) => write!(f, "ERROR: {}", e),
        }
    }
}

impl From<mailsend::Error> for Error {
    fn from(err: mailsend::Error) -> Self {
        match err {
            mailsend::Error::ConfigNotFound(path) => Self::ConfigNotFound(path),
            err => Self::Mail(err),
        }
    }
}
