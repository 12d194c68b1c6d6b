use std::collections::HashMap;
use std::path::Path;
use std::time::Duration;

use crate::Error;

/// Key whose value is stored base64-encoded in the config file
pub const PASSWORD_KEY: &str = "smtp_pwd";

/// Connect/read timeout used when `smtp_timeout` is not set, in seconds
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Parses `key=value` lines into a map.
///
/// Each line is split on the first `=` only, and both sides are trimmed.
/// The `smtp_pwd` value is base64-decoded. Blank lines are skipped.
pub fn parse_pairs(text: &str) -> Result<HashMap<String, String>, Error> {
    let mut pairs = HashMap::new();

    for (idx, line) in text.lines().enumerate() {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }

        let (key, val) = match line.find('=') {
            Some(pos) => (line[..pos].trim(), line[pos + 1..].trim()),
            None => {
                return Err(Error::ConfigParse {
                    line: idx + 1,
                    msg: "expected key=value".to_string(),
                })
            }
        };

        let val = if key == PASSWORD_KEY {
            decode_password(val).map_err(|msg| Error::ConfigParse { line: idx + 1, msg })?
        } else {
            val.to_string()
        };

        pairs.insert(key.to_string(), val);
    }

    Ok(pairs)
}

fn decode_password(encoded: &str) -> Result<String, String> {
    let bytes = base64::decode(encoded).map_err(|e| format!("{}: {}", PASSWORD_KEY, e))?;
    let decoded = String::from_utf8(bytes).map_err(|e| format!("{}: {}", PASSWORD_KEY, e))?;

    Ok(decoded.trim().to_string())
}

/// Reads a credentials file into a map. See `parse_pairs`.
pub fn load_credentials(path: &Path) -> Result<HashMap<String, String>, Error> {
    let text = std::fs::read_to_string(path).map_err(|e| {
        if e.kind() == std::io::ErrorKind::NotFound {
            Error::ConfigNotFound(path.to_path_buf())
        } else {
            Error::ConfigIo(format!("{}: {}", path.display(), e))
        }
    })?;

    parse_pairs(&text)
}

/// SMTP account settings
#[derive(Clone)]
pub struct Config {
    /// Envelope sender and `From` header
    pub sender: String,
    pub smtp_user: String,
    /// Plain text, already decoded
    pub smtp_pwd: String,
    pub smtp_server: String,
    pub smtp_port: u16,
    pub timeout: Duration,
}

impl Config {
    pub fn load(path: &Path) -> Result<Self, Error> {
        let pairs = load_credentials(path)?;
        Self::from_pairs(&pairs)
    }

    /// Builds a typed config, failing on the first missing or malformed key.
    pub fn from_pairs(pairs: &HashMap<String, String>) -> Result<Self, Error> {
        let get = |key: &'static str| -> Result<String, Error> {
            pairs.get(key).cloned().ok_or(Error::MissingKey(key))
        };

        let smtp_port = get("smtp_port")?
            .parse::<u16>()
            .map_err(|e| Error::InvalidValue {
                key: "smtp_port",
                msg: e.to_string(),
            })?;
        if smtp_port == 0 {
            return Err(Error::InvalidValue {
                key: "smtp_port",
                msg: "port must not be 0".to_string(),
            });
        }

        let timeout = match pairs.get("smtp_timeout") {
            Some(secs) => secs.parse::<u64>().map_err(|e| Error::InvalidValue {
                key: "smtp_timeout",
                msg: e.to_string(),
            })?,
            None => DEFAULT_TIMEOUT_SECS,
        };
        if timeout == 0 {
            return Err(Error::InvalidValue {
                key: "smtp_timeout",
                msg: "timeout must be at least 1 second".to_string(),
            });
        }

        Ok(Self {
            sender: get("sender")?,
            smtp_user: get("smtp_user")?,
            smtp_pwd: get(PASSWORD_KEY)?,
            smtp_server: get("smtp_server")?,
            smtp_port,
            timeout: Duration::from_secs(timeout),
        })
    }
}

impl std::fmt::Debug for Config {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        f.debug_struct("Config")
            .field("sender", &self.sender)
            .field("smtp_user", &self.smtp_user)
            .field("smtp_pwd", &"<hidden>")
            .field("smtp_server", &self.smtp_server)
            .field("smtp_port", &self.smtp_port)
            .field("timeout", &self.timeout)
            .finish()
    }
}
