//! Send an email with optional file attachments through an authenticated,
//! STARTTLS-upgraded SMTP session.

pub mod config;
pub mod email;
pub mod error;
pub mod send;
pub mod transport;

pub use lettre::Message;

pub use config::Config;
pub use email::Outgoing;
pub use error::Error;
pub use send::{send_with_fallback, Delivery};
pub use transport::{Mailer, SmtpMailer};
