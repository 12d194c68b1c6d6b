use lettre::transport::smtp::authentication::Credentials;
use lettre::{Message, SmtpTransport, Transport};

use crate::config::Config;
use crate::Error;

/// Anything that can hand a finished message over for delivery
pub trait Mailer {
    fn deliver(&self, message: &Message) -> Result<(), Error>;
}

/// Authenticated SMTP submission over a STARTTLS-upgraded connection.
///
/// Every delivery runs EHLO, STARTTLS, AUTH and then the mail transaction.
/// The envelope is taken from the message's `From` and `To` headers.
pub struct SmtpMailer {
    transport: SmtpTransport,
}

impl SmtpMailer {
    pub fn new(config: &Config) -> Result<Self, Error> {
        let credentials = Credentials::new(config.smtp_user.clone(), config.smtp_pwd.clone());

        let transport = SmtpTransport::starttls_relay(&config.smtp_server)?
            .port(config.smtp_port)
            .credentials(credentials)
            .timeout(Some(config.timeout))
            .build();

        Ok(Self { transport })
    }
}

impl Mailer for SmtpMailer {
    fn deliver(&self, message: &Message) -> Result<(), Error> {
        let response = self.transport.send(message)?;

        log::debug!(
            "Server replied {}: {}",
            response.code(),
            response.message().collect::<Vec<_>>().join(" ")
        );

        Ok(())
    }
}
