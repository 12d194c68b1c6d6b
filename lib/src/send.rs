use crate::email::Outgoing;
use crate::transport::Mailer;
use crate::Error;

/// What actually went out
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Delivery {
    /// Body and every attachment
    Complete,
    /// Body only, after the full send failed
    WithoutAttachments,
}

fn attempt<M: Mailer + ?Sized>(mailer: &M, mail: &Outgoing) -> Result<(), Error> {
    let message = mail.build()?;
    mailer.deliver(&message)
}

/// Send `mail`, falling back to a single body-only attempt if the full send
/// fails for any reason (unreadable attachment, network, auth, SMTP).
///
/// The fallback is made even when `mail` has no attachments. If it fails too,
/// its error is returned wrapped in `Error::FinalSend`.
pub fn send_with_fallback<M: Mailer + ?Sized>(
    mailer: &M,
    mail: &Outgoing,
) -> Result<Delivery, Error> {
    log::info!(
        "Sending \"{}\" to {} recipient(s) with {} attachment(s)",
        mail.subject,
        mail.recipients.len(),
        mail.attachments.len()
    );

    let err = match attempt(mailer, mail) {
        Ok(()) => return Ok(Delivery::Complete),
        Err(e) => e,
    };

    log::warn!("Send failed ({}), retrying without attachments", err);

    match attempt(mailer, &mail.without_attachments()) {
        Ok(()) => Ok(Delivery::WithoutAttachments),
        Err(e) => {
            log::error!("Send without attachments failed: {}", e);
            Err(Error::FinalSend(Box::new(e)))
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use lettre::Message;
    use std::cell::RefCell;

    static REPORT_PATH: &str = concat!(env!("CARGO_MANIFEST_DIR"), "/resources", "/report.pdf");

    /// Records every message handed to it and fails the first `failures` calls
    struct FakeMailer {
        failures: usize,
        sent: RefCell<Vec<String>>,
    }

    impl FakeMailer {
        fn failing(failures: usize) -> Self {
            Self {
                failures,
                sent: RefCell::new(Vec::new()),
            }
        }

        fn attempts(&self) -> usize {
            self.sent.borrow().len()
        }
    }

    impl Mailer for FakeMailer {
        fn deliver(&self, message: &Message) -> Result<(), Error> {
            let mut sent = self.sent.borrow_mut();
            sent.push(String::from_utf8_lossy(&message.formatted()).into_owned());

            if sent.len() <= self.failures {
                Err(Error::Smtp("535 authentication failed".to_string()))
            } else {
                Ok(())
            }
        }
    }

    fn outgoing(attachments: Vec<&str>) -> Outgoing {
        Outgoing::new("me@x.com", &["a@x.com", "b@x.com"], "Hi", "Hello")
            .unwrap()
            .with_attachments(attachments)
    }

    fn attachment_parts(raw: &str) -> usize {
        raw.matches("Content-Disposition: attachment").count()
    }

    #[test]
    fn first_attempt_succeeds() {
        let mailer = FakeMailer::failing(0);
        let delivery = send_with_fallback(&mailer, &outgoing(vec![REPORT_PATH])).unwrap();

        assert_eq!(delivery, Delivery::Complete);
        assert_eq!(mailer.attempts(), 1);
        assert_eq!(attachment_parts(&mailer.sent.borrow()[0]), 1);
    }

    #[test]
    fn retry_without_attachments() {
        let mailer = FakeMailer::failing(1);
        let delivery = send_with_fallback(&mailer, &outgoing(vec![REPORT_PATH])).unwrap();

        assert_eq!(delivery, Delivery::WithoutAttachments);
        assert_eq!(mailer.attempts(), 2);

        let retry = &mailer.sent.borrow()[1];
        assert_eq!(attachment_parts(retry), 0);
        assert!(retry.contains("To: a@x.com, b@x.com"));
        assert!(retry.contains("Subject: Hi"));
        assert!(retry.contains("Hello"));
    }

    #[test]
    fn unreadable_attachment_falls_back() {
        let mailer = FakeMailer::failing(0);
        let delivery =
            send_with_fallback(&mailer, &outgoing(vec!["/does/not/exist.pdf"])).unwrap();

        // Nothing reached the mailer on the first attempt
        assert_eq!(delivery, Delivery::WithoutAttachments);
        assert_eq!(mailer.attempts(), 1);
    }

    #[test]
    fn both_attempts_fail() {
        let mailer = FakeMailer::failing(2);
        let err = send_with_fallback(&mailer, &outgoing(vec![REPORT_PATH])).unwrap_err();

        assert_eq!(mailer.attempts(), 2);
        assert!(matches!(err, Error::FinalSend(_)));
        assert_eq!(err.exit_code(), 4);
    }

    #[test]
    fn exactly_one_retry() {
        let mailer = FakeMailer::failing(10);
        assert!(send_with_fallback(&mailer, &outgoing(vec![])).is_err());
        assert_eq!(mailer.attempts(), 2);
    }
}
