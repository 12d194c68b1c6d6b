use std::path::PathBuf;

use structopt::clap::ErrorKind;
use structopt::StructOpt;

use mailsend::email::split_list;
use mailsend::{Config, Delivery, Mailer, Outgoing, SmtpMailer};

mod error;

use error::Error;

const USAGE: &str = "send-email -c <config_file> -r <recipient1,...,recipientN> -s <subject> -m <message> [-f <file1,...,fileN>]";

#[derive(Debug, StructOpt)]
#[structopt(
    name = "send-email",
    about = "Send an email with attachments via authenticated SMTP over STARTTLS.",
    usage = USAGE
)]
struct Opt {
    /// Credentials file with key=value lines
    #[structopt(short = "c", long = "conf_file", alias = "config_file", parse(from_os_str))]
    conf_file: Option<PathBuf>,

    /// Comma-separated recipient addresses
    #[structopt(short = "r", long = "recepients", alias = "recipients")]
    recipients: Option<String>,

    #[structopt(short = "s", long = "subject")]
    subject: Option<String>,

    /// Message body
    #[structopt(short = "m", long = "message")]
    message: Option<String>,

    /// Comma-separated paths of files to attach
    #[structopt(short = "f", long = "files")]
    files: Option<String>,
}

#[derive(Debug)]
struct Request {
    conf_file: PathBuf,
    recipients: Vec<String>,
    subject: String,
    message: String,
    files: Vec<PathBuf>,
}

#[derive(Debug)]
enum Command {
    /// Nothing to send, just show how to call us
    Usage,
    Send(Request),
}

impl Opt {
    fn into_command(self) -> Result<Command, Error> {
        if self.conf_file.is_none()
            && self.recipients.is_none()
            && self.subject.is_none()
            && self.message.is_none()
            && self.files.is_none()
        {
            return Ok(Command::Usage);
        }

        let conf_file = self.conf_file.ok_or(Error::MissingArgument("-c/--conf_file"))?;
        let recipients = self
            .recipients
            .map(|r| split_list(&r))
            .filter(|r| !r.is_empty())
            .ok_or(Error::MissingArgument("-r/--recepients"))?;
        let subject = self.subject.ok_or(Error::MissingArgument("-s/--subject"))?;
        let message = self.message.ok_or(Error::MissingArgument("-m/--message"))?;
        let files = self
            .files
            .map(|f| split_list(&f).into_iter().map(PathBuf::from).collect())
            .unwrap_or_default();

        Ok(Command::Send(Request {
            conf_file,
            recipients,
            subject,
            message,
            files,
        }))
    }
}

/// Load credentials and send. `connect` is only called once the config file
/// has been found and parsed.
fn send<M, F>(request: Request, connect: F) -> Result<Delivery, Error>
where
    M: Mailer,
    F: FnOnce(&Config) -> Result<M, mailsend::Error>,
{
    if !request.conf_file.exists() {
        return Err(Error::ConfigNotFound(request.conf_file));
    }

    let config = Config::load(&request.conf_file)?;
    log::debug!("Loaded {:?}", config);

    let mail = Outgoing::new(
        &config.sender,
        request.recipients.as_slice(),
        &request.subject,
        &request.message,
    )?
    .with_attachments(request.files);

    let mailer = connect(&config)?;

    Ok(mailsend::send_with_fallback(&mailer, &mail)?)
}

fn run<I>(args: I) -> i32
where
    I: IntoIterator,
    I::Item: Into<std::ffi::OsString> + Clone,
{
    let opt = match Opt::from_iter_safe(args) {
        Ok(opt) => opt,
        Err(e) => match e.kind {
            ErrorKind::HelpDisplayed | ErrorKind::VersionDisplayed => {
                println!("{}", e.message);
                return 0;
            }
            _ => {
                let err = Error::Usage(e.message);
                log::warn!("{}", err);
                println!("{}", USAGE);
                return err.exit_code();
            }
        },
    };

    let result = opt.into_command().and_then(|command| match command {
        Command::Usage => {
            println!("{}", USAGE);
            Ok(None)
        }
        Command::Send(request) => send(request, SmtpMailer::new).map(Some),
    });

    match result {
        Ok(None) => 0,
        Ok(Some(Delivery::Complete)) => {
            println!("Email sent.");
            0
        }
        Ok(Some(Delivery::WithoutAttachments)) => {
            println!("Email sent without attachments.");
            0
        }
        Err(e) => {
            println!("{}", e);
            if e.wants_usage() {
                println!("{}", USAGE);
            }
            e.exit_code()
        }
    }
}

fn main() {
    // Init logger
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn"))
        .format_timestamp_micros()
        .init();

    std::process::exit(run(std::env::args_os()));
}
