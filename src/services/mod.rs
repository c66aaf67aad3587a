pub mod mailer;

pub use mailer::{mailer_from_config, EmailMessage, HttpMailer, LogMailer, MailError, Mailer};
