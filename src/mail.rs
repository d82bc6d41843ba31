use std::io::Write;
use std::process::{Command, Stdio};

use tracing::debug;

use crate::error::{Result, SvnTriggerError};
use crate::paths::SearchPath;

/// One outgoing notification message
#[derive(Debug, Clone, PartialEq)]
pub struct Email {
    pub to: String,
    pub from: String,
    pub subject: String,
    pub body: String,
}

impl Email {
    pub fn new(
        to: impl Into<String>,
        from: impl Into<String>,
        subject: impl Into<String>,
        body: impl Into<String>,
    ) -> Email {
        Email {
            to: to.into(),
            from: from.into(),
            subject: subject.into(),
            body: body.into(),
        }
    }

    /// The fixed header block. Subjects carry the "[svn] " prefix so
    /// recipients can filter on it.
    pub fn header(&self) -> String {
        format!(
            "To: {}\nFrom: {}\nSubject: [svn] {}\nMIME-version: 1.0\nContent-Type: text/plain; charset=UTF-8\nContent-Transfer-Encoding: 8bit\n",
            self.to, self.from, self.subject
        )
    }

    /// The complete message: header, blank line, body
    pub fn message(&self) -> String {
        format!("{}\n{}", self.header(), self.body)
    }
}

/// Delivery seam for outgoing mail
pub trait MailTransport: Send + Sync {
    fn deliver(&self, email: &Email) -> Result<()>;
}

/// Delivers by piping the message to the system `sendmail` binary
#[derive(Debug, Clone)]
pub struct Sendmail {
    search: SearchPath,
}

impl Sendmail {
    pub fn new(search: SearchPath) -> Sendmail {
        Sendmail { search }
    }
}

impl MailTransport for Sendmail {
    fn deliver(&self, email: &Email) -> Result<()> {
        let sendmail = self.search.find("sendmail")?;
        debug!(to = %email.to, program = %sendmail.display(), "delivering mail");

        let mut child = Command::new(&sendmail)
            .arg(&email.to)
            .stdin(Stdio::piped())
            .stdout(Stdio::null())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(|err| {
                SvnTriggerError::mail(format!("failed to run {}: {}", sendmail.display(), err))
            })?;

        let mut stdin = child
            .stdin
            .take()
            .ok_or_else(|| SvnTriggerError::mail("sendmail stdin unavailable"))?;
        let written = stdin.write_all(email.message().as_bytes());
        // Dropping stdin closes the pipe so sendmail sees EOF.
        drop(stdin);
        if let Err(err) = written {
            // Reap the child even when the write fails.
            let _ = child.wait();
            return Err(SvnTriggerError::mail(format!(
                "failed to write message to {}: {}",
                sendmail.display(),
                err
            )));
        }

        let output = child.wait_with_output()?;
        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(SvnTriggerError::mail(format!(
                "sendmail exited with {}: {}",
                output.status,
                stderr.trim()
            )));
        }
        Ok(())
    }
}
