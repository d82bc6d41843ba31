use std::sync::Arc;

use tracing::debug;

use crate::actions::ActionEnv;
use crate::captures::Captures;
use crate::error::Result;
use crate::mail::{Email, MailTransport};
use crate::revision::Revision;
use crate::template::{substitute, TemplateSet};

/// Sends a templated notification when the rule fires.
///
/// The recipient and subject lines undergo placeholder substitution; the
/// body comes from the named template.
pub struct MailAction {
    to: String,
    subject: String,
    template: String,
    from: String,
    templates: Arc<TemplateSet>,
    transport: Arc<dyn MailTransport>,
}

impl MailAction {
    /// Build from a declaration. The template is resolved here so a typo
    /// in the name surfaces at startup, not mid-dispatch.
    pub fn from_config(
        to: &str,
        subject: &str,
        template: &str,
        from: Option<String>,
        env: &ActionEnv,
    ) -> Result<MailAction> {
        env.templates.get(template)?;
        Ok(MailAction {
            to: to.to_string(),
            subject: subject.to_string(),
            template: template.to_string(),
            from: from.unwrap_or_else(|| env.default_from.clone()),
            templates: env.templates.clone(),
            transport: env.transport.clone(),
        })
    }

    pub fn run(&self, revision: &Revision, captures: &Captures) -> Result<()> {
        let to = substitute(&self.to, revision, captures);
        let subject = substitute(&self.subject, revision, captures);
        let body = self.templates.render(&self.template, revision, captures)?;
        debug!(to = %to, template = %self.template, "sending rule notification");

        let email = Email::new(to, self.from.clone(), subject, body);
        self.transport.deliver(&email)
    }
}
