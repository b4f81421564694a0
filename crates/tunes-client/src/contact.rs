//! Contact Form

use tunes_core::wire::ContactRequest;

use crate::api::OrderApi;
use crate::error::{ClientError, Result};

/// Contact form state
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ContactForm {
    pub name: String,
    pub email: String,
    pub subject: String,
    pub message: String,
    in_flight: bool,
    notice: Option<String>,
    error: Option<String>,
}

impl ContactForm {
    pub fn new() -> Self {
        Self::default()
    }

    pub const fn is_in_flight(&self) -> bool {
        self.in_flight
    }

    /// Confirmation from the last successful send
    pub fn notice(&self) -> Option<&str> {
        self.notice.as_deref()
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    fn to_request(&self) -> ContactRequest {
        ContactRequest {
            name: self.name.clone(),
            email: self.email.clone(),
            subject: self.subject.clone(),
            message: self.message.clone(),
        }
    }

    /// Send the form; fields are cleared on success
    pub async fn submit(&mut self, api: &dyn OrderApi) -> Result<()> {
        if self.in_flight {
            return Err(ClientError::Busy);
        }
        self.in_flight = true;
        self.notice = None;
        self.error = None;

        let result = api.send_contact(&self.to_request()).await;
        self.in_flight = false;

        match result {
            Ok(reply) => {
                *self = Self {
                    notice: Some(reply.message),
                    ..Self::default()
                };
                Ok(())
            }
            Err(e) => {
                self.error = Some(e.user_message());
                Err(e)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::driver::tests::FakeApi;

    fn filled() -> ContactForm {
        ContactForm {
            name: "B".into(),
            email: "b@x.com".into(),
            subject: "Hi".into(),
            message: "Hello".into(),
            ..ContactForm::default()
        }
    }

    #[tokio::test]
    async fn test_submit_resets_on_success() {
        let api = FakeApi::default();
        let mut form = filled();

        form.submit(&api).await.unwrap();
        assert!(form.name.is_empty());
        assert!(form.message.is_empty());
        assert_eq!(form.notice(), Some("Your message has been sent successfully!"));
        assert!(!form.is_in_flight());

        let sent = api.contacts.lock().await;
        assert_eq!(sent[0].subject, "Hi");
    }

    #[tokio::test]
    async fn test_submit_keeps_fields_on_error() {
        let api = FakeApi {
            contact_error: Some(ClientError::Rejected("Missing required field: message".into())),
            ..FakeApi::default()
        };
        let mut form = filled();
        form.message.clear();

        assert!(form.submit(&api).await.is_err());
        assert_eq!(form.name, "B");
        assert_eq!(form.error(), Some("Missing required field: message"));
        assert!(!form.is_in_flight());
    }
}
