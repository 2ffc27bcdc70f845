use tracing::warn;

use super::notify::Toasts;
use crate::{
    client::api::ContactApi,
    model::{ContactInquiryInput, InquiryType},
};

/// Result of a submit attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmitOutcome {
    /// Rejected locally; no request was sent.
    Blocked(&'static str),
    Sent,
    Failed,
}

/// The callback and question forms of the contact page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContactForm {
    kind: InquiryType,
    pub name: String,
    pub phone: String,
    pub email: String,
    pub message: String,
    /// Only offered on the callback form.
    pub preferred_time: Option<String>,
}

impl ContactForm {
    #[must_use]
    pub fn callback() -> Self {
        Self::empty(InquiryType::Callback)
    }

    #[must_use]
    pub fn question() -> Self {
        Self::empty(InquiryType::Question)
    }

    fn empty(kind: InquiryType) -> Self {
        Self {
            kind,
            name: String::new(),
            phone: String::new(),
            email: String::new(),
            message: String::new(),
            preferred_time: None,
        }
    }

    #[must_use]
    pub fn kind(&self) -> InquiryType {
        self.kind
    }

    #[must_use]
    pub fn is_blank(&self) -> bool {
        *self == Self::empty(self.kind)
    }

    fn input(&self) -> ContactInquiryInput {
        ContactInquiryInput {
            name: self.name.clone(),
            phone: self.phone.clone(),
            email: self.email.clone(),
            message: self.message.clone(),
            inquiry_type: self.kind,
            preferred_time: match self.kind {
                InquiryType::Callback => self.preferred_time.clone(),
                InquiryType::Question => None,
            },
        }
    }

    /// Sends the form. Success clears it; failure keeps every field.
    pub async fn submit(&mut self, api: &ContactApi, toasts: &mut Toasts) -> SubmitOutcome {
        let input = self.input();
        if let Some(problem) = input.problem() {
            toasts.error(problem);
            return SubmitOutcome::Blocked(problem);
        }

        let (sent, failed) = match self.kind {
            InquiryType::Callback => (
                "Request submitted! We'll call you back soon.",
                "Failed to submit request. Please try again.",
            ),
            InquiryType::Question => (
                "Question submitted! We'll respond shortly.",
                "Failed to submit question. Please try again.",
            ),
        };

        match api.submit(&input).await {
            Ok(_) => {
                *self = Self::empty(self.kind);
                toasts.success(sent);
                SubmitOutcome::Sent
            }
            Err(err) => {
                warn!(kind = %self.kind, "Failed to submit inquiry: {err}");
                toasts.error(failed);
                SubmitOutcome::Failed
            }
        }
    }
}
