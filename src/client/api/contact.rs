use uuid::Uuid;

use super::filter;
use crate::{
    client::{error::ClientError, http::ApiClient},
    model::{ContactInquiry, ContactInquiryInput, InquiryStatus, MessageResponse, SubmitReceipt},
};

#[derive(Debug, Clone)]
pub struct ContactApi {
    client: ApiClient,
}

impl ContactApi {
    pub(crate) fn new(client: ApiClient) -> Self {
        Self { client }
    }

    /// # Errors
    /// `Validation` when a required field is missing or the email is malformed.
    pub async fn submit(&self, input: &ContactInquiryInput) -> Result<SubmitReceipt, ClientError> {
        self.client.post(&["contact"], input).await
    }

    /// Inquiries newest first; admin only.
    ///
    /// # Errors
    /// `Auth` without a token, `Forbidden` for non-admins.
    pub async fn list(
        &self,
        status: Option<InquiryStatus>,
    ) -> Result<Vec<ContactInquiry>, ClientError> {
        self.client
            .get(&["contact"], &filter("status", status))
            .await
    }

    /// # Errors
    /// `NotFound` for an unknown inquiry, `Forbidden` for non-admins.
    pub async fn update_status(
        &self,
        id: Uuid,
        status: InquiryStatus,
    ) -> Result<MessageResponse, ClientError> {
        let id = id.to_string();
        self.client
            .put::<(), _>(
                &["contact", id.as_str(), "status"],
                &filter("status", Some(status)),
                None,
            )
            .await
    }
}
