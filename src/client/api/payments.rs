use crate::{
    client::{error::ClientError, http::ApiClient},
    model::{MessageResponse, PaymentOrder, PaymentOrderRequest, PaymentVerification},
};

#[derive(Debug, Clone)]
pub struct PaymentsApi {
    client: ApiClient,
}

impl PaymentsApi {
    pub(crate) fn new(client: ApiClient) -> Self {
        Self { client }
    }

    /// # Errors
    /// `Server` with status 503 when the gateway has no keys.
    pub async fn create_order(
        &self,
        request: &PaymentOrderRequest,
    ) -> Result<PaymentOrder, ClientError> {
        self.client
            .post(&["payments", "create-order"], request)
            .await
    }

    /// # Errors
    /// `Validation` when the signature does not match.
    pub async fn verify(
        &self,
        verification: &PaymentVerification,
    ) -> Result<MessageResponse, ClientError> {
        self.client
            .post(&["payments", "verify"], verification)
            .await
    }
}
