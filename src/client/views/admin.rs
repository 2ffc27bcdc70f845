//! Admin dashboard: analytics snapshot and inquiry triage.

use tracing::info;
use uuid::Uuid;

use super::{notify::Toasts, report_failure, Route};
use crate::{
    client::{auth::AuthController, error::ClientError, http::ApiClient},
    model::{Analytics, ContactInquiry, InquiryStatus},
};

/// Inquiries shown on the dashboard; the server returns them newest first.
pub const RECENT_INQUIRIES: usize = 10;

#[derive(Debug, Default)]
pub struct AdminView {
    analytics: Analytics,
    inquiries: Vec<ContactInquiry>,
}

impl AdminView {
    /// # Errors
    /// Redirects home unless the session belongs to an admin, and to login
    /// when the server rejects the session token.
    pub async fn open(auth: &mut AuthController, toasts: &mut Toasts) -> Result<Self, Route> {
        if !auth.is_admin() {
            return Err(Route::Home);
        }

        let mut view = Self::default();
        match view.reload(auth, toasts).await {
            Some(route) => Err(route),
            None => Ok(view),
        }
    }

    /// Refetches analytics and inquiries together. On failure the previous
    /// snapshot stays in place and a notification is pushed.
    pub async fn reload(
        &mut self,
        auth: &mut AuthController,
        toasts: &mut Toasts,
    ) -> Option<Route> {
        let fetched = fetch(auth.client()).await;
        match fetched {
            Ok((analytics, inquiries)) => {
                self.analytics = analytics;
                self.inquiries = inquiries;
                None
            }
            Err(err) => report_failure(auth, &err, toasts, "Failed to load dashboard data").await,
        }
    }

    /// Sets an inquiry's status, then refetches everything.
    pub async fn update_status(
        &mut self,
        auth: &mut AuthController,
        id: Uuid,
        status: InquiryStatus,
        toasts: &mut Toasts,
    ) -> Option<Route> {
        let updated = auth.client().contact().update_status(id, status).await;
        if let Err(err) = updated {
            return report_failure(auth, &err, toasts, "Failed to update status").await;
        }
        info!(%id, %status, "Inquiry status updated");
        self.reload(auth, toasts).await
    }

    #[must_use]
    pub fn analytics(&self) -> &Analytics {
        &self.analytics
    }

    #[must_use]
    pub fn inquiries(&self) -> &[ContactInquiry] {
        &self.inquiries
    }
}

async fn fetch(client: &ApiClient) -> Result<(Analytics, Vec<ContactInquiry>), ClientError> {
    let admin = client.admin();
    let contact = client.contact();
    let (analytics, mut inquiries) = tokio::try_join!(admin.analytics(), contact.list(None))?;
    inquiries.truncate(RECENT_INQUIRIES);
    Ok((analytics, inquiries))
}
