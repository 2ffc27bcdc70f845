#![allow(dead_code, clippy::unwrap_used, clippy::expect_used)]

use hty_realty::{
    api::{
        self,
        handlers::{
            auth::{bootstrap_admin, token::TokenConfig, AdminSeed},
            payments::PaymentGateway,
        },
        storage::{MemoryStore, SharedStore},
        AppState,
    },
    client::{ApiClient, AuthController, MemorySessionStore, SessionStore},
    model::{ProjectInput, ProjectStatus, RegisterRequest, ResourceCategory, ResourceInput},
};
use secrecy::SecretString;
use std::sync::Arc;
use tokio::{net::TcpListener, sync::oneshot, task::JoinHandle};

pub const JWT_SECRET: &str = "integration-signing-secret";
pub const ADMIN_EMAIL: &str = "admin@htyrealty.com";
pub const ADMIN_PASSWORD: &str = "admin-password";
pub const GATEWAY_KEY_ID: &str = "rzp_test_key";
pub const GATEWAY_SECRET: &str = "gateway-test-secret";

/// A backend on an ephemeral port with an in-memory store. Stops on drop.
pub struct TestServer {
    pub base_url: String,
    shutdown: Option<oneshot::Sender<()>>,
    handle: JoinHandle<()>,
}

impl TestServer {
    pub async fn spawn() -> Self {
        let store: SharedStore = Arc::new(MemoryStore::new());
        bootstrap_admin(
            store.as_ref(),
            &AdminSeed {
                name: "Admin".to_string(),
                email: ADMIN_EMAIL.to_string(),
                password: SecretString::from(ADMIN_PASSWORD.to_string()),
            },
        )
        .await
        .unwrap();

        let state = AppState::new(
            store,
            TokenConfig::new(SecretString::from(JWT_SECRET.to_string()), 30),
            PaymentGateway::new(
                Some(GATEWAY_KEY_ID.to_string()),
                Some(SecretString::from(GATEWAY_SECRET.to_string())),
            ),
        );
        let app = api::router(state, api::cors_layer(&[]).unwrap());

        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let (tx, rx) = oneshot::channel::<()>();
        let handle = tokio::spawn(async move {
            api::serve(listener, app, async {
                let _ = rx.await;
            })
            .await
            .unwrap();
        });

        Self {
            base_url: format!("http://{addr}"),
            shutdown: Some(tx),
            handle,
        }
    }

    pub fn client(&self) -> ApiClient {
        ApiClient::new(&self.base_url).unwrap()
    }

    /// A fresh signed-out controller with its own in-memory session.
    pub fn controller(&self) -> (AuthController, Arc<MemorySessionStore>) {
        let sessions = Arc::new(MemorySessionStore::new());
        let store: Arc<dyn SessionStore> = sessions.clone();
        (AuthController::new(self.client(), store), sessions)
    }

    pub async fn admin(&self) -> AuthController {
        let (mut auth, _) = self.controller();
        auth.login(ADMIN_EMAIL, ADMIN_PASSWORD).await.unwrap();
        auth
    }

    pub async fn user(&self, email: &str) -> AuthController {
        let (mut auth, _) = self.controller();
        auth.register(&RegisterRequest {
            name: "Asha Rao".to_string(),
            email: email.to_string(),
            password: "correct-horse".to_string(),
            phone: Some("+91 98450 00000".to_string()),
        })
        .await
        .unwrap();
        auth
    }
}

impl Drop for TestServer {
    fn drop(&mut self) {
        if let Some(tx) = self.shutdown.take() {
            let _ = tx.send(());
        }
        self.handle.abort();
    }
}

pub fn project(title: &str, slug: &str, status: ProjectStatus) -> ProjectInput {
    ProjectInput {
        title: title.to_string(),
        slug: slug.to_string(),
        tagline: "Homes by the lake".to_string(),
        description: "Two and three bedroom residences.".to_string(),
        location: "Whitefield, Bengaluru".to_string(),
        status,
        hero_image: format!("https://cdn.htyrealty.com/{slug}/hero.jpg"),
        images: Vec::new(),
        amenities: vec!["Clubhouse".to_string(), "Pool".to_string()],
        floor_plans: Vec::new(),
        coordinates: None,
    }
}

pub fn resource(title: &str, requires_auth: bool) -> ResourceInput {
    ResourceInput {
        title: title.to_string(),
        description: "Everything a first-time buyer should know.".to_string(),
        file_url: "https://cdn.htyrealty.com/docs/guide.pdf".to_string(),
        category: ResourceCategory::Ebook,
        requires_auth,
    }
}
