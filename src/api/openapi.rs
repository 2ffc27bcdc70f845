use super::handlers::{
    admin, auth, blog, contact, favorites, health, payments, projects, resources,
};
use crate::model::{
    Analytics, BlogCategory, BlogPost, BlogPostInput, ContactInquiry, ContactInquiryInput,
    Coordinates, ErrorBody, FloorPlan, InquiryStatus, InquiryType, LoginRequest, MessageResponse,
    PaymentOrder, PaymentOrderRequest, PaymentVerification, Project, ProjectInput, ProjectStatus,
    RegisterRequest, Resource, ResourceCategory, ResourceInput, Role, SubmitReceipt,
    TokenResponse, TransactionStatus, User,
};
use utoipa::{
    openapi::{
        security::{HttpAuthScheme, HttpBuilder, SecurityScheme},
        Contact, InfoBuilder, License,
    },
    Modify, OpenApi,
};

#[derive(OpenApi)]
#[openapi(
    paths(
        health::health,
        auth::register,
        auth::login,
        auth::me,
        projects::list_projects,
        projects::get_project,
        projects::create_project,
        projects::update_project,
        projects::delete_project,
        blog::list_posts,
        blog::get_post,
        blog::create_post,
        contact::submit_inquiry,
        contact::list_inquiries,
        contact::update_inquiry_status,
        resources::list_resources,
        resources::create_resource,
        payments::create_order,
        payments::verify_payment,
        favorites::list_favorites,
        favorites::add_favorite,
        favorites::remove_favorite,
        admin::analytics,
    ),
    components(schemas(
        health::Health,
        Analytics,
        BlogCategory,
        BlogPost,
        BlogPostInput,
        ContactInquiry,
        ContactInquiryInput,
        Coordinates,
        ErrorBody,
        FloorPlan,
        InquiryStatus,
        InquiryType,
        LoginRequest,
        MessageResponse,
        PaymentOrder,
        PaymentOrderRequest,
        PaymentVerification,
        Project,
        ProjectInput,
        ProjectStatus,
        RegisterRequest,
        Resource,
        ResourceCategory,
        ResourceInput,
        Role,
        SubmitReceipt,
        TokenResponse,
        TransactionStatus,
        User,
    )),
    modifiers(&CargoInfo, &BearerAuth),
    tags(
        (name = "health", description = "Service and store health"),
        (name = "auth", description = "Registration, login and the current user"),
        (name = "projects", description = "Project catalog"),
        (name = "blog", description = "News, blog, media and event posts"),
        (name = "contact", description = "Callback requests and questions"),
        (name = "resources", description = "Downloadable documents"),
        (name = "payments", description = "Payment order stub"),
        (name = "favorites", description = "Saved projects of the signed-in user"),
        (name = "admin", description = "Dashboard analytics"),
    )
)]
struct ApiDoc;

#[must_use]
pub fn openapi() -> utoipa::openapi::OpenApi {
    ApiDoc::openapi()
}

struct BearerAuth;

impl Modify for BearerAuth {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi.components.get_or_insert_with(Default::default);
        components.add_security_scheme(
            "bearer",
            SecurityScheme::Http(
                HttpBuilder::new()
                    .scheme(HttpAuthScheme::Bearer)
                    .bearer_format("JWT")
                    .build(),
            ),
        );
    }
}

struct CargoInfo;

impl Modify for CargoInfo {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        // Use Cargo.toml metadata instead of the derive defaults.
        let mut info = InfoBuilder::new()
            .title(env!("CARGO_PKG_NAME"))
            .version(env!("CARGO_PKG_VERSION"))
            .description(optional_str(env!("CARGO_PKG_DESCRIPTION")))
            .build();
        info.contact = cargo_contact();
        info.license = cargo_license();
        openapi.info = info;
    }
}

fn cargo_contact() -> Option<Contact> {
    // Cargo authors are `;` separated and may include "Name <email>".
    let authors = env!("CARGO_PKG_AUTHORS");
    let primary = authors.split(';').next().map(str::trim)?;
    if primary.is_empty() {
        return None;
    }

    let (name, email) = parse_author(primary);
    if name.is_none() && email.is_none() {
        return None;
    }

    let mut contact = Contact::new();
    contact.name = name.map(str::to_string);
    contact.email = email.map(str::to_string);
    Some(contact)
}

fn cargo_license() -> Option<License> {
    let identifier = optional_str(env!("CARGO_PKG_LICENSE"))?;
    let mut license = License::new(identifier);
    license.identifier = Some(identifier.to_string());
    Some(license)
}

fn optional_str(value: &'static str) -> Option<&'static str> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed)
    }
}

fn parse_author(author: &str) -> (Option<&str>, Option<&str>) {
    fn non_empty(value: &str) -> Option<&str> {
        Some(value).filter(|v| !v.is_empty())
    }
    match author.find('<') {
        Some(start) => (
            non_empty(author[..start].trim()),
            non_empty(author[start + 1..].trim_end_matches('>').trim()),
        ),
        None => (non_empty(author.trim()), None),
    }
}
