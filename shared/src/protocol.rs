use serde::{Deserialize, Serialize, de::DeserializeOwned};

use crate::{
    AuthResponse, Deployment, DeploymentDraft, Integration, IntegrationDraft, InventoryItem,
    InventoryItemDraft, Payment, Reservation, ReservationDraft, ServiceConfig, ServiceConfigDraft,
    UserInfo,
};

/// HTTP Methods for API Requests
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum HttpMethod {
    Get,
    Post,
    Put,
    Patch,
    Delete,
}

impl HttpMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Get => "GET",
            Self::Post => "POST",
            Self::Put => "PUT",
            Self::Patch => "PATCH",
            Self::Delete => "DELETE",
        }
    }

    /// Whether requests with this method carry a JSON body.
    pub fn has_body(&self) -> bool {
        !matches!(self, Self::Get | Self::Delete)
    }
}

/// A trait that defines the request-response relationship and metadata for an
/// API endpoint. The response type is decoded at the HTTP boundary, so callers
/// never touch untyped JSON.
pub trait ApiRequest: Serialize {
    /// The response type returned by this request.
    type Response: DeserializeOwned;
    /// The HTTP method.
    const METHOD: HttpMethod;
    /// The URL path (relative to the API base).
    fn path(&self) -> String;
}

// =========================================================
// Auth endpoints
// =========================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

impl ApiRequest for LoginRequest {
    type Response = AuthResponse;
    const METHOD: HttpMethod = HttpMethod::Post;

    fn path(&self) -> String {
        "/auth/login".to_string()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegisterRequest {
    pub name: String,
    pub email: String,
    pub password: String,
}

impl ApiRequest for RegisterRequest {
    type Response = AuthResponse;
    const METHOD: HttpMethod = HttpMethod::Post;

    fn path(&self) -> String {
        "/auth/register".to_string()
    }
}

/// Best-effort server-side session invalidation. The client clears its local
/// state regardless of the outcome.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LogoutRequest;

impl ApiRequest for LogoutRequest {
    type Response = ();
    const METHOD: HttpMethod = HttpMethod::Post;

    fn path(&self) -> String {
        "/auth/logout".to_string()
    }
}

/// Queries the server for the session bound to the current bearer token.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StatusRequest;

impl ApiRequest for StatusRequest {
    type Response = UserInfo;
    const METHOD: HttpMethod = HttpMethod::Get;

    fn path(&self) -> String {
        "/auth/status".to_string()
    }
}

// =========================================================
// Report endpoints
// =========================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportSummaryRequest;

impl ApiRequest for ReportSummaryRequest {
    type Response = crate::ReportSummary;
    const METHOD: HttpMethod = HttpMethod::Get;

    fn path(&self) -> String {
        "/reports/summary".to_string()
    }
}

// =========================================================
// Entity CRUD
// =========================================================

/// A CRUD resource served under a fixed base path with the standard
/// pagination envelope. `Draft` is the create/update payload (no id; the
/// server assigns identifiers).
pub trait Entity: Serialize + DeserializeOwned + Clone {
    type Draft: Serialize;
    const BASE_PATH: &'static str;

    fn id(&self) -> &str;
}

impl Entity for Reservation {
    type Draft = ReservationDraft;
    const BASE_PATH: &'static str = "/reservations";

    fn id(&self) -> &str {
        &self.id
    }
}

impl Entity for InventoryItem {
    type Draft = InventoryItemDraft;
    const BASE_PATH: &'static str = "/inventory";

    fn id(&self) -> &str {
        &self.id
    }
}

impl Entity for ServiceConfig {
    type Draft = ServiceConfigDraft;
    const BASE_PATH: &'static str = "/services";

    fn id(&self) -> &str {
        &self.id
    }
}

impl Entity for Integration {
    type Draft = IntegrationDraft;
    const BASE_PATH: &'static str = "/integrations";

    fn id(&self) -> &str {
        &self.id
    }
}

impl Entity for Deployment {
    type Draft = DeploymentDraft;
    const BASE_PATH: &'static str = "/deployments";

    fn id(&self) -> &str {
        &self.id
    }
}

/// Payments are read-only on this client; creation happens through the
/// payment provider. The draft type is uninhabited-by-convention.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NoDraft;

impl Entity for Payment {
    type Draft = NoDraft;
    const BASE_PATH: &'static str = "/payments";

    fn id(&self) -> &str {
        &self.id
    }
}
