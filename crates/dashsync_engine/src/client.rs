//! Dashboard REST client.

use crate::catalog::Catalog;
use crate::config::DashboardConfig;
use crate::error::{SyncError, SyncResult};
use crate::http::{join_url, HttpClient, HttpRequest, HttpResponse, Method};
use crate::identity::{find_by_id, find_match};
use dashsync_protocol::{ApiDefinition, ApisResponse, RecordId, RemoteRecord, StatusResponse};
use tracing::debug;

/// Resource path of the API catalog.
pub const ENDPOINT_APIS: &str = "/api/apis";

/// Page parameter value that asks the dashboard for an unpaginated listing.
const ALL_PAGES: &str = "-2";

/// Catalog client for a dashboard's REST API.
///
/// Every request carries the configured secret in the `Authorization`
/// header. Each call issues exactly one write; `create` and `update` list
/// the catalog first to check their preconditions.
pub struct DashboardClient<C: HttpClient> {
    base_url: String,
    secret: String,
    http: C,
}

impl<C: HttpClient> DashboardClient<C> {
    /// Creates a client for the configured dashboard.
    pub fn new(config: &DashboardConfig, http: C) -> Self {
        Self {
            base_url: config.base_url.trim_end_matches('/').to_string(),
            secret: config.secret.clone(),
            http,
        }
    }

    /// Returns the base URL.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Returns the underlying HTTP client.
    pub fn http(&self) -> &C {
        &self.http
    }

    fn request(&self, method: Method, id: Option<&RecordId>) -> HttpRequest {
        let url = match id {
            Some(id) => join_url(&self.base_url, &[ENDPOINT_APIS, id.as_str()]),
            None => join_url(&self.base_url, &[ENDPOINT_APIS]),
        };
        HttpRequest::new(method, url).with_header("Authorization", self.secret.as_str())
    }

    fn send(&self, request: HttpRequest) -> SyncResult<HttpResponse> {
        self.http.send(request).map_err(SyncError::transport)
    }

    /// Sends a create or update and unwraps the status envelope.
    fn send_mutation(&self, request: HttpRequest) -> SyncResult<StatusResponse> {
        let response = self.send(request)?;
        if response.status != 200 {
            return Err(SyncError::http_status(response.status, response.text()));
        }

        let status = StatusResponse::from_json(&response.body).map_err(|e| {
            SyncError::http_status(response.status, format!("invalid response body: {e}"))
        })?;
        if !status.is_ok() {
            return Err(SyncError::rejected(status.message));
        }
        Ok(status)
    }
}

impl<C: HttpClient> Catalog for DashboardClient<C> {
    fn list(&self) -> SyncResult<Vec<RemoteRecord>> {
        let request = self.request(Method::Get, None).with_query("p", ALL_PAGES);
        let response = self.send(request)?;
        if !response.is_success() {
            return Err(SyncError::http_status(response.status, response.text()));
        }

        let listing = ApisResponse::from_json(&response.body).map_err(|e| {
            SyncError::http_status(response.status, format!("invalid api listing: {e}"))
        })?;
        debug!(count = listing.apis.len(), "listed dashboard apis");
        Ok(listing.apis)
    }

    fn create(&self, def: &ApiDefinition) -> SyncResult<String> {
        let listing = self.list()?;
        if let Some(m) = find_match(def, &listing) {
            return Err(SyncError::AlreadyExists {
                key: m.key,
                value: m.value().to_string(),
            });
        }

        let body = RemoteRecord::from_definition(def.clone()).to_json()?;
        let status = self.send_mutation(self.request(Method::Post, None).with_json_body(body))?;
        Ok(status.meta)
    }

    fn update(&self, def: &mut ApiDefinition) -> SyncResult<()> {
        let listing = self.list()?;
        let existing = find_by_id(&def.id, &listing).ok_or_else(|| SyncError::NotFound {
            id: def.id.clone(),
        })?;
        if def.api_id.is_empty() {
            def.api_id = existing.api_id().to_string();
        }

        let body = RemoteRecord::from_definition(def.clone()).to_json()?;
        let request = self.request(Method::Put, Some(&def.id)).with_json_body(body);
        self.send_mutation(request)?;
        Ok(())
    }

    fn delete(&self, id: &RecordId) -> SyncResult<()> {
        let response = self.send(self.request(Method::Delete, Some(id)))?;
        if response.status != 200 {
            return Err(SyncError::http_status(response.status, response.text()));
        }

        // Older dashboards answer deletes with an empty body.
        match StatusResponse::from_json(&response.body) {
            Ok(status) if !status.status.is_empty() && !status.is_ok() => {
                Err(SyncError::rejected(status.message))
            }
            _ => Ok(()),
        }
    }
}
