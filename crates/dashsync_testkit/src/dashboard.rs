//! In-memory dashboard speaking the catalog wire protocol.
//!
//! `FakeDashboard` answers requests the way the real service does:
//! secret-checked, paginated unless `p=-2`, and wrapping every mutation
//! result in a status envelope. Faults can be queued per method.

use dashsync_engine::{
    DashboardClient, DashboardConfig, HttpRequest, HttpResponse, LoopbackClient, LoopbackServer,
    Method, ENDPOINT_APIS,
};
use dashsync_protocol::{ApiDefinition, ApisResponse, RecordId, RemoteRecord, StatusResponse};
use parking_lot::RwLock;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

/// Base URL used by clients built with [`FakeDashboard::client`].
pub const FAKE_BASE_URL: &str = "http://dashboard.test";

/// Records per page when the full listing is not requested.
pub const PAGE_SIZE: usize = 10;

/// A queued one-shot failure.
#[derive(Debug, Clone)]
struct Fault {
    method: Method,
    response: HttpResponse,
}

struct Inner {
    secret: String,
    records: RwLock<Vec<RemoteRecord>>,
    requests: RwLock<Vec<HttpRequest>>,
    faults: RwLock<Vec<Fault>>,
    next_id: AtomicU64,
}

/// An in-memory dashboard.
///
/// Clones share state, so a test can hand one clone to a client and keep
/// another to inspect the catalog.
#[derive(Clone)]
pub struct FakeDashboard {
    inner: Arc<Inner>,
}

impl FakeDashboard {
    /// Creates an empty dashboard that accepts the given secret.
    pub fn new(secret: impl Into<String>) -> Self {
        Self {
            inner: Arc::new(Inner {
                secret: secret.into(),
                records: RwLock::new(Vec::new()),
                requests: RwLock::new(Vec::new()),
                faults: RwLock::new(Vec::new()),
                next_id: AtomicU64::new(0),
            }),
        }
    }

    /// Creates a dashboard already holding the given definitions.
    pub fn with_definitions(secret: impl Into<String>, defs: &[ApiDefinition]) -> Self {
        let dashboard = Self::new(secret);
        for def in defs {
            dashboard.seed(def.clone());
        }
        dashboard
    }

    /// Stores a definition directly, bypassing the wire.
    pub fn seed(&self, def: ApiDefinition) {
        self.inner
            .records
            .write()
            .push(RemoteRecord::from_definition(def));
    }

    /// Builds a client for this dashboard using its own secret.
    pub fn client(&self) -> DashboardClient<LoopbackClient<FakeDashboard>> {
        self.client_with_secret(&self.inner.secret)
    }

    /// Builds a client that sends the given secret.
    pub fn client_with_secret(
        &self,
        secret: &str,
    ) -> DashboardClient<LoopbackClient<FakeDashboard>> {
        let config = DashboardConfig::new(FAKE_BASE_URL, secret);
        DashboardClient::new(&config, LoopbackClient::new(self.clone()))
    }

    /// Returns the stored records.
    pub fn records(&self) -> Vec<RemoteRecord> {
        self.inner.records.read().clone()
    }

    /// Returns the stored definitions.
    pub fn definitions(&self) -> Vec<ApiDefinition> {
        self.records()
            .into_iter()
            .map(|record| record.api_definition)
            .collect()
    }

    /// Returns the stored record with the given id.
    pub fn get(&self, id: &str) -> Option<RemoteRecord> {
        self.inner
            .records
            .read()
            .iter()
            .find(|record| record.id().as_str() == id)
            .cloned()
    }

    /// Returns every request received so far.
    pub fn requests(&self) -> Vec<HttpRequest> {
        self.inner.requests.read().clone()
    }

    /// Returns every non-GET request received so far.
    pub fn writes(&self) -> Vec<HttpRequest> {
        self.inner
            .requests
            .read()
            .iter()
            .filter(|request| request.method != Method::Get)
            .cloned()
            .collect()
    }

    /// Clears the request log.
    pub fn clear_requests(&self) {
        self.inner.requests.write().clear();
    }

    /// Makes the next request with `method` fail with an HTTP status.
    pub fn fail_next(&self, method: Method, status: u16, body: &str) {
        self.inner.faults.write().push(Fault {
            method,
            response: HttpResponse::new(status, body.as_bytes().to_vec()),
        });
    }

    /// Makes the next request with `method` answer HTTP 200 with a failed
    /// status envelope.
    pub fn reject_next(&self, method: Method, message: &str) {
        self.inner.faults.write().push(Fault {
            method,
            response: envelope(200, &StatusResponse::error(message)),
        });
    }

    fn take_fault(&self, method: Method) -> Option<HttpResponse> {
        let mut faults = self.inner.faults.write();
        let index = faults.iter().position(|fault| fault.method == method)?;
        Some(faults.remove(index).response)
    }

    fn assign_id(&self) -> String {
        format!("{:024x}", self.inner.next_id.fetch_add(1, Ordering::SeqCst) + 1)
    }

    fn list(&self, request: &HttpRequest) -> HttpResponse {
        let records = self.inner.records.read();
        let listing = match request.query_param("p") {
            Some("-2") => ApisResponse {
                apis: records.clone(),
                pages: 1,
            },
            page => {
                let page = page.and_then(|p| p.parse::<usize>().ok()).unwrap_or(1).max(1);
                ApisResponse {
                    apis: records
                        .iter()
                        .skip((page - 1).saturating_mul(PAGE_SIZE))
                        .take(PAGE_SIZE)
                        .cloned()
                        .collect(),
                    pages: records.len().div_ceil(PAGE_SIZE) as i64,
                }
            }
        };
        json_response(200, listing.to_json())
    }

    fn create(&self, request: &HttpRequest) -> HttpResponse {
        let mut record = match decode_record(request) {
            Ok(record) => record,
            Err(response) => return response,
        };

        let def = &mut record.api_definition;
        if def.id.is_empty() {
            def.id = RecordId::new(self.assign_id());
        }
        if def.api_id.is_empty() {
            def.api_id = self.assign_id();
        }
        let id = def.id.to_string();

        self.inner.records.write().push(record);
        envelope(200, &StatusResponse::ok(id))
    }

    fn update(&self, id: &str, request: &HttpRequest) -> HttpResponse {
        let mut record = match decode_record(request) {
            Ok(record) => record,
            Err(response) => return response,
        };
        record.api_definition.id = RecordId::new(id);

        let mut records = self.inner.records.write();
        match records.iter_mut().find(|r| r.id().as_str() == id) {
            Some(slot) => {
                *slot = record;
                envelope(200, &StatusResponse::ok(""))
            }
            None => envelope(404, &StatusResponse::error("Could not retrieve API detail")),
        }
    }

    fn delete(&self, id: &str) -> HttpResponse {
        let mut records = self.inner.records.write();
        let before = records.len();
        records.retain(|r| r.id().as_str() != id);
        if records.len() == before {
            return envelope(404, &StatusResponse::error("Could not retrieve API detail"));
        }
        envelope(200, &StatusResponse::ok(""))
    }
}

impl LoopbackServer for FakeDashboard {
    fn handle(&self, path: &str, request: &HttpRequest) -> HttpResponse {
        self.inner.requests.write().push(request.clone());

        if request.header("Authorization") != Some(self.inner.secret.as_str()) {
            return envelope(401, &StatusResponse::error("Not authorised"));
        }
        if let Some(response) = self.take_fault(request.method) {
            return response;
        }

        let path = path.trim_end_matches('/');
        let id = path
            .strip_prefix(ENDPOINT_APIS)
            .and_then(|rest| rest.strip_prefix('/'))
            .filter(|id| !id.is_empty() && !id.contains('/'));

        match (request.method, id) {
            (Method::Get, None) if path == ENDPOINT_APIS => self.list(request),
            (Method::Post, None) if path == ENDPOINT_APIS => self.create(request),
            (Method::Put, Some(id)) => self.update(id, request),
            (Method::Delete, Some(id)) => self.delete(id),
            _ => envelope(404, &StatusResponse::error("Not found")),
        }
    }
}

fn decode_record(request: &HttpRequest) -> Result<RemoteRecord, HttpResponse> {
    let body = request.body.as_deref().unwrap_or_default();
    RemoteRecord::from_json(body)
        .map_err(|e| envelope(400, &StatusResponse::error(format!("Request malformed: {e}"))))
}

fn envelope(status: u16, response: &StatusResponse) -> HttpResponse {
    json_response(status, response.to_json())
}

fn json_response(
    status: u16,
    body: dashsync_protocol::ProtocolResult<Vec<u8>>,
) -> HttpResponse {
    match body {
        Ok(body) => HttpResponse::new(status, body),
        Err(e) => HttpResponse::new(500, e.to_string().into_bytes()),
    }
}
