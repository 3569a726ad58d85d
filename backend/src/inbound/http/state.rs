//! Shared HTTP adapter state.
//!
//! HTTP handlers accept this state via `actix_web::web::Data` so they only
//! depend on domain ports (use-cases) and remain testable without I/O.

use std::sync::Arc;

use crate::domain::DocumentId;
use crate::domain::ports::{AuthGate, BusinessCatalogue, CatalogueCommand, CatalogueQuery};

/// Parameter object bundling all port implementations for HTTP handlers.
#[derive(Clone)]
pub struct HttpStatePorts {
    pub catalogue_query: Arc<dyn CatalogueQuery>,
    pub catalogue_command: Arc<dyn CatalogueCommand>,
    pub businesses: Arc<dyn BusinessCatalogue>,
    pub auth: Arc<dyn AuthGate>,
}

/// Dependency bundle for HTTP handlers.
#[derive(Clone)]
pub struct HttpState {
    pub catalogue_query: Arc<dyn CatalogueQuery>,
    pub catalogue_command: Arc<dyn CatalogueCommand>,
    pub businesses: Arc<dyn BusinessCatalogue>,
    pub auth: Arc<dyn AuthGate>,
    /// Absolute base used to build the `url` returned by business endpoints.
    pub public_base_url: String,
}

impl HttpState {
    /// Construct state from a ports bundle and the externally visible base
    /// URL. A trailing slash on the base URL is ignored.
    ///
    /// # Examples
    /// ```no_run
    /// use std::sync::Arc;
    ///
    /// use food_places::inbound::http::state::{HttpState, HttpStatePorts};
    /// # fn ports() -> HttpStatePorts { unimplemented!() }
    ///
    /// let state = HttpState::new(ports(), "http://127.0.0.1:2000/");
    /// assert_eq!(state.public_base_url, "http://127.0.0.1:2000");
    /// ```
    pub fn new(ports: HttpStatePorts, public_base_url: impl Into<String>) -> Self {
        let HttpStatePorts {
            catalogue_query,
            catalogue_command,
            businesses,
            auth,
        } = ports;
        let public_base_url = public_base_url.into().trim_end_matches('/').to_owned();
        Self {
            catalogue_query,
            catalogue_command,
            businesses,
            auth,
            public_base_url,
        }
    }

    /// Absolute URL of a business resource.
    pub fn business_url(&self, id: &DocumentId) -> String {
        format!("{}/api/v1.0/businesses/{id}", self.public_base_url)
    }

    /// Absolute URL of a review embedded in a business.
    pub fn business_review_url(&self, id: &DocumentId, review_id: &DocumentId) -> String {
        format!("{}/reviews/{review_id}", self.business_url(id))
    }
}
