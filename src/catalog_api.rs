// Functions to interact with the dealership catalog API (listing vehicles,
// single-vehicle lookup). The controller talks to this through the
// `CatalogApi` trait so tests can substitute a scripted implementation.

use async_trait::async_trait;
use reqwest::{Client, Response};
use serde::Deserialize;

use crate::error::CatalogError;
use crate::models::{Vehicle, VehicleQuery};

#[async_trait]
pub trait CatalogApi: Send + Sync {
    /// Fetches one page of vehicles matching the query. An empty page is a
    /// valid response and signals exhaustion, not an error.
    async fn list_vehicles(&self, query: &VehicleQuery) -> Result<Vec<Vehicle>, CatalogError>;

    /// Looks up a single vehicle. The backend matches the path segment
    /// against id or slug, so either works here.
    async fn vehicle_by_slug(&self, slug: &str) -> Result<Vehicle, CatalogError>;
}

/// Error body shape the backend uses for failure responses.
#[derive(Debug, Deserialize)]
struct ErrorBody {
    detail: Option<String>,
}

/// reqwest-backed client for the real catalog API.
pub struct HttpCatalogApi {
    client: Client,
    base_url: String,
}

impl HttpCatalogApi {
    pub fn new(client: Client, base_url: impl Into<String>) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        HttpCatalogApi { client, base_url }
    }

    /// Turns a failure status into a `CatalogError::Service`, pulling the
    /// backend's `detail` field out of the body when it parses.
    async fn check(response: Response) -> Result<Response, CatalogError> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }
        let detail = response
            .json::<ErrorBody>()
            .await
            .ok()
            .and_then(|body| body.detail);
        Err(CatalogError::Service {
            status: status.as_u16(),
            detail,
        })
    }
}

#[async_trait]
impl CatalogApi for HttpCatalogApi {
    async fn list_vehicles(&self, query: &VehicleQuery) -> Result<Vec<Vehicle>, CatalogError> {
        let url = format!("{}/vehicles", self.base_url);
        tracing::debug!(%url, skip = query.skip, "requesting vehicle page");

        let response = self
            .client
            .get(&url)
            .query(&query.to_query_pairs())
            .send()
            .await?;

        let vehicles = Self::check(response).await?.json::<Vec<Vehicle>>().await?;
        Ok(vehicles)
    }

    async fn vehicle_by_slug(&self, slug: &str) -> Result<Vehicle, CatalogError> {
        let url = format!("{}/vehicles/{}", self.base_url, slug);
        tracing::debug!(%url, "requesting vehicle detail");

        let response = self.client.get(&url).send().await?;
        let vehicle = Self::check(response).await?.json::<Vehicle>().await?;
        Ok(vehicle)
    }
}
