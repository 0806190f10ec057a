//! HTTP bus catalog client.
//!
//! Talks to a remote bus API exposing:
//! - `GET {base}/stops/{id}` - a single stop
//! - `GET {base}/stops/{id}/services` - service numbers calling at a stop
//! - `GET {base}/services/{number}/stops` - a service's route in order
//!
//! Name matching happens client-side on the fetched route.

use std::collections::BTreeSet;

use reqwest::StatusCode;
use reqwest::header::{HeaderMap, HeaderName, HeaderValue};
use serde::de::DeserializeOwned;
use tracing::trace;

use crate::domain::{BusService, ServiceNo, Stop, StopId};

use super::BusCatalog;
use super::error::CatalogError;

/// Configuration for the HTTP catalog.
#[derive(Debug, Clone)]
pub struct HttpCatalogConfig {
    /// Base URL of the bus API, without a trailing slash
    pub base_url: String,
    /// Optional key sent as the `x-apikey` header
    pub api_key: Option<String>,
    /// Request timeout in seconds
    pub timeout_secs: u64,
}

impl HttpCatalogConfig {
    /// Create a new config for the given base URL.
    pub fn new(base_url: impl Into<String>) -> Self {
        let base_url: String = base_url.into();
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key: None,
            timeout_secs: 30,
        }
    }

    /// Set the API key.
    pub fn with_api_key(mut self, key: impl Into<String>) -> Self {
        self.api_key = Some(key.into());
        self
    }

    /// Set request timeout.
    pub fn with_timeout(mut self, secs: u64) -> Self {
        self.timeout_secs = secs;
        self
    }
}

/// Bus catalog backed by a remote HTTP API.
#[derive(Debug, Clone)]
pub struct HttpCatalog {
    http: reqwest::Client,
    base_url: String,
}

impl HttpCatalog {
    /// Create a new HTTP catalog client.
    pub fn new(config: HttpCatalogConfig) -> Result<Self, CatalogError> {
        let mut headers = HeaderMap::new();

        if let Some(key) = &config.api_key {
            let value = HeaderValue::from_str(key).map_err(|_| CatalogError::Api {
                status: 0,
                message: "Invalid API key format".to_string(),
            })?;
            headers.insert(HeaderName::from_static("x-apikey"), value);
        }

        let http = reqwest::Client::builder()
            .default_headers(headers)
            .timeout(std::time::Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self {
            http,
            base_url: config.base_url,
        })
    }

    fn stop_url(&self, id: &StopId) -> String {
        format!("{}/stops/{}", self.base_url, id)
    }

    fn stop_services_url(&self, id: &StopId) -> String {
        format!("{}/stops/{}/services", self.base_url, id)
    }

    fn route_url(&self, number: &ServiceNo) -> String {
        format!("{}/services/{}/stops", self.base_url, number)
    }

    /// GET a JSON document. Returns `Ok(None)` on 404.
    async fn get_json<T: DeserializeOwned>(&self, url: &str) -> Result<Option<T>, CatalogError> {
        trace!(url, "GET");
        let response = self.http.get(url).send().await?;
        let status = response.status();

        if status == StatusCode::NOT_FOUND {
            return Ok(None);
        }

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(CatalogError::Api {
                status: status.as_u16(),
                message: body,
            });
        }

        let body = response.text().await?;
        let value = serde_json::from_str(&body).map_err(|e| CatalogError::Json {
            message: e.to_string(),
        })?;

        Ok(Some(value))
    }

    /// Fetch a service's full route.
    pub async fn route(&self, number: &ServiceNo) -> Result<BusService, CatalogError> {
        let stops: Vec<Stop> = self
            .get_json(&self.route_url(number))
            .await?
            .ok_or_else(|| CatalogError::UnknownService(number.clone()))?;
        Ok(BusService::new(number.clone(), stops))
    }
}

impl BusCatalog for HttpCatalog {
    async fn stop(&self, id: &StopId) -> Result<Option<Stop>, CatalogError> {
        let stop: Option<Stop> = self.get_json(&self.stop_url(id)).await?;
        match stop {
            Some(stop) if stop.id != *id => Err(CatalogError::InvalidData(format!(
                "requested stop {id}, got {}",
                stop.id
            ))),
            stop => Ok(stop),
        }
    }

    async fn services_at(&self, stop: &Stop) -> Result<Vec<ServiceNo>, CatalogError> {
        let services: Vec<ServiceNo> = self
            .get_json(&self.stop_services_url(&stop.id))
            .await?
            .unwrap_or_default();

        let unique: BTreeSet<ServiceNo> = services.into_iter().collect();
        Ok(unique.into_iter().collect())
    }

    async fn stops_matching(
        &self,
        service: &ServiceNo,
        fragment: &str,
    ) -> Result<BTreeSet<Stop>, CatalogError> {
        let route = self.route(service).await?;
        Ok(route.find_stops_with(fragment))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn config_defaults() {
        let config = HttpCatalogConfig::new("http://localhost:8080");
        assert_eq!(config.base_url, "http://localhost:8080");
        assert_eq!(config.api_key, None);
        assert_eq!(config.timeout_secs, 30);
    }

    #[test]
    fn config_trims_trailing_slash() {
        let config = HttpCatalogConfig::new("http://localhost:8080/api/");
        assert_eq!(config.base_url, "http://localhost:8080/api");
    }

    #[test]
    fn config_builders() {
        let config = HttpCatalogConfig::new("http://localhost")
            .with_api_key("secret")
            .with_timeout(5);
        assert_eq!(config.api_key.as_deref(), Some("secret"));
        assert_eq!(config.timeout_secs, 5);
    }

    #[test]
    fn urls() {
        let catalog = HttpCatalog::new(HttpCatalogConfig::new("http://bus.test/v1")).unwrap();
        let id = StopId::parse("17009").unwrap();
        let number = ServiceNo::parse("96").unwrap();

        assert_eq!(catalog.stop_url(&id), "http://bus.test/v1/stops/17009");
        assert_eq!(
            catalog.stop_services_url(&id),
            "http://bus.test/v1/stops/17009/services"
        );
        assert_eq!(catalog.route_url(&number), "http://bus.test/v1/services/96/stops");
    }

    #[test]
    fn reject_bad_api_key() {
        let config = HttpCatalogConfig::new("http://localhost").with_api_key("bad\nkey");
        assert!(matches!(
            HttpCatalog::new(config),
            Err(CatalogError::Api { status: 0, .. })
        ));
    }

    #[tokio::test]
    async fn unreachable_host_is_http_error() {
        // Bind then release a port so nothing is listening on it.
        let addr = {
            let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
            listener.local_addr().unwrap()
        };
        let config = HttpCatalogConfig::new(format!("http://{addr}")).with_timeout(2);
        let catalog = HttpCatalog::new(config).unwrap();
        let number = ServiceNo::parse("96").unwrap();

        let err = catalog.stops_matching(&number, "Cent").await.unwrap_err();
        assert!(matches!(err, CatalogError::Http(_)));
    }

    fn stop(id: &str, name: &str) -> Stop {
        Stop::new(StopId::parse(id).unwrap(), name)
    }

    fn svc(s: &str) -> ServiceNo {
        ServiceNo::parse(s).unwrap()
    }

    /// Serve a small bus API on a local port and return its base URL.
    ///
    /// Stop `A` (Alpha) is served by services 1 and 2. Service 1 runs A -> B;
    /// service 2 fails with a 500. Unrouted paths answer 404.
    async fn serve_bus_api() -> String {
        use axum::{Json, Router, routing::get};
        use serde_json::json;

        let app = Router::new()
            .route(
                "/stops/A",
                get(|| async { Json(json!({"id": "A", "name": "Alpha"})) }),
            )
            .route("/stops/A/services", get(|| async { Json(json!(["2", "1", "1"])) }))
            .route(
                "/stops/M",
                get(|| async { Json(json!({"id": "B", "name": "Beta"})) }),
            )
            .route(
                "/stops/L",
                get(|| async { (StatusCode::UNAUTHORIZED, "missing api key") }),
            )
            .route("/stops/J", get(|| async { "not json" }))
            .route(
                "/services/1/stops",
                get(|| async {
                    Json(json!([
                        {"id": "A", "name": "Alpha"},
                        {"id": "B", "name": "Beta"}
                    ]))
                }),
            )
            .route(
                "/services/2/stops",
                get(|| async { (StatusCode::INTERNAL_SERVER_ERROR, "database unavailable") }),
            );

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move { axum::serve(listener, app).await.unwrap() });
        format!("http://{addr}")
    }

    async fn bus_api() -> HttpCatalog {
        HttpCatalog::new(HttpCatalogConfig::new(serve_bus_api().await).with_timeout(5)).unwrap()
    }

    #[tokio::test]
    async fn stop_found_and_missing() {
        let catalog = bus_api().await;

        let found = catalog.stop(&StopId::parse("A").unwrap()).await.unwrap();
        assert_eq!(found, Some(stop("A", "Alpha")));

        let missing = catalog.stop(&StopId::parse("Z").unwrap()).await.unwrap();
        assert_eq!(missing, None);
    }

    #[tokio::test]
    async fn stop_with_different_id_is_invalid() {
        let catalog = bus_api().await;
        let err = catalog
            .stop(&StopId::parse("M").unwrap())
            .await
            .unwrap_err();
        assert!(matches!(err, CatalogError::InvalidData(_)));
        assert_eq!(err.to_string(), "invalid catalog data: requested stop M, got B");
    }

    #[tokio::test]
    async fn error_status_and_bad_body() {
        let catalog = bus_api().await;

        let err = catalog
            .stop(&StopId::parse("L").unwrap())
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            CatalogError::Api { status: 401, ref message } if message == "missing api key"
        ));

        let err = catalog
            .stop(&StopId::parse("J").unwrap())
            .await
            .unwrap_err();
        assert!(matches!(err, CatalogError::Json { .. }));
    }

    #[tokio::test]
    async fn services_at_sorted_without_duplicates() {
        let catalog = bus_api().await;

        let services = catalog.services_at(&stop("A", "Alpha")).await.unwrap();
        assert_eq!(services, vec![svc("1"), svc("2")]);

        // No listing for the stop means no services
        let services = catalog.services_at(&stop("Z", "Zeta")).await.unwrap();
        assert!(services.is_empty());
    }

    #[tokio::test]
    async fn stops_matching_status_mapping() {
        let catalog = bus_api().await;

        let found = catalog.stops_matching(&svc("1"), "beta").await.unwrap();
        assert_eq!(found.into_iter().collect::<Vec<_>>(), vec![stop("B", "Beta")]);

        let err = catalog.stops_matching(&svc("2"), "beta").await.unwrap_err();
        assert!(matches!(
            err,
            CatalogError::Api { status: 500, ref message } if message == "database unavailable"
        ));

        let err = catalog.stops_matching(&svc("9"), "beta").await.unwrap_err();
        assert!(matches!(err, CatalogError::UnknownService(ref n) if *n == svc("9")));
        assert_eq!(err.to_string(), "unknown bus service 9");
    }

    #[tokio::test]
    async fn failing_service_degrades_lookup() {
        use std::sync::{Arc, Mutex};

        use crate::lookup::find_matches;

        let catalog = Arc::new(bus_api().await);
        let reported = Arc::new(Mutex::new(Vec::new()));
        let sink = {
            let reported = Arc::clone(&reported);
            move |message: &str| reported.lock().unwrap().push(message.to_string())
        };

        let origin = stop("A", "Alpha");
        let result = find_matches(&catalog, &sink, Some(&origin), Some("Beta"))
            .await
            .unwrap();

        assert!(result.is_degraded());
        assert!(result.is_empty());
        assert_eq!(
            result.failure(),
            Some(
                "Unable to complete query: lookup for service 2 failed: \
                 API error 500: database unavailable"
            )
        );
        assert_eq!(reported.lock().unwrap().len(), 1);
    }
}
