//! Provider implementation reading bin status from the IoT backend's REST API.

use std::sync::Arc;

use async_trait::async_trait;
use reqwest::{Client, RequestBuilder};
use serde::de::DeserializeOwned;

use smartbin_core::{
    config::DEFAULT_ENDPOINT,
    model::BinStatusResponse,
    ports::{BinStatusPort, PortError},
    service::SmartBinService,
};

/// Bin status backed by `GET <endpoint>`.
pub struct HttpBinStatusPort {
    client: Client,
    endpoint: String,
}

impl HttpBinStatusPort {
    /// Create a port bound to the given HTTP client and endpoint URL.
    #[must_use]
    pub fn new(client: Client, endpoint: impl Into<String>) -> Self {
        Self {
            client,
            endpoint: endpoint.into(),
        }
    }

    /// Create a port for the local development backend.
    #[must_use]
    pub fn local(client: Client) -> Self {
        Self::new(client, DEFAULT_ENDPOINT)
    }
}

#[async_trait]
impl BinStatusPort for HttpBinStatusPort {
    fn source(&self) -> &str {
        &self.endpoint
    }

    async fn all_status(&self) -> Result<BinStatusResponse, PortError> {
        // No query parameters and no auth headers: the backend serves everything in one go.
        let req = self.client.get(&self.endpoint);
        tracing::debug!(endpoint = %self.endpoint, "GET bin status");
        fetch_json::<BinStatusResponse>(req).await
    }
}

/// Build a service reading from `endpoint` with the given client.
#[must_use]
pub fn service(client: Client, endpoint: impl Into<String>) -> SmartBinService {
    SmartBinService::new(Arc::new(HttpBinStatusPort::new(client, endpoint)))
}

// Small helper to fetch and decode JSON with status handling.
async fn fetch_json<T: DeserializeOwned>(req: RequestBuilder) -> Result<T, PortError> {
    req.send()
        .await
        .map_err(PortError::from)?
        .error_for_status()
        .map_err(PortError::from)?
        .json()
        .await
        .map_err(PortError::from)
}

#[cfg(test)]
mod tests {
    use axum::{Json, Router, http::StatusCode, routing::get};
    use serde_json::{Value, json};
    use tokio::net::TcpListener;

    use super::*;

    const PATH: &str = "/api/iot/bins/all-status";

    async fn serve(status: StatusCode, body: Value) -> String {
        let app = Router::new().route(PATH, get(move || async move { (status, Json(body)) }));
        let listener = TcpListener::bind("127.0.0.1:0")
            .await
            .expect("bind test listener");
        let addr = listener.local_addr().expect("listener address");
        tokio::spawn(async move {
            axum::serve(listener, app).await.expect("test server");
        });
        format!("http://{addr}{PATH}")
    }

    async fn serve_raw(body: &'static str) -> String {
        let app = Router::new().route(PATH, get(move || async move { body }));
        let listener = TcpListener::bind("127.0.0.1:0")
            .await
            .expect("bind test listener");
        let addr = listener.local_addr().expect("listener address");
        tokio::spawn(async move {
            axum::serve(listener, app).await.expect("test server");
        });
        format!("http://{addr}{PATH}")
    }

    #[tokio::test]
    async fn reads_bins_from_backend() {
        let endpoint = serve(
            StatusCode::OK,
            json!({
                "success": true,
                "bins": [
                    {"bin_id": "BIN_001", "area": "Downtown", "fill_level": 92.0, "status": "critical",
                     "latitude": 40.7, "longitude": -74.0, "last_update": null},
                    {"bin_id": "BIN_002", "area": "Harbor", "fill_level": 12.5, "status": "good",
                     "latitude": 40.6, "longitude": -74.1, "last_update": "2024-05-01T10:00:00"}
                ],
                "summary": {"critical": 1, "needs_collection": 0, "moderate": 0, "good": 1},
                "total_bins": 2,
                "timestamp": "2024-05-01T10:00:05"
            }),
        )
        .await;

        let bins = service(Client::new(), endpoint)
            .bins()
            .await
            .expect("fetch succeeds");

        assert_eq!(bins.len(), 2);
        let ids: Vec<String> = bins.iter().map(|bin| bin.bin_id.to_string()).collect();
        assert_eq!(ids, ["BIN_001", "BIN_002"]);
    }

    #[tokio::test]
    async fn null_bins_are_empty() {
        let endpoint = serve(StatusCode::OK, json!({"success": true, "bins": null})).await;

        let bins = service(Client::new(), endpoint)
            .bins()
            .await
            .expect("fetch succeeds");

        assert!(bins.is_empty());
    }

    #[tokio::test]
    async fn server_error_is_a_network_error() {
        let endpoint = serve(
            StatusCode::INTERNAL_SERVER_ERROR,
            json!({"success": false, "error": "boom"}),
        )
        .await;

        let err = service(Client::new(), endpoint)
            .bins()
            .await
            .expect_err("500 must fail");

        assert!(matches!(err, PortError::Network(_)));
    }

    #[tokio::test]
    async fn unsuccessful_body_still_replaces_bins() {
        let endpoint = serve(
            StatusCode::OK,
            json!({
                "success": false,
                "error": "db locked",
                "bins": [{"bin_id": "BIN_009", "area": null, "fill_level": 64.0, "status": "moderate"}]
            }),
        )
        .await;

        let bins = service(Client::new(), endpoint)
            .bins()
            .await
            .expect("2xx body is not a failed fetch");

        assert_eq!(bins.len(), 1);
        assert!(bins.iter().all(|bin| bin.area.is_empty()));
    }

    #[tokio::test]
    async fn malformed_body_is_a_network_error() {
        let endpoint = serve_raw("<html>not json</html>").await;

        let err = service(Client::new(), endpoint)
            .bins()
            .await
            .expect_err("html must fail");

        assert!(matches!(err, PortError::Network(_)));
    }

    #[tokio::test]
    async fn unreachable_backend_is_a_network_error() {
        let listener = TcpListener::bind("127.0.0.1:0")
            .await
            .expect("bind test listener");
        let addr = listener.local_addr().expect("listener address");
        drop(listener);

        let port = HttpBinStatusPort::new(Client::new(), format!("http://{addr}{PATH}"));
        let err = port.all_status().await.expect_err("nothing listening");

        assert!(matches!(err, PortError::Network(_)));
    }

    #[test]
    fn local_port_targets_development_backend() {
        let port = HttpBinStatusPort::local(Client::new());
        assert_eq!(port.source(), "http://localhost:5000/api/iot/bins/all-status");
    }
}
