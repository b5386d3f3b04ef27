use futures::future::join_all;
use reqwest::Client;
use serde_json::Value;
use tracing::{debug, warn};
use url::Url;

use crate::error::{AggregatorError, Result};

const USER_AGENT: &str = concat!("user-aggregator/", env!("CARGO_PKG_VERSION"));

/// Outcome of fetching one source.
pub struct SourceFetch {
    pub url: Url,
    pub result: Result<Value>,
}

pub struct SourceClient {
    http: Client,
}

impl SourceClient {
    pub fn new() -> Result<Self> {
        let http = Client::builder().user_agent(USER_AGENT).build()?;
        Ok(Self { http })
    }

    /// GET one source and parse its body as JSON.
    pub async fn fetch(&self, url: &Url) -> Result<Value> {
        let response = self.http.get(url.clone()).send().await?;

        if !response.status().is_success() {
            return Err(AggregatorError::SourceStatus {
                status: response.status().as_u16(),
                message: response
                    .text()
                    .await
                    .unwrap_or_else(|_| "<failed to read response body>".to_string()),
            });
        }

        let body = response.text().await?;
        serde_json::from_str(&body).map_err(AggregatorError::Payload)
    }

    /// Fetch every source concurrently and wait for all of them to settle.
    ///
    /// Results come back in the same order as `sources`; a failing source
    /// never affects the others.
    pub async fn fetch_all(&self, sources: &[Url]) -> Vec<SourceFetch> {
        let requests = sources.iter().map(|url| async move {
            debug!(source = %url, "fetching");
            let result = self.fetch(url).await;
            match &result {
                Ok(_) => debug!(source = %url, "fetched"),
                Err(e) => warn!(source = %url, error = %e, "source failed"),
            }
            SourceFetch {
                url: url.clone(),
                result,
            }
        });

        join_all(requests).await
    }
}

#[cfg(test)]
pub(crate) mod fake_api {
    //! In-process stand-in for the public user APIs, bound to a random port.

    use axum::{http::StatusCode, response::IntoResponse, routing::get, Json, Router};
    use serde_json::json;
    use tokio::net::TcpListener;
    use url::Url;

    pub struct FakeApi {
        base: Url,
    }

    impl FakeApi {
        pub async fn start() -> Self {
            let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
            let addr = listener.local_addr().unwrap();

            let app = Router::new()
                .route("/snake", get(snake))
                .route("/envelope", get(envelope))
                .route("/camel", get(camel))
                .route("/broken", get(broken))
                .route("/garbage", get(garbage))
                .route("/nameless", get(nameless));

            tokio::spawn(async move {
                axum::serve(listener, app).await.unwrap();
            });

            Self {
                base: Url::parse(&format!("http://{addr}/")).unwrap(),
            }
        }

        pub fn url(&self, path: &str) -> Url {
            self.base.join(path).unwrap()
        }
    }

    async fn snake() -> impl IntoResponse {
        Json(json!({"first_name": "Ada", "last_name": "Lovelace", "email": "a@x.com", "id": "7"}))
    }

    async fn envelope() -> impl IntoResponse {
        Json(json!({
            "results": [
                {"name": {"first": "Grace", "last": "Hopper"}, "email": "g@x.com"},
                {"name": {"first": "Jennie", "last": "Nichols"}, "email": "j@x.com"}
            ],
            "info": {"results": 2}
        }))
    }

    async fn camel() -> impl IntoResponse {
        Json(json!({
            "users": [
                {"id": 1, "firstName": "Emily", "lastName": "Johnson", "email": "e@x.com"},
                {"id": 2, "email": "no-name@x.com"}
            ],
            "total": 2
        }))
    }

    async fn broken() -> impl IntoResponse {
        (StatusCode::INTERNAL_SERVER_ERROR, "upstream exploded")
    }

    async fn garbage() -> impl IntoResponse {
        "<html>not json</html>"
    }

    async fn nameless() -> impl IntoResponse {
        Json(json!({"email": "x@y.com"}))
    }
}
