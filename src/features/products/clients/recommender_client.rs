use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::core::config::RecommenderConfig;
use crate::core::error::{AppError, Result};

/// Market-basket recommender: maps the category names in a basket to the
/// category names it recommends, most relevant first.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait BasketRecommender: Send + Sync {
    async fn recommend(&self, basket: &[String]) -> Result<Vec<String>>;
}

#[derive(Debug, Serialize)]
struct BasketRequest<'a> {
    basket: &'a [String],
}

#[derive(Debug, Deserialize)]
struct BasketResponse {
    data: Vec<String>,
}

/// Client for the recommendation service HTTP endpoint
pub struct HttpBasketRecommender {
    url: String,
    http_client: reqwest::Client,
}

impl HttpBasketRecommender {
    pub fn new(config: &RecommenderConfig) -> Result<Self> {
        let http_client = reqwest::Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| AppError::Internal(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            url: config.url.clone(),
            http_client,
        })
    }
}

#[async_trait]
impl BasketRecommender for HttpBasketRecommender {
    async fn recommend(&self, basket: &[String]) -> Result<Vec<String>> {
        tracing::debug!("Requesting recommendations for basket {:?}", basket);

        let response = self
            .http_client
            .post(&self.url)
            .json(&BasketRequest { basket })
            .send()
            .await
            .map_err(|e| {
                tracing::error!("Recommendation request failed: {}", e);
                AppError::ExternalServiceError(format!("Recommendation service unavailable: {}", e))
            })?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            tracing::error!("Recommendation service error: HTTP {} - {}", status, body);
            return Err(AppError::ExternalServiceError(format!(
                "Recommendation service error: HTTP {}",
                status
            )));
        }

        let parsed = response.json::<BasketResponse>().await.map_err(|e| {
            tracing::error!("Failed to parse recommendation response: {}", e);
            AppError::ExternalServiceError(format!("Invalid recommendation response: {}", e))
        })?;

        tracing::debug!("Recommended categories: {:?}", parsed.data);

        Ok(parsed.data)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{http::StatusCode, routing::post, Json, Router};
    use std::time::Duration;

    async fn spawn(app: Router) -> String {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });
        format!("http://{}/recommend", addr)
    }

    fn client(url: String) -> HttpBasketRecommender {
        HttpBasketRecommender::new(&RecommenderConfig {
            url,
            timeout: Duration::from_secs(5),
        })
        .unwrap()
    }

    #[tokio::test]
    async fn test_sends_basket_and_reads_data() {
        let app = Router::new().route(
            "/recommend",
            post(|Json(body): Json<serde_json::Value>| async move {
                // echo the basket back reversed
                let mut names: Vec<String> =
                    serde_json::from_value(body["basket"].clone()).unwrap();
                names.reverse();
                Json(serde_json::json!({ "data": names }))
            }),
        );
        let recommender = client(spawn(app).await);

        let basket = vec!["Shoes".to_string(), "Bags".to_string(), "Shoes".to_string()];
        let result = recommender.recommend(&basket).await.unwrap();

        assert_eq!(result, vec!["Shoes", "Bags", "Shoes"]);
    }

    #[tokio::test]
    async fn test_non_success_status_is_external_error() {
        let app = Router::new().route(
            "/recommend",
            post(|| async { (StatusCode::INTERNAL_SERVER_ERROR, "boom") }),
        );
        let recommender = client(spawn(app).await);

        let result = recommender.recommend(&["Shoes".to_string()]).await;
        assert!(matches!(result, Err(AppError::ExternalServiceError(_))));
    }

    #[tokio::test]
    async fn test_malformed_body_is_external_error() {
        let app = Router::new().route(
            "/recommend",
            post(|| async { Json(serde_json::json!({ "categories": ["Shoes"] })) }),
        );
        let recommender = client(spawn(app).await);

        let result = recommender.recommend(&["Shoes".to_string()]).await;
        assert!(matches!(result, Err(AppError::ExternalServiceError(_))));
    }

    #[tokio::test]
    async fn test_unreachable_service_is_external_error() {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let recommender = client(format!("http://{}/recommend", addr));
        let result = recommender.recommend(&["Shoes".to_string()]).await;
        assert!(matches!(result, Err(AppError::ExternalServiceError(_))));
    }
}
