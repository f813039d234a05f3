// Feed backend client — the black-box HTTP surface the session consumes:
// next-batch, feedback, calibration, and outfit suggestion.

pub mod http;

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};

use crate::catalog::Item;
use crate::core::decision::now_ms;
use crate::core::dispatch::{Feedback, FeedbackSink};
use crate::error::FeedError;

/// A complementary-item suggestion for a viewed product.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutfitSuggestion {
    pub original_item: Item,
    pub suggested_item: Item,
}

#[derive(Debug, Serialize)]
struct CalibratePayload<'a> {
    user: &'a str,
    category: &'a str,
}

/// Abstract feed seam so the session can run against mocks in tests.
#[async_trait]
pub trait FeedSource: Send + Sync {
    async fn next_batch(&self, user: &str, n: u32) -> Result<Vec<Item>, FeedError>;
    async fn calibrate(&self, user: &str, category: &str) -> Result<(), FeedError>;
    async fn outfit_for(&self, pid: &str) -> Result<Option<OutfitSuggestion>, FeedError>;
}

pub struct FeedClient {
    base_url: String,
    client: Client,
}

impl FeedClient {
    pub fn new(base_url: impl Into<String>) -> Self {
        let mut base_url = base_url.into();
        while base_url.ends_with('/') {
            base_url.pop();
        }
        Self {
            base_url,
            client: http::build_feed_client(),
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{path}", self.base_url)
    }

    pub async fn fetch_next(&self, user: &str, n: u32) -> Result<Vec<Item>, FeedError> {
        const ENDPOINT: &str = "/api/next";
        // cache-buster forces a fresh response per call
        let response = self
            .client
            .get(self.url(ENDPOINT))
            .query(&[
                ("user", user),
                ("n", &n.to_string()),
                ("_cb", &now_ms().to_string()),
            ])
            .send()
            .await
            .map_err(|e| request_error(ENDPOINT, &e))?;
        let response = check_status(ENDPOINT, response)?;
        response
            .json::<Vec<Item>>()
            .await
            .map_err(|e| decode_error(ENDPOINT, &e))
    }

    pub async fn send_feedback(&self, feedback: &Feedback) -> Result<(), FeedError> {
        const ENDPOINT: &str = "/api/feedback";
        let response = self
            .client
            .post(self.url(ENDPOINT))
            .json(feedback)
            .send()
            .await
            .map_err(|e| request_error(ENDPOINT, &e))?;
        check_status(ENDPOINT, response)?;
        Ok(())
    }

    pub async fn send_calibration(&self, user: &str, category: &str) -> Result<(), FeedError> {
        const ENDPOINT: &str = "/api/calibrate";
        let response = self
            .client
            .post(self.url(ENDPOINT))
            .json(&CalibratePayload { user, category })
            .send()
            .await
            .map_err(|e| request_error(ENDPOINT, &e))?;
        check_status(ENDPOINT, response)?;
        Ok(())
    }

    /// 404 means "no suggestion", which is a normal outcome, not an error.
    pub async fn fetch_outfit(&self, pid: &str) -> Result<Option<OutfitSuggestion>, FeedError> {
        const ENDPOINT: &str = "/api/outfit";
        let response = self
            .client
            .get(self.url(ENDPOINT))
            .query(&[("pid", pid)])
            .send()
            .await
            .map_err(|e| request_error(ENDPOINT, &e))?;
        if response.status() == StatusCode::NOT_FOUND {
            return Ok(None);
        }
        let response = check_status(ENDPOINT, response)?;
        response
            .json::<OutfitSuggestion>()
            .await
            .map(Some)
            .map_err(|e| decode_error(ENDPOINT, &e))
    }
}

#[async_trait]
impl FeedSource for FeedClient {
    async fn next_batch(&self, user: &str, n: u32) -> Result<Vec<Item>, FeedError> {
        self.fetch_next(user, n).await
    }

    async fn calibrate(&self, user: &str, category: &str) -> Result<(), FeedError> {
        self.send_calibration(user, category).await
    }

    async fn outfit_for(&self, pid: &str) -> Result<Option<OutfitSuggestion>, FeedError> {
        self.fetch_outfit(pid).await
    }
}

#[async_trait]
impl FeedbackSink for FeedClient {
    async fn deliver(&self, feedback: Feedback) -> anyhow::Result<()> {
        self.send_feedback(&feedback).await?;
        Ok(())
    }
}

fn check_status(endpoint: &str, response: reqwest::Response) -> Result<reqwest::Response, FeedError> {
    let status = response.status();
    if status.is_success() {
        Ok(response)
    } else {
        Err(FeedError::Status {
            endpoint: endpoint.to_owned(),
            status: status.as_u16(),
        })
    }
}

fn request_error(endpoint: &str, err: &reqwest::Error) -> FeedError {
    FeedError::Request {
        endpoint: endpoint.to_owned(),
        message: err.to_string(),
    }
}

fn decode_error(endpoint: &str, err: &reqwest::Error) -> FeedError {
    FeedError::Decode {
        endpoint: endpoint.to_owned(),
        message: err.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn base_url_trailing_slash_is_normalized() {
        let client = FeedClient::new("http://localhost:8000/");
        assert_eq!(client.url("/api/next"), "http://localhost:8000/api/next");
    }
}
