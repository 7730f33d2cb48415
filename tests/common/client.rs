//! HTTP client for end-to-end tests
//!
//! Wraps reqwest with one method per recommender endpoint.

use super::constants::*;
use reqwest::Response;
use std::time::Duration;

pub struct TestClient {
    pub client: reqwest::Client,
    pub base_url: String,
}

impl TestClient {
    pub fn new(base_url: String) -> Self {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .build()
            .expect("Failed to build reqwest client");

        Self { client, base_url }
    }

    async fn get(&self, path: &str, query: &[(&str, &str)]) -> Response {
        self.client
            .get(format!("{}{}", self.base_url, path))
            .query(query)
            .send()
            .await
            .expect("Request failed")
    }

    pub async fn recommend(&self, song: &str) -> Response {
        self.get("/v1/recommend", &[("song", song)]).await
    }

    pub async fn recommend_without_song(&self) -> Response {
        self.get("/v1/recommend", &[]).await
    }

    pub async fn songs(&self) -> Response {
        self.get("/v1/songs", &[]).await
    }

    pub async fn stats(&self) -> Response {
        self.get("/v1/stats", &[]).await
    }

    pub async fn home(&self, song: Option<&str>) -> Response {
        match song {
            Some(song) => self.get("/", &[("song", song)]).await,
            None => self.get("/", &[]).await,
        }
    }
}
