//! Spotify Web API client for track artwork and listening links.
//!
//! Uses the client credentials flow, the access token is reused until
//! shortly before it expires. Lookups themselves are never cached or retried.

use super::models::{SearchResponse, SpotifyTrack, TokenResponse};
use super::{LookupError, LookupOutcome, MetadataProvider, SpotifyCredentials};
use anyhow::Result;
use reqwest::blocking::Client;
use reqwest::StatusCode;
use std::sync::Mutex;
use std::time::{Duration, Instant};
use tracing::{debug, warn};

pub const SPOTIFY_ACCOUNTS_BASE: &str = "https://accounts.spotify.com";
pub const SPOTIFY_API_BASE: &str = "https://api.spotify.com";
const TOKEN_EXPIRY_MARGIN: Duration = Duration::from_secs(60);

#[derive(Debug, Clone)]
pub struct SpotifySettings {
    pub accounts_url: String,
    pub api_url: String,
    pub timeout_sec: u64,
}

impl Default for SpotifySettings {
    fn default() -> Self {
        SpotifySettings {
            accounts_url: SPOTIFY_ACCOUNTS_BASE.to_string(),
            api_url: SPOTIFY_API_BASE.to_string(),
            timeout_sec: 30,
        }
    }
}

struct AccessToken {
    value: String,
    expires_at: Instant,
}

impl AccessToken {
    fn is_fresh(&self) -> bool {
        Instant::now() + TOKEN_EXPIRY_MARGIN < self.expires_at
    }
}

pub struct SpotifyClient {
    client: Client,
    credentials: SpotifyCredentials,
    accounts_url: String,
    api_url: String,
    token: Mutex<Option<AccessToken>>,
}

fn transport_error(err: reqwest::Error) -> LookupError {
    LookupError::Transport(err.to_string())
}

pub fn search_query(title: &str, artist: &str) -> String {
    format!("track:{} artist:{}", title, artist)
}

impl SpotifyClient {
    /// Must not be called from within an async context, the blocking client
    /// owns its own runtime.
    pub fn new(credentials: SpotifyCredentials, settings: &SpotifySettings) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(settings.timeout_sec))
            .build()?;

        Ok(Self {
            client,
            credentials,
            accounts_url: settings.accounts_url.trim_end_matches('/').to_string(),
            api_url: settings.api_url.trim_end_matches('/').to_string(),
            token: Mutex::new(None),
        })
    }

    pub fn api_url(&self) -> &str {
        &self.api_url
    }

    fn access_token(&self) -> Result<String, LookupError> {
        let mut token = self.token.lock().unwrap_or_else(|e| e.into_inner());
        if let Some(current) = token.as_ref().filter(|t| t.is_fresh()) {
            return Ok(current.value.clone());
        }

        debug!("Requesting a new Spotify access token");
        let url = format!("{}/api/token", self.accounts_url);
        let response = self
            .client
            .post(&url)
            .basic_auth(
                &self.credentials.client_id,
                Some(&self.credentials.client_secret),
            )
            .form(&[("grant_type", "client_credentials")])
            .send()
            .map_err(transport_error)?;

        match response.status() {
            status if status.is_success() => {}
            StatusCode::BAD_REQUEST | StatusCode::UNAUTHORIZED => {
                return Err(LookupError::Unauthorized(format!(
                    "token request answered with status {}",
                    response.status()
                )));
            }
            status => return Err(LookupError::Status(status.as_u16())),
        }

        let body: TokenResponse = response
            .json()
            .map_err(|err| LookupError::Decode(err.to_string()))?;
        let value = body.access_token.clone();
        *token = Some(AccessToken {
            value: body.access_token,
            expires_at: Instant::now() + Duration::from_secs(body.expires_in),
        });
        Ok(value)
    }

    fn invalidate_token(&self) {
        let mut token = self.token.lock().unwrap_or_else(|e| e.into_inner());
        *token = None;
    }

    /// Top search hit for a title and artist pair.
    pub fn search_track(
        &self,
        title: &str,
        artist: &str,
    ) -> Result<Option<SpotifyTrack>, LookupError> {
        let token = self.access_token()?;

        let url = format!(
            "{}/v1/search?q={}&type=track&limit=1",
            self.api_url,
            urlencoding::encode(&search_query(title, artist))
        );

        let response = self
            .client
            .get(&url)
            .bearer_auth(token)
            .send()
            .map_err(transport_error)?;

        if response.status() == StatusCode::UNAUTHORIZED {
            // The next lookup will request a new token
            self.invalidate_token();
            return Err(LookupError::Unauthorized(
                "access token was rejected".to_string(),
            ));
        }
        if !response.status().is_success() {
            return Err(LookupError::Status(response.status().as_u16()));
        }

        let body: SearchResponse = response
            .json()
            .map_err(|err| LookupError::Decode(err.to_string()))?;
        Ok(body.into_first_track())
    }
}

impl MetadataProvider for SpotifyClient {
    fn lookup(&self, title: &str, artist: &str) -> LookupOutcome {
        match self.search_track(title, artist) {
            Ok(Some(track)) => LookupOutcome::Found(track.into_metadata()),
            Ok(None) => {
                debug!("No Spotify match for \"{}\" by {}", title, artist);
                LookupOutcome::NotFound
            }
            Err(err) => {
                warn!(
                    "Spotify lookup for \"{}\" by {} failed: {}",
                    title, artist, err
                );
                LookupOutcome::Failed(err)
            }
        }
    }
}
