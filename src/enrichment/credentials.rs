use std::fmt;
use thiserror::Error;

pub const CLIENT_ID_ENV_VAR: &str = "SPOTIPY_CLIENT_ID";
pub const CLIENT_SECRET_ENV_VAR: &str = "SPOTIPY_CLIENT_SECRET";

#[derive(Error, Debug, PartialEq, Eq)]
#[error("Spotify credentials ({}) not found in environment variables.", .missing.join(", "))]
pub struct MissingCredentials {
    pub missing: Vec<&'static str>,
}

#[derive(Clone, PartialEq, Eq)]
pub struct SpotifyCredentials {
    pub client_id: String,
    pub client_secret: String,
}

impl fmt::Debug for SpotifyCredentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SpotifyCredentials")
            .field("client_id", &self.client_id)
            .field("client_secret", &"<redacted>")
            .finish()
    }
}

impl SpotifyCredentials {
    pub fn from_env() -> Result<SpotifyCredentials, MissingCredentials> {
        SpotifyCredentials::from_lookup(|key| std::env::var(key).ok())
    }

    /// Both values are required, empty strings count as missing.
    pub fn from_lookup<F>(lookup: F) -> Result<SpotifyCredentials, MissingCredentials>
    where
        F: Fn(&str) -> Option<String>,
    {
        let read = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());
        let client_id = read(CLIENT_ID_ENV_VAR);
        let client_secret = read(CLIENT_SECRET_ENV_VAR);

        match (client_id, client_secret) {
            (Some(client_id), Some(client_secret)) => Ok(SpotifyCredentials {
                client_id,
                client_secret,
            }),
            (client_id, client_secret) => {
                let mut missing = Vec::new();
                if client_id.is_none() {
                    missing.push(CLIENT_ID_ENV_VAR);
                }
                if client_secret.is_none() {
                    missing.push(CLIENT_SECRET_ENV_VAR);
                }
                Err(MissingCredentials { missing })
            }
        }
    }
}
