use std::path::PathBuf;

use chrono::Utc;
use reqwest::Client;
use tokio::sync::Mutex;

use crate::{
    Res, config,
    error::Error,
    spotify,
    types::TokenRecord,
    warning,
};

/// Tokens within this many milliseconds of expiry are treated as expired.
///
/// Absorbs the latency between the expiry check and the actual use of the
/// token, so a request never reaches the API with a token that expired
/// mid-flight.
const EXPIRY_MARGIN_MS: i64 = 60_000;

/// Durable storage for the token record.
///
/// One JSON file at a well-known location, overwritten wholesale on every
/// update. Reading tolerates every failure mode (missing file, bad JSON,
/// permissions) by reporting "absent" - that is the normal first-run state.
pub struct CredentialStore {
    path: PathBuf,
}

impl CredentialStore {
    /// Store at the platform's local data directory
    /// (e.g. `~/.local/share/spotibridge/token.json` on Linux).
    pub fn default_path() -> Self {
        let mut path = dirs::data_local_dir().unwrap_or_else(|| PathBuf::from("."));
        path.push("spotibridge/token.json");
        CredentialStore { path }
    }

    /// Store at an explicit location.
    pub fn at(path: PathBuf) -> Self {
        CredentialStore { path }
    }

    pub async fn read(&self) -> Option<TokenRecord> {
        let content = async_fs::read_to_string(&self.path).await.ok()?;
        serde_json::from_str(&content).ok()
    }

    pub async fn write(&self, record: &TokenRecord) -> Res<()> {
        if let Some(parent) = self.path.parent() {
            async_fs::create_dir_all(parent).await?;
        }

        let json = serde_json::to_string_pretty(record)?;
        async_fs::write(&self.path, json).await?;
        Ok(())
    }
}

/// Owns the in-memory token state and decides when a refresh is required.
///
/// The record lives behind a `tokio::sync::Mutex` that is held across the
/// refresh exchange. Concurrent callers that discover a stale token at the
/// same time therefore serialize on the lock: the first one performs the
/// exchange, the rest re-check after acquiring the lock and find the fresh
/// record. Authorization servers may reject duplicate refresh-token
/// exchanges, so issuing exactly one matters.
///
/// Every change to the record is mirrored to the [`CredentialStore`] before
/// the lock is released.
pub struct TokenManager {
    http: Client,
    store: CredentialStore,
    token_url: String,
    client_id: String,
    client_secret: String,
    state: Mutex<Option<TokenRecord>>,
}

impl TokenManager {
    /// Manager wired to the environment-sourced credentials and endpoints.
    pub fn from_env(store: CredentialStore) -> Self {
        Self::new(
            store,
            config::token_url(),
            config::client_id(),
            config::client_secret(),
        )
    }

    pub fn new(
        store: CredentialStore,
        token_url: String,
        client_id: String,
        client_secret: String,
    ) -> Self {
        TokenManager {
            http: Client::new(),
            store,
            token_url,
            client_id,
            client_secret,
            state: Mutex::new(None),
        }
    }

    /// Manager pre-seeded with a token record, bypassing the store.
    pub fn preloaded(
        store: CredentialStore,
        token_url: String,
        client_id: String,
        client_secret: String,
        record: TokenRecord,
    ) -> Self {
        let mut manager = Self::new(store, token_url, client_id, client_secret);
        *manager.state.get_mut() = Some(record);
        manager
    }

    /// Reads the credential store into memory.
    ///
    /// A record already inside the expiry margin is refreshed before it is
    /// returned. Read failures of any kind yield `Ok(None)` - the system's
    /// not-yet-authorized state, not an error. A record whose refresh fails
    /// is discarded the same way (with a warning), since it cannot be used
    /// for anything; the user has to re-authorize.
    pub async fn load_persisted(&self) -> Res<Option<TokenRecord>> {
        let Some(record) = self.store.read().await else {
            return Ok(None);
        };

        {
            let mut state = self.state.lock().await;
            *state = Some(record);
        }

        if let Err(e) = self.ensure_valid().await {
            warning!("Stored token could not be refreshed: {}", e);
            let mut state = self.state.lock().await;
            *state = None;
            return Ok(None);
        }

        Ok(self.current_record().await)
    }

    /// Exchanges an authorization code for a fresh token pair, persists it,
    /// and returns it. Failures map to [`Error::AuthExchange`] and are never
    /// retried; the caller re-runs the authorization flow.
    pub async fn complete_authorization(&self, code: &str) -> Res<TokenRecord> {
        let grant = spotify::auth::exchange_authorization_code(
            &self.http,
            &self.token_url,
            &self.client_id,
            &self.client_secret,
            code,
        )
        .await?;

        let record = TokenRecord {
            access_token: grant.access_token,
            refresh_token: grant.refresh_token.unwrap_or_default(),
            expires_at: Utc::now().timestamp_millis() + grant.expires_in * 1000,
        };

        self.store.write(&record).await?;
        let mut state = self.state.lock().await;
        *state = Some(record.clone());
        Ok(record)
    }

    /// Guarantees the in-memory token is usable.
    ///
    /// Fails with [`Error::NotAuthenticated`] when no record is loaded.
    /// A record inside the expiry margin is refreshed synchronously before
    /// this returns; the state lock is held for the whole exchange, which is
    /// what serializes concurrent refresh attempts down to a single one.
    pub async fn ensure_valid(&self) -> Res<()> {
        let mut state = self.state.lock().await;
        match state.as_ref() {
            None => Err(Error::NotAuthenticated),
            Some(record) if Self::expiring_soon(record) => {
                let refreshed = self.exchange_refresh(record).await?;
                self.store.write(&refreshed).await?;
                *state = Some(refreshed);
                Ok(())
            }
            Some(_) => Ok(()),
        }
    }

    /// A valid bearer token for API requests, refreshing first if needed.
    pub async fn bearer_token(&self) -> Res<String> {
        self.ensure_valid().await?;
        let state = self.state.lock().await;
        state
            .as_ref()
            .map(|r| r.access_token.clone())
            .ok_or(Error::NotAuthenticated)
    }

    /// True iff a record is loaded. Expiry is handled lazily at
    /// [`TokenManager::ensure_valid`] time, not here.
    pub async fn is_authenticated(&self) -> bool {
        self.state.lock().await.is_some()
    }

    pub async fn current_record(&self) -> Option<TokenRecord> {
        self.state.lock().await.clone()
    }

    fn expiring_soon(record: &TokenRecord) -> bool {
        Utc::now().timestamp_millis() >= record.expires_at - EXPIRY_MARGIN_MS
    }

    /// Refresh-token grant. The refresh token carries over unless the
    /// response supplies a new one. Failures map to [`Error::Refresh`] and
    /// are terminal for the current operation.
    async fn exchange_refresh(&self, record: &TokenRecord) -> Res<TokenRecord> {
        if record.refresh_token.is_empty() {
            return Err(Error::Refresh("no refresh token available".to_string()));
        }

        let grant = spotify::auth::exchange_refresh_token(
            &self.http,
            &self.token_url,
            &self.client_id,
            &self.client_secret,
            &record.refresh_token,
        )
        .await?;

        Ok(TokenRecord {
            access_token: grant.access_token,
            refresh_token: grant
                .refresh_token
                .unwrap_or_else(|| record.refresh_token.clone()),
            expires_at: Utc::now().timestamp_millis() + grant.expires_in * 1000,
        })
    }
}
