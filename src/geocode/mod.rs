//! Reverse geocoding of ride start and end points to town names.
//!
//! Lookups are memoized by coordinates rounded to four decimals for the
//! lifetime of the process. The cache is unbounded and last write wins.

use std::collections::HashMap;
use thiserror::Error;

/// Name used whenever a town cannot be resolved.
pub const UNKNOWN_TOWN: &str = "unknown";

/// Default reverse geocoding endpoint.
pub const DEFAULT_BASE_URL: &str = "https://nominatim.openstreetmap.org/reverse";

/// Errors from the geocoding service
#[derive(Debug, Error)]
pub enum GeocodeError {
    #[error("Request failed: {0}")]
    RequestFailed(String),

    #[error("Service returned status {0}")]
    Status(u16),

    #[error("Invalid response: {0}")]
    InvalidResponse(String),
}

/// Cache key for a coordinate: both axes rounded to four decimals.
pub fn cache_key(lat: f64, lon: f64) -> String {
    format!("{:.4}|{:.4}", lat, lon)
}

/// Reverse geocoding client for a Nominatim-compatible service
pub struct NominatimClient {
    client: reqwest::Client,
    base_url: String,
    user_agent: String,
}

impl NominatimClient {
    /// Create a client for the public Nominatim service
    pub fn new() -> Self {
        Self::with_url(DEFAULT_BASE_URL)
    }

    /// Create with custom base URL (for testing or self-hosted)
    pub fn with_url(base_url: &str) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: base_url.to_string(),
            user_agent: format!("ride-viewer/{}", env!("CARGO_PKG_VERSION")),
        }
    }

    /// Override the User-Agent header sent with each request
    pub fn with_user_agent(mut self, user_agent: &str) -> Self {
        self.user_agent = user_agent.to_string();
        self
    }

    /// Build the lookup URL for a coordinate
    pub fn request_url(&self, lat: f64, lon: f64) -> String {
        format!(
            "{}?lat={:.4}&lon={:.4}&format=json",
            self.base_url, lat, lon
        )
    }

    /// Look up the town containing a coordinate.
    ///
    /// `Ok(None)` means the service answered but knows no town there.
    pub async fn town(&self, lat: f64, lon: f64) -> Result<Option<String>, GeocodeError> {
        let response = self
            .client
            .get(self.request_url(lat, lon))
            .header(reqwest::header::USER_AGENT, &self.user_agent)
            .send()
            .await
            .map_err(|e| GeocodeError::RequestFailed(e.to_string()))?;

        if !response.status().is_success() {
            return Err(GeocodeError::Status(response.status().as_u16()));
        }

        let body: ReverseResponse = response
            .json()
            .await
            .map_err(|e| GeocodeError::InvalidResponse(e.to_string()))?;

        Ok(body.town_name())
    }
}

impl Default for NominatimClient {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Debug, Default, serde::Deserialize)]
struct ReverseResponse {
    #[serde(default)]
    address: Address,
}

#[derive(Debug, Default, serde::Deserialize)]
struct Address {
    town: Option<String>,
    city: Option<String>,
    village: Option<String>,
}

impl ReverseResponse {
    fn town_name(self) -> Option<String> {
        let Address { town, city, village } = self.address;
        town.or(city).or(village).filter(|name| !name.is_empty())
    }
}

/// Memoizing town lookup.
pub struct TownCache {
    client: Option<NominatimClient>,
    entries: HashMap<String, String>,
}

impl TownCache {
    /// Cache backed by a geocoding client.
    pub fn new(client: NominatimClient) -> Self {
        Self {
            client: Some(client),
            entries: HashMap::new(),
        }
    }

    /// Cache that never goes to the network; misses resolve to "unknown".
    pub fn offline() -> Self {
        Self {
            client: None,
            entries: HashMap::new(),
        }
    }

    /// Cached name for a coordinate.
    pub fn get(&self, lat: f64, lon: f64) -> Option<&str> {
        self.entries.get(&cache_key(lat, lon)).map(String::as_str)
    }

    /// Store a name for a coordinate, replacing any previous entry.
    pub fn insert(&mut self, lat: f64, lon: f64, name: &str) {
        self.entries.insert(cache_key(lat, lon), name.to_string());
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Resolve a town name, consulting the cache first.
    ///
    /// No position, offline mode and transport failures give "unknown";
    /// only answers from the service are cached.
    pub async fn lookup(&mut self, position: Option<(f64, f64)>) -> String {
        let Some((lat, lon)) = position else {
            return UNKNOWN_TOWN.to_string();
        };
        if let Some(name) = self.get(lat, lon) {
            return name.to_string();
        }
        let Some(client) = &self.client else {
            return UNKNOWN_TOWN.to_string();
        };

        let name = match client.town(lat, lon).await {
            Ok(found) => found.unwrap_or_else(|| UNKNOWN_TOWN.to_string()),
            Err(GeocodeError::Status(status)) => {
                tracing::warn!("Reverse geocoding returned status {}", status);
                UNKNOWN_TOWN.to_string()
            }
            Err(e) => {
                tracing::warn!("Reverse geocoding failed: {}", e);
                return UNKNOWN_TOWN.to_string();
            }
        };

        self.insert(lat, lon, &name);
        name
    }
}
