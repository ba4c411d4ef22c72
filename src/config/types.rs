use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::http_client::HttpSettings;

pub(super) const MIN_K: u32 = 1;
pub(super) const MAX_K: u32 = 20;
const FEATURE_COUNT: usize = 4;

/// Settings persisted in `config.toml`.
///
/// Config keys (TOML): `ordering`, `api`, `knn`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AppSettings {
    #[serde(default)]
    pub ordering: ResponseOrdering,
    #[serde(default)]
    pub api: ApiSettings,
    #[serde(default)]
    pub knn: KnnSettings,
}

impl AppSettings {
    /// Clamp values into the ranges the backend accepts.
    pub fn normalized(self) -> Self {
        Self {
            ordering: self.ordering,
            api: self.api.normalized(),
            knn: self.knn.normalized(),
        }
    }
}

/// How overlapping loads of the same view are reconciled.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ResponseOrdering {
    /// Only the most recently issued request may render.
    #[default]
    LatestIssued,
    /// Whichever response arrives last renders, even if it is older.
    LastArrival,
}

/// Backend connection settings.
///
/// Config keys: `base_url`, `connect_timeout_secs`, `read_timeout_secs`,
/// `max_response_bytes`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApiSettings {
    #[serde(default = "default_base_url")]
    pub base_url: String,
    #[serde(default = "default_connect_timeout_secs")]
    pub connect_timeout_secs: u64,
    #[serde(default = "default_read_timeout_secs")]
    pub read_timeout_secs: u64,
    #[serde(default = "default_max_response_bytes")]
    pub max_response_bytes: usize,
}

impl Default for ApiSettings {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            connect_timeout_secs: default_connect_timeout_secs(),
            read_timeout_secs: default_read_timeout_secs(),
            max_response_bytes: default_max_response_bytes(),
        }
    }
}

impl ApiSettings {
    fn normalized(self) -> Self {
        let base_url = self.base_url.trim().to_string();
        Self {
            base_url: if base_url.is_empty() {
                default_base_url()
            } else {
                base_url
            },
            connect_timeout_secs: self.connect_timeout_secs.max(1),
            read_timeout_secs: self.read_timeout_secs.max(1),
            max_response_bytes: self.max_response_bytes.max(1024),
        }
    }

    pub fn http(&self) -> HttpSettings {
        HttpSettings {
            connect_timeout: Duration::from_secs(self.connect_timeout_secs),
            read_timeout: Duration::from_secs(self.read_timeout_secs),
            write_timeout: Duration::from_secs(self.read_timeout_secs),
            max_response_bytes: self.max_response_bytes,
        }
    }
}

/// KNN view defaults. The feature pair is fixed to petal length/width unless
/// overridden here.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KnnSettings {
    #[serde(default = "default_k")]
    pub default_k: u32,
    #[serde(default = "default_feature_x")]
    pub feature_x: usize,
    #[serde(default = "default_feature_y")]
    pub feature_y: usize,
}

impl Default for KnnSettings {
    fn default() -> Self {
        Self {
            default_k: default_k(),
            feature_x: default_feature_x(),
            feature_y: default_feature_y(),
        }
    }
}

impl KnnSettings {
    fn normalized(self) -> Self {
        let feature = |value: usize, fallback: usize| {
            if value < FEATURE_COUNT { value } else { fallback }
        };
        Self {
            default_k: self.default_k.clamp(MIN_K, MAX_K),
            feature_x: feature(self.feature_x, default_feature_x()),
            feature_y: feature(self.feature_y, default_feature_y()),
        }
    }
}

fn default_base_url() -> String {
    "http://127.0.0.1:5000".to_string()
}

fn default_connect_timeout_secs() -> u64 {
    10
}

fn default_read_timeout_secs() -> u64 {
    30
}

fn default_max_response_bytes() -> usize {
    8 * 1024 * 1024
}

fn default_k() -> u32 {
    5
}

fn default_feature_x() -> usize {
    2
}

fn default_feature_y() -> usize {
    3
}
