//! Persisted application settings (`config.toml` under the app directory).

mod errors;
mod io;
mod types;

/// Default filename used to store the app configuration.
pub const CONFIG_FILE_NAME: &str = "config.toml";

pub use errors::ConfigError;
pub use io::{config_path, load_or_init, load_or_init_at, load_settings_from, save_to_path};
pub use types::{ApiSettings, AppSettings, KnnSettings, ResponseOrdering};

/// Slider bounds for K; the backend falls back to its default outside them.
pub const K_RANGE: std::ops::RangeInclusive<u32> = types::MIN_K..=types::MAX_K;
