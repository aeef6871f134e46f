use std::sync::Arc;
use tracing::info;

use ragkit_core::config::EmbeddingSettings;
use ragkit_core::{EmbeddingProvider, Result};

pub mod fake;
pub mod http;

pub use fake::FakeEmbedder;
pub use http::HttpEmbeddingProvider;

/// `APP_USE_FAKE_EMBEDDINGS=1` (or `true`) forces the [`FakeEmbedder`].
pub fn use_fake_from_env() -> bool {
    std::env::var("APP_USE_FAKE_EMBEDDINGS")
        .ok()
        .map(|v| v == "1" || v.eq_ignore_ascii_case("true"))
        .unwrap_or(false)
}

/// Build the provider selected by `settings` and the environment.
pub fn get_default_provider(settings: &EmbeddingSettings) -> Result<Arc<dyn EmbeddingProvider>> {
    if settings.use_fake || use_fake_from_env() {
        info!("using FakeEmbedder");
        return Ok(Arc::new(FakeEmbedder::new()));
    }
    Ok(Arc::new(HttpEmbeddingProvider::new(settings)?))
}
