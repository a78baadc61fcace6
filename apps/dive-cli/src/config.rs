use std::path::Path;

use anyhow::Context;
use dive_stream::StreamerConfig;

/// Read a streamer config from a JSON file, or take the defaults, then apply
/// command-line overrides.
pub fn load_config(path: Option<&Path>, seed: Option<u64>) -> anyhow::Result<StreamerConfig> {
    let mut config = match path {
        Some(path) => {
            let text = std::fs::read_to_string(path)
                .with_context(|| format!("reading config {}", path.display()))?;
            serde_json::from_str::<StreamerConfig>(&text)
                .with_context(|| format!("parsing config {}", path.display()))?
        }
        None => StreamerConfig::default(),
    };
    if let Some(seed) = seed {
        config.seed = Some(seed);
    }
    config.validate()?;
    tracing::debug!(?config, "streamer config");
    Ok(config)
}
