// Engine configuration loading
use crate::infrastructure::batch::BatchSettings;
use serde::Deserialize;

#[derive(Debug, Default, Clone, Deserialize, PartialEq)]
pub struct EngineConfig {
    #[serde(default)]
    pub batch: BatchSettings,
}

/// Load the engine config from `config/engine.{toml,...}` if present,
/// falling back to defaults otherwise.
pub fn load_engine_config() -> anyhow::Result<EngineConfig> {
    let settings = config::Config::builder()
        .add_source(config::File::with_name("config/engine").required(false))
        .build()?;

    Ok(settings.try_deserialize()?)
}
