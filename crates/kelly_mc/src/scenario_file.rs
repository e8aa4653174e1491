//! YAML scenario files
//!
//! A scenario file is a serialized [`SimulationConfig`]. Only `setups` is
//! required; run sizes, stakes, and the `kelly` / `analytics` policy sections
//! fall back to their defaults when omitted.

use std::fs;
use std::io;
use std::path::Path;

use color_eyre::eyre::WrapErr;
use kelly_mc_core::SimulationConfig;

/// Parse a configuration from YAML
pub fn from_yaml(yaml: &str) -> Result<SimulationConfig, serde_saphyr::Error> {
    serde_saphyr::from_str(yaml)
}

/// Serialize a configuration to YAML
pub fn to_yaml(config: &SimulationConfig) -> Result<String, serde_saphyr::ser::Error> {
    serde_saphyr::to_string(config)
}

/// Load and parse a scenario file
pub fn load_config(path: &Path) -> color_eyre::Result<SimulationConfig> {
    let content = fs::read_to_string(path)
        .wrap_err_with(|| format!("Failed to read scenario file {}", path.display()))?;
    let config = from_yaml(&content)
        .wrap_err_with(|| format!("Failed to parse scenario file {}", path.display()))?;

    tracing::info!(
        path = %path.display(),
        setups = config.setups.len(),
        "Loaded scenario file"
    );
    Ok(config)
}

/// Write the two-regime reference configuration as a starting point
pub fn write_example(path: &Path) -> color_eyre::Result<()> {
    let yaml = to_yaml(&SimulationConfig::default_two_regime())
        .wrap_err("Failed to serialize example configuration")?;
    atomic_write(path, &yaml)
        .wrap_err_with(|| format!("Failed to write {}", path.display()))?;

    tracing::info!(path = %path.display(), "Wrote example scenario file");
    Ok(())
}

/// Write content to a file using write-then-rename so an interrupted write
/// never leaves a truncated scenario file behind.
fn atomic_write(path: &Path, content: &str) -> io::Result<()> {
    let temp_path = path.with_extension("yaml.tmp");
    fs::write(&temp_path, content)?;
    fs::rename(&temp_path, path)?;
    Ok(())
}
