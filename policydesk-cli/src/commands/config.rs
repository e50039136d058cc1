use std::{fs, path::Path};

use anyhow::{Context, Result};
use shared::config::ClientConfig;

/// Renders the resolved configuration in the specified format.
///
/// # Arguments
/// * `config` - The resolved configuration.
/// * `format` - `toml` or `json`.
/// * `output` - File to write; stdout when absent.
///
/// # Errors
/// Returns an error if the format is unsupported or if writing the file fails.
pub fn write_config(config: &ClientConfig, format: &str, output: Option<&Path>) -> Result<()> {
    let rendered = config.render(format)?;
    match output {
        Some(path) => {
            fs::write(path, rendered.as_bytes())
                .with_context(|| format!("failed to write {}", path.display()))?;
            println!(
                "Configuration file '{}' generated successfully.",
                path.display()
            );
        }
        None => print!("{rendered}"),
    }
    Ok(())
}
