use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct TreeplusConfig {
    /// Grammar names to enable; all built-ins when unset
    pub languages: Option<Vec<String>>,
    /// Gitignore-style patterns skipped by `scan`
    #[serde(default)]
    pub exclude: Vec<String>,
    /// Default depth limit for `show`
    pub max_depth: Option<usize>,
}

pub fn default_config_path() -> PathBuf {
    PathBuf::from("treeplus.toml")
}

pub fn load_config(path: Option<&Path>) -> anyhow::Result<Option<TreeplusConfig>> {
    let path = path.map(Path::to_path_buf).unwrap_or_else(default_config_path);
    if !path.exists() {
        return Ok(None);
    }

    let contents = std::fs::read_to_string(&path)?;
    let config: TreeplusConfig = toml::from_str(&contents)?;
    Ok(Some(config))
}

pub fn write_config(path: &Path, config: &TreeplusConfig, force: bool) -> anyhow::Result<()> {
    if path.exists() && !force {
        anyhow::bail!("config already exists at {} (use --force to overwrite)", path.display());
    }

    let contents = toml::to_string_pretty(config)?;
    std::fs::write(path, contents)?;
    Ok(())
}
