use crate::models::Config;
use anyhow::{Context, Result};
use std::fs;
use std::path::Path;

pub const DEFAULT_CONFIG_FILE: &str = "grid_explorer.toml";

/// 加载配置文件
///
/// 未指定路径且默认配置文件不存在时使用内置默认值；显式指定的文件必须存在。
/// `.yaml` / `.yml` 按YAML解析，其余按TOML解析。
pub fn load_config(config_path: Option<&Path>) -> Result<Config> {
    let path = match config_path {
        Some(path) => path,
        None => {
            let default_path = Path::new(DEFAULT_CONFIG_FILE);
            if !default_path.exists() {
                tracing::debug!("No {} found, using built-in defaults", DEFAULT_CONFIG_FILE);
                return Ok(Config::default());
            }
            default_path
        }
    };

    // 读取配置文件内容
    let config_content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file: {}", path.display()))?;

    parse_config(&config_content, path)
}

fn parse_config(content: &str, path: &Path) -> Result<Config> {
    let is_yaml = path
        .extension()
        .map(|ext| ext == "yaml" || ext == "yml")
        .unwrap_or(false);

    let config: Config = if is_yaml {
        serde_yaml::from_str(content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?
    } else {
        toml::from_str(content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?
    };

    Ok(config)
}
