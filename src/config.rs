use color_eyre::{eyre::eyre, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use url::Url;

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
  pub server: ServerConfig,
  /// Rows per fetched page (the server caps at 100).
  pub page_size: Option<u32>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
  /// Root URL of the inventory service, e.g. "https://inventory.example.com".
  pub url: String,
}

impl Config {
  /// Load configuration from file.
  ///
  /// Search order:
  /// 1. Explicit path if provided
  /// 2. ./stockwatch.yaml (current directory)
  /// 3. $XDG_CONFIG_HOME/stockwatch/config.yaml
  /// 4. ~/.config/stockwatch/config.yaml
  pub fn load(explicit_path: Option<&Path>) -> Result<Self> {
    let path = if let Some(p) = explicit_path {
      if p.exists() {
        Some(p.to_path_buf())
      } else {
        return Err(eyre!("Config file not found: {}", p.display()));
      }
    } else {
      Self::find_config_file()
    };

    match path {
      Some(p) => Self::load_from_path(&p),
      None => Err(eyre!(
        "No configuration file found. Create one at ~/.config/stockwatch/config.yaml\n\
                 or pass --server <url>."
      )),
    }
  }

  /// Build a config directly from a server URL (CLI override).
  pub fn from_server_url(url: String) -> Self {
    Self {
      server: ServerConfig { url },
      page_size: None,
    }
  }

  fn find_config_file() -> Option<PathBuf> {
    // Check current directory
    let local = PathBuf::from("stockwatch.yaml");
    if local.exists() {
      return Some(local);
    }

    // Check XDG config directory
    if let Some(config_dir) = dirs::config_dir() {
      let xdg_path = config_dir.join("stockwatch").join("config.yaml");
      if xdg_path.exists() {
        return Some(xdg_path);
      }
    }

    None
  }

  fn load_from_path(path: &Path) -> Result<Self> {
    let contents = std::fs::read_to_string(path)
      .map_err(|e| eyre!("Failed to read config file {}: {}", path.display(), e))?;

    let config: Config = serde_yaml::from_str(&contents)
      .map_err(|e| eyre!("Failed to parse config file {}: {}", path.display(), e))?;

    Ok(config)
  }

  /// The server root as a parsed URL.
  pub fn server_url(&self) -> Result<Url> {
    Url::parse(&self.server.url)
      .map_err(|e| eyre!("Invalid server url {}: {}", self.server.url, e))
  }

  /// Get the API bearer token from environment variables.
  ///
  /// Checks STOCKWATCH_TOKEN first, then INVENTORY_API_TOKEN as fallback.
  pub fn get_api_token() -> Result<String> {
    std::env::var("STOCKWATCH_TOKEN")
      .or_else(|_| std::env::var("INVENTORY_API_TOKEN"))
      .map_err(|_| {
        eyre!(
          "API token not found. Set STOCKWATCH_TOKEN or INVENTORY_API_TOKEN environment variable."
        )
      })
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn parses_a_minimal_config() {
    let config: Config =
      serde_yaml::from_str("server:\n  url: http://inventory.local:8000\npage_size: 50\n").unwrap();
    assert_eq!(config.server.url, "http://inventory.local:8000");
    assert_eq!(config.page_size, Some(50));
    assert_eq!(
      config.server_url().unwrap().as_str(),
      "http://inventory.local:8000/"
    );
  }

  #[test]
  fn page_size_is_optional() {
    let config: Config = serde_yaml::from_str("server:\n  url: https://inv.example.com\n").unwrap();
    assert_eq!(config.page_size, None);
  }
}
