use reformulator_compiler_html::CompileOptions;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

pub const DEFAULT_CONFIG_NAME: &str = "reformulator.config.json";

/// Reformulator configuration file format
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Config {
    /// Source directory containing template .json files
    #[serde(default = "default_src_dir")]
    pub src_dir: String,

    /// Directory rendered .html files are written to
    #[serde(default = "default_out_dir")]
    pub out_dir: String,

    /// Directory holding `<name>.data.json` files for each template
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data_dir: Option<String>,

    /// Emit the client bootstrap script for pages that bind state
    #[serde(default = "default_rehydrate")]
    pub rehydrate: bool,

    /// Name of the client bootstrap function
    #[serde(default = "default_bootstrap")]
    pub bootstrap: String,
}

fn default_src_dir() -> String {
    "src".to_string()
}

fn default_out_dir() -> String {
    "dist".to_string()
}

fn default_rehydrate() -> bool {
    true
}

fn default_bootstrap() -> String {
    "reform".to_string()
}

impl Config {
    /// Load config from a directory
    pub fn load(cwd: &str) -> anyhow::Result<Self> {
        let config_path = PathBuf::from(cwd).join(DEFAULT_CONFIG_NAME);

        if config_path.exists() {
            let content = std::fs::read_to_string(&config_path)?;
            let config: Config = serde_json::from_str(&content)?;
            Ok(config)
        } else {
            // Return default config if none exists
            Ok(Config::default())
        }
    }

    /// Get absolute path to source directory
    pub fn get_src_dir(&self, cwd: &str) -> PathBuf {
        PathBuf::from(cwd).join(&self.src_dir)
    }

    pub fn get_out_dir(&self, cwd: &str) -> PathBuf {
        PathBuf::from(cwd).join(&self.out_dir)
    }

    pub fn get_data_dir(&self, cwd: &str) -> Option<PathBuf> {
        self.data_dir.as_ref().map(|dir| PathBuf::from(cwd).join(dir))
    }

    pub fn compile_options(&self) -> CompileOptions {
        CompileOptions {
            rehydrate: self.rehydrate,
            bootstrap: self.bootstrap.clone(),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            src_dir: default_src_dir(),
            out_dir: default_out_dir(),
            data_dir: None,
            rehydrate: default_rehydrate(),
            bootstrap: default_bootstrap(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_config() {
        let json = r#"{
            "srcDir": "templates",
            "outDir": "public",
            "dataDir": "data",
            "rehydrate": false,
            "bootstrap": "hydrate"
        }"#;

        let config: Config = serde_json::from_str(json).unwrap();
        assert_eq!(config.src_dir, "templates");
        assert_eq!(config.out_dir, "public");
        assert_eq!(config.data_dir, Some("data".to_string()));
        assert!(!config.compile_options().rehydrate);
        assert_eq!(config.compile_options().bootstrap, "hydrate");
    }

    #[test]
    fn test_partial_config_uses_defaults() {
        let config: Config = serde_json::from_str(r#"{ "srcDir": "pages" }"#).unwrap();
        assert_eq!(config.src_dir, "pages");
        assert_eq!(config.out_dir, "dist");
        assert!(config.rehydrate);
        assert_eq!(config.bootstrap, "reform");
    }

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.src_dir, "src");
        assert_eq!(config.data_dir, None);
        assert_eq!(config.get_data_dir("/project"), None);
    }

    #[test]
    fn test_missing_file_loads_defaults() {
        let dir = tempfile::TempDir::new().unwrap();
        let config = Config::load(&dir.path().display().to_string()).unwrap();
        assert_eq!(config.src_dir, "src");
    }
}
