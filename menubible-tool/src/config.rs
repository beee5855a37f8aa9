use std::path::PathBuf;

use menubible_core::ThemeName;
use serde::Deserialize;
use tracing::warn;

use crate::backend::Backend;

const DEFAULT_PROJECT_ID: &str = "eauzone-bible";
const DEFAULT_CLOUD_NAME: &str = "dez7mobse";
const DEFAULT_UPLOAD_PRESET: &str = "dypkyxtz";
// Venue-specific passcodes belong in config.toml, not in the defaults.
const DEFAULT_PASSCODES: &[&str] = &["admin", "800123"];

#[derive(Debug, Deserialize, Default)]
pub struct Config {
    pub theme: Option<ThemeName>,
    pub passcodes: Option<Vec<String>>,
    #[serde(default)]
    pub store: StoreConfig,
    #[serde(default)]
    pub firestore: FirestoreConfig,
    #[serde(default)]
    pub cloudinary: CloudinaryConfig,
}

#[derive(Debug, Deserialize, Default)]
pub struct StoreConfig {
    #[serde(default)]
    pub backend: Backend,
    /// JSON file loaded into the memory backend.
    pub seed: Option<PathBuf>,
}

#[derive(Debug, Deserialize, Default)]
pub struct FirestoreConfig {
    pub project_id: Option<String>,
    pub api_key: Option<String>,
}

#[derive(Debug, Deserialize, Default)]
pub struct CloudinaryConfig {
    pub cloud_name: Option<String>,
    pub upload_preset: Option<String>,
}

/// Fully resolved configuration after CLI flags, environment and file.
#[derive(Debug, Clone, PartialEq)]
pub struct Settings {
    pub backend: Backend,
    pub seed: Option<PathBuf>,
    pub project_id: Option<String>,
    pub api_key: Option<String>,
    pub cloud_name: String,
    pub upload_preset: String,
    pub passcodes: Vec<String>,
    pub theme: ThemeName,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            backend: Backend::default(),
            seed: None,
            project_id: Some(DEFAULT_PROJECT_ID.to_string()),
            api_key: None,
            cloud_name: DEFAULT_CLOUD_NAME.to_string(),
            upload_preset: DEFAULT_UPLOAD_PRESET.to_string(),
            passcodes: DEFAULT_PASSCODES.iter().map(|p| p.to_string()).collect(),
            theme: ThemeName::default(),
        }
    }
}

/// Overrides given on the command line.
#[derive(Debug, Default)]
pub struct CliOverrides {
    pub backend: Option<Backend>,
    pub seed: Option<PathBuf>,
    pub project_id: Option<String>,
    pub theme: Option<ThemeName>,
}

fn config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|p| p.join("menubible").join("config.toml"))
}

pub fn log_path() -> Option<PathBuf> {
    dirs::data_local_dir().map(|p| p.join("menubible").join("bible.log"))
}

pub fn load_config() -> Config {
    let Some(path) = config_path() else {
        return Config::default();
    };

    let Ok(content) = std::fs::read_to_string(&path) else {
        return Config::default();
    };

    match toml::from_str(&content) {
        Ok(config) => config,
        Err(e) => {
            warn!(path = %path.display(), "Ignoring unreadable config: {e}");
            Config::default()
        }
    }
}

fn env_var(name: &str) -> Option<String> {
    std::env::var(name).ok().filter(|v| !v.is_empty())
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.is_empty())
}

/// Merges CLI flags over environment over the config file over defaults.
pub fn resolve(config: Config, cli: CliOverrides) -> Settings {
    let defaults = Settings::default();

    let project_id = cli
        .project_id
        .or_else(|| env_var("MENUBIBLE_PROJECT_ID"))
        .or(non_empty(config.firestore.project_id))
        .or(defaults.project_id);

    let api_key = env_var("MENUBIBLE_API_KEY").or(non_empty(config.firestore.api_key));

    let passcodes = config
        .passcodes
        .filter(|p| !p.is_empty())
        .unwrap_or(defaults.passcodes);

    Settings {
        backend: cli.backend.unwrap_or(config.store.backend),
        seed: cli.seed.or(config.store.seed),
        project_id,
        api_key,
        cloud_name: non_empty(config.cloudinary.cloud_name).unwrap_or(defaults.cloud_name),
        upload_preset: non_empty(config.cloudinary.upload_preset).unwrap_or(defaults.upload_preset),
        passcodes,
        theme: cli.theme.or(config.theme).unwrap_or(defaults.theme),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_full_config() {
        let config: Config = toml::from_str(
            r#"
            theme = "light"
            passcodes = ["letmein"]

            [store]
            backend = "memory"
            seed = "/tmp/items.json"

            [firestore]
            project_id = "my-bistro"

            [cloudinary]
            cloud_name = "bistro"
            upload_preset = "menu"
            "#,
        )
        .unwrap();

        assert_eq!(config.theme, Some(ThemeName::Light));
        assert_eq!(config.store.backend, Backend::Memory);
        assert_eq!(config.firestore.project_id.as_deref(), Some("my-bistro"));
        assert_eq!(config.cloudinary.upload_preset.as_deref(), Some("menu"));
    }

    #[test]
    fn empty_config_uses_defaults() {
        let config: Config = toml::from_str("").unwrap();
        let settings = resolve(
            config,
            CliOverrides {
                project_id: Some("cli-project".to_string()),
                ..CliOverrides::default()
            },
        );

        assert_eq!(settings.backend, Backend::Firestore);
        assert_eq!(settings.project_id.as_deref(), Some("cli-project"));
        assert_eq!(settings.cloud_name, DEFAULT_CLOUD_NAME);
        assert_eq!(settings.passcodes, vec!["admin".to_string(), "800123".to_string()]);
        assert_eq!(settings.theme, ThemeName::Dark);
    }

    #[test]
    fn cli_overrides_file() {
        let config = Config {
            theme: Some(ThemeName::Light),
            passcodes: Some(vec![]),
            ..Config::default()
        };
        let settings = resolve(
            config,
            CliOverrides {
                theme: Some(ThemeName::Seasonal),
                backend: Some(Backend::Memory),
                ..CliOverrides::default()
            },
        );

        assert_eq!(settings.theme, ThemeName::Seasonal);
        assert_eq!(settings.backend, Backend::Memory);
        assert_eq!(settings.passcodes.len(), 2);
    }
}
