use serde::Deserialize;
use std::collections::HashMap;

const CONFIG_FILE: &str = "config/gridflow";
const ENV_PREFIX: &str = "GRIDFLOW";

const DEFAULT_URL_TEMPLATE: &str =
    "https://powerflowmap.shikiblog.link/api/chinaiKikanJisseki.php?area=${area}&date=${date}";

#[derive(Debug, Deserialize, Clone, Default)]
pub struct AppConfig {
    #[serde(default)]
    pub source: SourceSettings,
    #[serde(default)]
    pub mapping: MappingSettings,
    #[serde(default)]
    pub output: OutputSettings,
    #[serde(default)]
    pub run: RunSettings,
}

#[derive(Debug, Deserialize, Clone)]
pub struct SourceSettings {
    /// Request URL with `${area}` and `${date}` placeholders.
    #[serde(default = "default_url_template")]
    pub url_template: String,
    /// Area tokens, fetched and reduced in this order.
    #[serde(default = "default_areas")]
    pub areas: Vec<String>,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

#[derive(Debug, Deserialize, Clone)]
pub struct MappingSettings {
    #[serde(default = "default_mapping_path")]
    pub path: String,
}

#[derive(Debug, Deserialize, Clone)]
pub struct OutputSettings {
    #[serde(default = "default_output_dir")]
    pub dir: String,
    #[serde(default = "default_latest_file")]
    pub latest_file: String,
}

#[derive(Debug, Deserialize, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum RunMode {
    #[default]
    Once,
    Serve,
}

#[derive(Debug, Deserialize, Clone)]
pub struct RunSettings {
    #[serde(default)]
    pub mode: RunMode,
    #[serde(default = "default_interval_secs")]
    pub interval_secs: u64,
    #[serde(default = "default_listen")]
    pub listen: String,
}

fn default_url_template() -> String {
    DEFAULT_URL_TEMPLATE.to_string()
}

fn default_areas() -> Vec<String> {
    // Hokkaido .. Okinawa
    (1..=10).map(|a| a.to_string()).collect()
}

fn default_timeout_secs() -> u64 {
    30
}

fn default_mapping_path() -> String {
    "mappings/line_map.json".to_string()
}

fn default_output_dir() -> String {
    "public/data".to_string()
}

fn default_latest_file() -> String {
    "latest.json".to_string()
}

fn default_interval_secs() -> u64 {
    3600
}

fn default_listen() -> String {
    "0.0.0.0:8080".to_string()
}

impl Default for SourceSettings {
    fn default() -> Self {
        Self {
            url_template: default_url_template(),
            areas: default_areas(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

impl Default for MappingSettings {
    fn default() -> Self {
        Self {
            path: default_mapping_path(),
        }
    }
}

impl Default for OutputSettings {
    fn default() -> Self {
        Self {
            dir: default_output_dir(),
            latest_file: default_latest_file(),
        }
    }
}

impl Default for RunSettings {
    fn default() -> Self {
        Self {
            mode: RunMode::default(),
            interval_secs: default_interval_secs(),
            listen: default_listen(),
        }
    }
}

/// Load `config/gridflow.{toml,yaml,json}` if present, then `GRIDFLOW__*`
/// environment overrides (e.g. `GRIDFLOW__OUTPUT__DIR`, `GRIDFLOW__SOURCE__AREAS=1,2,3`).
pub fn load_app_config() -> anyhow::Result<AppConfig> {
    let settings = config::Config::builder()
        .add_source(config::File::with_name(CONFIG_FILE).required(false))
        .add_source(
            config::Environment::with_prefix(ENV_PREFIX)
                .prefix_separator("__")
                .separator("__")
                .try_parsing(true)
                .list_separator(",")
                .with_list_parse_key("source.areas"),
        )
        .build()?;

    Ok(settings.try_deserialize()?)
}

/// Replace template variables in a URL. Values are percent-encoded.
pub fn prepare_url(template: &str, vars: &HashMap<String, String>) -> String {
    let mut result = template.to_string();
    for (key, value) in vars {
        let placeholder = format!("${{{}}}", key);
        result = result.replace(&placeholder, &urlencoding::encode(value));
    }
    result
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(toml: &str) -> AppConfig {
        config::Config::builder()
            .add_source(config::File::from_str(toml, config::FileFormat::Toml))
            .build()
            .unwrap()
            .try_deserialize()
            .unwrap()
    }

    #[test]
    fn test_prepare_url() {
        let mut vars = HashMap::new();
        vars.insert("area".to_string(), "3".to_string());
        vars.insert("date".to_string(), "20240615".to_string());

        let result = prepare_url(DEFAULT_URL_TEMPLATE, &vars);

        assert_eq!(
            result,
            "https://powerflowmap.shikiblog.link/api/chinaiKikanJisseki.php?area=3&date=20240615"
        );
    }

    #[test]
    fn test_prepare_url_encodes_values() {
        let mut vars = HashMap::new();
        vars.insert("area".to_string(), "東京 電力".to_string());

        let result = prepare_url("http://grid.test/?area=${area}", &vars);

        assert_eq!(result, "http://grid.test/?area=%E6%9D%B1%E4%BA%AC%20%E9%9B%BB%E5%8A%9B");
    }

    #[test]
    fn test_env_overrides() {
        // only this test touches GRIDFLOW__* variables
        let vars = [
            ("GRIDFLOW__SOURCE__AREAS", "3,5"),
            ("GRIDFLOW__OUTPUT__DIR", "/tmp/gridflow-out"),
            ("GRIDFLOW__SOURCE__TIMEOUT_SECS", "7"),
        ];
        for (key, value) in vars {
            unsafe { std::env::set_var(key, value) };
        }

        let result = load_app_config();

        for (key, _) in vars {
            unsafe { std::env::remove_var(key) };
        }

        let cfg = result.unwrap();
        assert_eq!(cfg.source.areas, vec!["3", "5"]);
        assert_eq!(cfg.output.dir, "/tmp/gridflow-out");
        assert_eq!(cfg.source.timeout_secs, 7);
        assert_eq!(cfg.mapping.path, "mappings/line_map.json");
    }

    #[test]
    fn test_defaults_when_empty() {
        let cfg = parse("");
        assert_eq!(cfg.source.areas.len(), 10);
        assert_eq!(cfg.source.areas[0], "1");
        assert_eq!(cfg.mapping.path, "mappings/line_map.json");
        assert_eq!(cfg.output.dir, "public/data");
        assert_eq!(cfg.output.latest_file, "latest.json");
        assert_eq!(cfg.run.mode, RunMode::Once);
    }

    #[test]
    fn test_partial_override() {
        let cfg = parse(
            r#"
            [source]
            areas = ["3", "5"]

            [run]
            mode = "serve"
            interval_secs = 600
            "#,
        );
        assert_eq!(cfg.source.areas, vec!["3", "5"]);
        assert_eq!(cfg.source.timeout_secs, 30);
        assert_eq!(cfg.run.mode, RunMode::Serve);
        assert_eq!(cfg.run.interval_secs, 600);
        assert_eq!(cfg.run.listen, "0.0.0.0:8080");
    }
}
