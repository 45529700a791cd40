use crate::core::dataset::DEFAULT_DATA_URL;
use crate::core::ConfigProvider;
use crate::domain::model::{ChartOptions, OutputFormat};
use crate::utils::error::{ChartError, Result};
use crate::utils::validation::{self, Validate};
use regex::{Captures, Regex};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::sync::OnceLock;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TomlConfig {
    #[serde(default)]
    pub source: SourceConfig,
    #[serde(default)]
    pub chart: ChartConfig,
    #[serde(default)]
    pub colors: ColorConfig,
    #[serde(default)]
    pub output: OutputConfig,
    pub monitoring: Option<MonitoringConfig>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SourceConfig {
    pub url: Option<String>,
    pub offline: Option<bool>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ChartConfig {
    pub title: Option<String>,
    pub subtitle: Option<String>,
    pub width: Option<u32>,
    pub height: Option<u32>,
    pub point_radius: Option<f64>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ColorConfig {
    pub clean: Option<String>,
    pub doping: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutputConfig {
    #[serde(default = "default_output_path")]
    pub path: String,
    pub format: Option<OutputFormat>,
    pub filename: Option<String>,
}

fn default_output_path() -> String {
    "./output".to_string()
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            path: default_output_path(),
            format: None,
            filename: None,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MonitoringConfig {
    pub enabled: bool,
}

fn env_placeholder() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"\$\{([^}]+)\}").expect("placeholder pattern is valid"))
}

impl TomlConfig {
    /// 從 TOML 檔案載入配置
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path)?;
        Self::from_toml_str(&content)
    }

    /// 從 TOML 字串解析配置
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let processed_content = Self::substitute_env_vars(content);

        toml::from_str(&processed_content).map_err(|e| ChartError::ConfigValidationError {
            field: "toml_parsing".to_string(),
            message: format!("TOML parsing error: {}", e),
        })
    }

    /// 替換環境變數 (例如 ${DATA_URL})，未設定的保持原樣
    fn substitute_env_vars(content: &str) -> String {
        env_placeholder()
            .replace_all(content, |caps: &Captures| {
                let var_name = &caps[1];
                std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
            })
            .into_owned()
    }

    pub fn monitoring_enabled(&self) -> bool {
        self.monitoring.as_ref().map(|m| m.enabled).unwrap_or(false)
    }

    pub fn validate_config(&self) -> Result<()> {
        if !self.offline() {
            validation::validate_url("source.url", self.data_url())?;
        }

        validation::validate_path("output.path", &self.output.path)?;
        if let Some(filename) = &self.output.filename {
            validation::validate_file_name("output.filename", filename)?;
        }

        let options = self.chart_options();
        validation::validate_chart_dimension("chart.width", options.width)?;
        validation::validate_chart_dimension("chart.height", options.height)?;
        validation::validate_non_empty_string("chart.title", &options.title)?;
        validation::validate_range("chart.point_radius", options.point_radius, 1.0, 30.0)?;
        validation::validate_distinct_colors("colors", &options.clean_color, &options.doping_color)?;

        Ok(())
    }
}

impl ConfigProvider for TomlConfig {
    fn data_url(&self) -> &str {
        self.source.url.as_deref().unwrap_or(DEFAULT_DATA_URL)
    }

    fn output_path(&self) -> &str {
        &self.output.path
    }

    fn output_format(&self) -> OutputFormat {
        self.output.format.unwrap_or(OutputFormat::Html)
    }

    fn output_filename(&self) -> String {
        self.output
            .filename
            .clone()
            .unwrap_or_else(|| self.output_format().default_filename())
    }

    fn offline(&self) -> bool {
        self.source.offline.unwrap_or(false)
    }

    fn chart_options(&self) -> ChartOptions {
        let defaults = ChartOptions::default();
        ChartOptions {
            title: self.chart.title.clone().unwrap_or(defaults.title),
            subtitle: self.chart.subtitle.clone().unwrap_or(defaults.subtitle),
            width: self.chart.width.unwrap_or(defaults.width),
            height: self.chart.height.unwrap_or(defaults.height),
            margins: defaults.margins,
            point_radius: self.chart.point_radius.unwrap_or(defaults.point_radius),
            clean_color: self.colors.clean.clone().unwrap_or(defaults.clean_color),
            doping_color: self.colors.doping.clone().unwrap_or(defaults.doping_color),
        }
    }
}

impl Validate for TomlConfig {
    fn validate(&self) -> Result<()> {
        self.validate_config()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_parse_full_toml_config() {
        let toml_content = r##"
[source]
url = "https://example.com/cyclist-data.json"

[chart]
title = "Alpe d'Huez"
width = 1024
height = 700
point_radius = 5.0

[colors]
clean = "#2ca02c"
doping = "#d62728"

[output]
path = "./charts"
format = "svg"
filename = "alpe.svg"

[monitoring]
enabled = true
"##;

        let config = TomlConfig::from_toml_str(toml_content).unwrap();

        assert_eq!(config.data_url(), "https://example.com/cyclist-data.json");
        assert_eq!(config.output_format(), OutputFormat::Svg);
        assert_eq!(config.output_filename(), "alpe.svg");
        assert!(config.monitoring_enabled());

        let options = config.chart_options();
        assert_eq!(options.title, "Alpe d'Huez");
        assert_eq!(options.width, 1024);
        assert_eq!(options.clean_color, "#2ca02c");
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_empty_config_uses_defaults() {
        let config = TomlConfig::from_toml_str("").unwrap();

        assert_eq!(config.data_url(), DEFAULT_DATA_URL);
        assert_eq!(config.output_path(), "./output");
        assert_eq!(config.output_filename(), "scatter-plot.html");
        assert_eq!(config.chart_options(), ChartOptions::default());
        assert!(!config.monitoring_enabled());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_env_var_substitution() {
        std::env::set_var("CYCLIST_SCATTER_TEST_URL", "https://mirror.example.com/data.json");

        let toml_content = r#"
[source]
url = "${CYCLIST_SCATTER_TEST_URL}"
"#;

        let config = TomlConfig::from_toml_str(toml_content).unwrap();
        assert_eq!(config.data_url(), "https://mirror.example.com/data.json");

        std::env::remove_var("CYCLIST_SCATTER_TEST_URL");
    }

    #[test]
    fn test_config_validation() {
        let bad_url = TomlConfig::from_toml_str("[source]\nurl = \"invalid-url\"\n").unwrap();
        assert!(bad_url.validate().is_err());

        let same_colors = TomlConfig::from_toml_str(
            "[colors]\nclean = \"#ff7f0e\"\ndoping = \"#FF7F0E\"\n",
        )
        .unwrap();
        assert!(same_colors.validate().is_err());

        let escaping_name =
            TomlConfig::from_toml_str("[output]\nfilename = \"../chart.html\"\n").unwrap();
        assert!(escaping_name.validate().is_err());
    }

    #[test]
    fn test_format_accepts_same_spelling_as_cli() {
        let config = TomlConfig::from_toml_str("[output]\nformat = \"SVG\"\n").unwrap();
        assert_eq!(config.output_format(), OutputFormat::Svg);
        assert_eq!(config.output_filename(), "scatter-plot.svg");

        let config = TomlConfig::from_toml_str("[output]\nformat = \"Html\"\n").unwrap();
        assert_eq!(config.output_format(), "HTML".parse::<OutputFormat>().unwrap());
    }

    #[test]
    fn test_invalid_format_fails_to_parse() {
        let result = TomlConfig::from_toml_str("[output]\nformat = \"png\"\n");
        assert!(matches!(
            result,
            Err(ChartError::ConfigValidationError { .. })
        ));
    }

    #[test]
    fn test_config_from_file() {
        let mut temp_file = NamedTempFile::new().unwrap();
        temp_file
            .write_all(b"[source]\noffline = true\n\n[chart]\ntitle = \"From file\"\n")
            .unwrap();

        let config = TomlConfig::from_file(temp_file.path()).unwrap();
        assert!(config.offline());
        assert_eq!(config.chart_options().title, "From file");
    }
}
