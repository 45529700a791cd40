pub mod cli;
pub mod toml_config;

#[cfg(feature = "cli")]
pub use self::args::CliConfig;

#[cfg(feature = "cli")]
mod args {
    use crate::core::dataset::DEFAULT_DATA_URL;
    use crate::core::ConfigProvider;
    use crate::domain::model::{ChartOptions, OutputFormat};
    use crate::utils::error::Result;
    use crate::utils::validation::{self, Validate};
    use clap::Parser;
    use serde::{Deserialize, Serialize};

    #[derive(Debug, Clone, Serialize, Deserialize, Parser)]
    #[command(name = "cyclist-scatter")]
    #[command(about = "Render a scatter plot of Alpe d'Huez climbing times")]
    pub struct CliConfig {
        #[arg(long, default_value = DEFAULT_DATA_URL)]
        pub data_url: String,

        #[arg(long, default_value = "./output")]
        pub output_path: String,

        #[arg(long, default_value = "html", help = "Output format: html or svg")]
        pub format: OutputFormat,

        #[arg(long, default_value = "920")]
        pub width: u32,

        #[arg(long, default_value = "630")]
        pub height: u32,

        #[arg(long, help = "Override the chart title")]
        pub title: Option<String>,

        #[arg(long, help = "Skip the network and use the bundled dataset")]
        pub offline: bool,

        #[arg(long, help = "Enable verbose output")]
        pub verbose: bool,

        #[arg(long, help = "Log CPU and memory usage per phase")]
        pub monitor: bool,

        #[arg(long, help = "Emit logs as JSON")]
        pub json_logs: bool,
    }

    impl ConfigProvider for CliConfig {
        fn data_url(&self) -> &str {
            &self.data_url
        }

        fn output_path(&self) -> &str {
            &self.output_path
        }

        fn output_format(&self) -> OutputFormat {
            self.format
        }

        fn offline(&self) -> bool {
            self.offline
        }

        fn chart_options(&self) -> ChartOptions {
            let mut options = ChartOptions {
                width: self.width,
                height: self.height,
                ..ChartOptions::default()
            };
            if let Some(title) = &self.title {
                options.title = title.clone();
            }
            options
        }
    }

    impl Validate for CliConfig {
        fn validate(&self) -> Result<()> {
            // 離線模式不會用到 URL
            if !self.offline {
                validation::validate_url("data_url", &self.data_url)?;
            }
            validation::validate_path("output_path", &self.output_path)?;
            validation::validate_chart_dimension("width", self.width)?;
            validation::validate_chart_dimension("height", self.height)?;
            if let Some(title) = &self.title {
                validation::validate_non_empty_string("title", title)?;
            }
            Ok(())
        }
    }

}
