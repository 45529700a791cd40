use crate::core::dataset::{acquire_dataset, fallback_dataset};
use crate::core::layout::layout;
use crate::core::render::render;
use crate::core::{ConfigProvider, Dataset, Pipeline, ScatterPlot, Storage};
use crate::utils::error::Result;
use reqwest::Client;
use std::path::Path;

pub struct ScatterPipeline<S: Storage, C: ConfigProvider> {
    storage: S,
    config: C,
    client: Client,
}

impl<S: Storage, C: ConfigProvider> ScatterPipeline<S, C> {
    pub fn new(storage: S, config: C) -> Self {
        Self::with_client(storage, config, Client::new())
    }

    pub fn with_client(storage: S, config: C, client: Client) -> Self {
        Self {
            storage,
            config,
            client,
        }
    }
}

#[async_trait::async_trait]
impl<S: Storage, C: ConfigProvider> Pipeline for ScatterPipeline<S, C> {
    async fn extract(&self) -> Result<Dataset> {
        let dataset = if self.config.offline() {
            tracing::info!("📴 Offline mode, using the bundled dataset");
            fallback_dataset()?
        } else {
            acquire_dataset(&self.client, self.config.data_url()).await?
        };

        tracing::debug!("Dataset: {} records from {}", dataset.len(), dataset.origin);
        if tracing::enabled!(tracing::Level::TRACE) {
            tracing::trace!("{}", serde_json::to_string(&dataset.records)?);
        }

        Ok(dataset)
    }

    async fn transform(&self, data: Dataset) -> Result<ScatterPlot> {
        layout(&data, &self.config.chart_options())
    }

    async fn load(&self, plot: ScatterPlot) -> Result<String> {
        let format = self.config.output_format();
        let filename = self.config.output_filename();
        let document = render(&plot, format);

        // 每次都整份覆寫，不做增量更新
        tracing::debug!(
            "Writing {} chart ({} bytes) as {}",
            format,
            document.len(),
            filename
        );
        self.storage.write_file(&filename, document.as_bytes()).await?;

        let output_path = Path::new(self.config.output_path()).join(&filename);
        Ok(output_path.to_string_lossy().into_owned())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::model::{ChartOptions, DatasetOrigin, OutputFormat};
    use crate::utils::error::ChartError;
    use httpmock::prelude::*;
    use std::collections::HashMap;
    use std::sync::Arc;
    use tokio::sync::Mutex;

    #[derive(Clone)]
    struct MockStorage {
        files: Arc<Mutex<HashMap<String, Vec<u8>>>>,
    }

    impl MockStorage {
        fn new() -> Self {
            Self {
                files: Arc::new(Mutex::new(HashMap::new())),
            }
        }

        async fn get_file(&self, path: &str) -> Option<Vec<u8>> {
            let files = self.files.lock().await;
            files.get(path).cloned()
        }
    }

    impl Storage for MockStorage {
        async fn read_file(&self, path: &str) -> Result<Vec<u8>> {
            let files = self.files.lock().await;
            files.get(path).cloned().ok_or_else(|| {
                ChartError::IoError(std::io::Error::new(
                    std::io::ErrorKind::NotFound,
                    format!("File not found: {}", path),
                ))
            })
        }

        async fn write_file(&self, path: &str, data: &[u8]) -> Result<()> {
            let mut files = self.files.lock().await;
            files.insert(path.to_string(), data.to_vec());
            Ok(())
        }
    }

    struct TestConfig {
        data_url: String,
        format: OutputFormat,
        offline: bool,
    }

    impl ConfigProvider for TestConfig {
        fn data_url(&self) -> &str {
            &self.data_url
        }

        fn output_path(&self) -> &str {
            "./charts"
        }

        fn output_format(&self) -> OutputFormat {
            self.format
        }

        fn offline(&self) -> bool {
            self.offline
        }

        fn chart_options(&self) -> ChartOptions {
            ChartOptions::default()
        }
    }

    #[tokio::test]
    async fn test_offline_extract_skips_network() {
        let server = MockServer::start();
        let api_mock = server.mock(|when, then| {
            when.method(GET).path("/cyclist-data.json");
            then.status(200).json_body(serde_json::json!([]));
        });

        let config = TestConfig {
            data_url: server.url("/cyclist-data.json"),
            format: OutputFormat::Html,
            offline: true,
        };
        let pipeline = ScatterPipeline::new(MockStorage::new(), config);

        let dataset = pipeline.extract().await.unwrap();

        api_mock.assert_hits(0);
        assert_eq!(dataset.origin, DatasetOrigin::Fallback);
    }

    #[tokio::test]
    async fn test_load_overwrites_previous_chart() {
        let storage = MockStorage::new();
        let config = TestConfig {
            data_url: "http://127.0.0.1:9/unused".to_string(),
            format: OutputFormat::Svg,
            offline: true,
        };
        let pipeline = ScatterPipeline::new(storage.clone(), config);

        storage
            .write_file("scatter-plot.svg", b"stale chart")
            .await
            .unwrap();

        let dataset = pipeline.extract().await.unwrap();
        let plot = pipeline.transform(dataset).await.unwrap();
        let path = pipeline.load(plot).await.unwrap();

        assert!(path.ends_with("scatter-plot.svg"));
        let written = String::from_utf8(storage.get_file("scatter-plot.svg").await.unwrap()).unwrap();
        assert!(written.starts_with("<svg"));
        assert!(!written.contains("stale chart"));
        assert_eq!(written.matches("class=\"dot\"").count(), 35);

        let read_back = storage.read_file("scatter-plot.svg").await.unwrap();
        assert_eq!(read_back, written.into_bytes());
    }
}
