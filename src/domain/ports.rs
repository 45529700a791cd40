use crate::domain::model::{ChartOptions, Dataset, OutputFormat, ScatterPlot};
use crate::utils::error::Result;
use async_trait::async_trait;

pub trait Storage: Send + Sync {
    fn read_file(&self, path: &str) -> impl std::future::Future<Output = Result<Vec<u8>>> + Send;
    fn write_file(
        &self,
        path: &str,
        data: &[u8],
    ) -> impl std::future::Future<Output = Result<()>> + Send;
}

pub trait ConfigProvider: Send + Sync {
    fn data_url(&self) -> &str;
    fn output_path(&self) -> &str;
    fn output_format(&self) -> OutputFormat;
    fn output_filename(&self) -> String {
        self.output_format().default_filename()
    }
    fn offline(&self) -> bool {
        false
    }
    fn chart_options(&self) -> ChartOptions;
}

#[async_trait]
pub trait Pipeline: Send + Sync {
    async fn extract(&self) -> Result<Dataset>;
    async fn transform(&self, data: Dataset) -> Result<ScatterPlot>;
    async fn load(&self, plot: ScatterPlot) -> Result<String>;
}
