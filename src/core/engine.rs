use crate::core::Pipeline;
use crate::utils::error::Result;
use crate::utils::monitor::SystemMonitor;

pub struct ChartEngine<P: Pipeline> {
    pipeline: P,
    monitor_enabled: bool,
}

impl<P: Pipeline> ChartEngine<P> {
    pub fn new(pipeline: P) -> Self {
        Self::new_with_monitoring(pipeline, false)
    }

    pub fn new_with_monitoring(pipeline: P, monitor_enabled: bool) -> Self {
        Self {
            pipeline,
            monitor_enabled,
        }
    }

    /// 取得資料 -> 排版 -> 輸出，回傳輸出檔案路徑
    pub async fn run(&self) -> Result<String> {
        let mut monitor = SystemMonitor::new(self.monitor_enabled);
        tracing::info!("Starting chart render...");

        let dataset = self.pipeline.extract().await?;
        tracing::info!(
            "Resolved {} race records ({})",
            dataset.len(),
            dataset.origin
        );
        monitor.log_phase("Acquire");

        let plot = self.pipeline.transform(dataset).await?;
        tracing::info!(
            "Laid out {} points, {} legend entries",
            plot.points.len(),
            plot.legend.len()
        );
        monitor.log_phase("Layout");

        let output_path = self.pipeline.load(plot).await?;
        tracing::info!("Chart written to: {}", output_path);
        monitor.log_phase("Render");

        monitor.log_final_stats();
        Ok(output_path)
    }
}
