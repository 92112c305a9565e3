use crate::domain::ports::Pipeline;
use crate::utils::error::{ErrorCategory, ErrorSeverity, Result};
use crate::utils::monitor::SystemMonitor;

pub struct PipelineEngine<P: Pipeline> {
    pipeline: P,
    monitor: SystemMonitor,
}

impl<P: Pipeline> PipelineEngine<P> {
    pub fn new(pipeline: P) -> Self {
        Self::new_with_monitoring(pipeline, false)
    }

    pub fn new_with_monitoring(pipeline: P, monitor_enabled: bool) -> Self {
        Self {
            pipeline,
            monitor: SystemMonitor::new(monitor_enabled),
        }
    }

    /// Runs extract → transform → load. A fetch failure is a checked
    /// outcome (`Ok(None)`): it is logged and the downstream phases are
    /// skipped. Storage and chart failures propagate to the caller.
    pub async fn run(&self) -> Result<Option<String>> {
        tracing::info!("Starting vaccine data pipeline...");

        let records = match self.pipeline.extract().await {
            Ok(records) => records,
            Err(e) if e.category() == ErrorCategory::Fetch => {
                match e.severity() {
                    ErrorSeverity::Critical => tracing::error!("💥 {}", e),
                    _ => tracing::error!("❌ {}", e),
                }
                return Ok(None);
            }
            Err(e) => return Err(e),
        };
        self.monitor.log_stats("Extract");
        tracing::info!("Extracted {} records", records.len());

        let result = self.pipeline.transform(records).await?;
        self.monitor.log_stats("Transform");
        tracing::info!("Transformed {} records", result.records.len());

        let output_path = self.pipeline.load(result).await?;
        self.monitor.log_stats("Load");
        tracing::info!("Output saved to: {}", output_path);

        self.monitor.log_final_stats();
        Ok(Some(output_path))
    }
}
