use crate::core::Pipeline;
use crate::utils::error::Result;

pub struct EtlEngine<P: Pipeline> {
    pipeline: P,
}

impl<P: Pipeline> EtlEngine<P> {
    pub fn new(pipeline: P) -> Self {
        Self { pipeline }
    }

    pub async fn run(&self) -> Result<String> {
        tracing::info!("Starting ETL process...");

        // Extract
        tracing::info!("Extracting data...");
        let raw_points = self.pipeline.extract().await?;
        tracing::info!("Extracted {} rows", raw_points.len());

        // Transform
        tracing::info!("Transforming data...");
        let transformed = self.pipeline.transform(raw_points).await?;
        tracing::info!("Keeping {} rows", transformed.points.len());

        // Load
        tracing::info!("Loading data...");
        let output_path = self.pipeline.load(transformed).await?;
        tracing::info!("Output saved to: {}", output_path);

        Ok(output_path)
    }
}
