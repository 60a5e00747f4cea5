use crate::domain::model::{ClosePoint, TransformResult};
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
    fn symbol(&self) -> &str;
    fn data_dir(&self) -> &str;
    fn output_dir(&self) -> &str;
    fn tail(&self) -> usize;
    fn use_eastmoney(&self) -> bool;
    fn endpoint(&self) -> &str;
}

/// Seam for the live intraday provider; `code` is the 6-digit exchange code.
pub trait IntradaySource: Send + Sync {
    fn fetch_today(
        &self,
        code: &str,
    ) -> impl std::future::Future<Output = Result<Vec<ClosePoint>>> + Send;
}

#[async_trait]
pub trait Pipeline: Send + Sync {
    async fn extract(&self) -> Result<Vec<ClosePoint>>;
    async fn transform(&self, points: Vec<ClosePoint>) -> Result<TransformResult>;
    async fn load(&self, result: TransformResult) -> Result<String>;
}
