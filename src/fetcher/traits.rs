use crate::model::{FetchError, JobData};

/// A job board adapter: pulls postings from one external API and returns them
/// in the common [`JobData`] shape.
#[async_trait::async_trait]
pub trait JobFetcher: Send + Sync {
    /// Stable name stored with every job from this source.
    fn source_name(&self) -> &'static str;

    /// False when the source needs credentials that were not provided.
    fn is_configured(&self) -> bool {
        true
    }

    async fn fetch(&self) -> Result<Vec<JobData>, FetchError>;
}
