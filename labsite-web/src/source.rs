use async_trait::async_trait;
use labsite_http::{HttpClient, HttpError};

/// Anything that can hand back the HTML behind a record link.
#[async_trait]
pub trait PageSource: Send + Sync {
    async fn fetch_page(&self, url: &str) -> Result<String, HttpError>;
}

#[async_trait]
impl PageSource for HttpClient {
    async fn fetch_page(&self, url: &str) -> Result<String, HttpError> {
        self.get_text(url).await
    }
}
