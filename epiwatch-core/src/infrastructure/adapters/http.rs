// epiwatch-core/src/infrastructure/adapters/http.rs

use std::io::Write;
use std::time::Duration;

use tempfile::NamedTempFile;
use tracing::{debug, instrument};

use crate::infrastructure::error::InfrastructureError;

pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(60);

/// Downloads remote CSV exports to a temporary file.
pub struct HttpFetcher {
    client: reqwest::Client,
}

impl HttpFetcher {
    pub fn new(timeout: Duration) -> Result<Self, InfrastructureError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .user_agent(concat!("epiwatch/", env!("CARGO_PKG_VERSION")))
            .build()?;
        Ok(Self { client })
    }

    /// Non-2xx responses are errors. The file is deleted when dropped.
    #[instrument(skip(self))]
    pub async fn download(&self, url: &str) -> Result<NamedTempFile, InfrastructureError> {
        let response = self.client.get(url).send().await?.error_for_status()?;
        let body = response.bytes().await?;

        let mut file = tempfile::Builder::new()
            .prefix("epiwatch-source-")
            .suffix(".csv")
            .tempfile()?;
        file.write_all(&body)?;
        file.flush()?;

        debug!(bytes = body.len(), path = %file.path().display(), "Remote source spooled");
        Ok(file)
    }
}
