use eyescan_types::{EyescanError, Result};
use reqwest::Url;
use std::time::Duration;

/// Returns the supplied positional input, or an input error naming it.
pub fn require_input<'a>(value: Option<&'a str>, name: &str) -> Result<&'a str> {
    value.ok_or_else(|| EyescanError::Input(format!("no {name} provided")))
}

/// Retrieves image bytes from an HTTP(S) reference.
#[derive(Clone, Debug)]
pub struct ImageFetcher {
    client: reqwest::Client,
    timeout: Duration,
    /// Bodies above this size are refused before decoding.
    max_bytes: u64,
}

impl ImageFetcher {
    pub fn new(timeout: Duration, max_bytes: u64) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| EyescanError::Config(format!("failed to build HTTP client: {e}")))?;
        Ok(Self {
            client,
            timeout,
            max_bytes,
        })
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    pub async fn fetch(&self, reference: &str) -> Result<Vec<u8>> {
        let fetch_error = |message: String| EyescanError::Fetch {
            url: reference.to_string(),
            message,
        };

        let url = Url::parse(reference.trim()).map_err(|e| fetch_error(e.to_string()))?;
        if !matches!(url.scheme(), "http" | "https") {
            return Err(fetch_error(format!("unsupported scheme `{}`", url.scheme())));
        }

        let mut response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| fetch_error(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(fetch_error(format!("request failed with status {status}")));
        }

        let too_large = |len: u64| {
            fetch_error(format!(
                "image body of {len} bytes exceeds the {} byte limit",
                self.max_bytes
            ))
        };
        if let Some(len) = response.content_length().filter(|len| *len > self.max_bytes) {
            return Err(too_large(len));
        }

        // Content-Length can be absent or wrong, so the cap is enforced while reading
        let mut body = Vec::new();
        while let Some(chunk) = response
            .chunk()
            .await
            .map_err(|e| fetch_error(e.to_string()))?
        {
            let len = (body.len() + chunk.len()) as u64;
            if len > self.max_bytes {
                return Err(too_large(len));
            }
            body.extend_from_slice(&chunk);
        }
        tracing::debug!(url = %reference, len = body.len(), "fetched image");
        Ok(body)
    }
}
