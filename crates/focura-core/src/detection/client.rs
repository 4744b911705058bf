use reqwest::multipart::{Form, Part};
use serde::de::DeserializeOwned;
use tracing::{debug, error};
use url::Url;

use super::{PhoneReading, PostureReading};
use crate::error::DetectionError;

/// HTTP client for the detection API.
#[derive(Debug, Clone)]
pub struct DetectionClient {
    http: reqwest::Client,
    base_url: Url,
}

impl DetectionClient {
    /// # Errors
    /// Returns [`DetectionError::InvalidUrl`] if `base_url` does not parse.
    pub fn new(base_url: &str) -> Result<Self, DetectionError> {
        let mut base_url = Url::parse(base_url)?;
        // Url::join replaces the last segment unless the path ends with '/'.
        if !base_url.path().ends_with('/') {
            let path = format!("{}/", base_url.path());
            base_url.set_path(&path);
        }
        Ok(Self {
            http: reqwest::Client::new(),
            base_url,
        })
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// # Errors
    /// Fails on transport errors, non-2xx responses and malformed bodies.
    pub async fn detect_posture(&self, image: Vec<u8>) -> Result<PostureReading, DetectionError> {
        self.post_image("api/posture", "Posture", image).await
    }

    /// # Errors
    /// Fails on transport errors, non-2xx responses and malformed bodies.
    pub async fn detect_phone(&self, image: Vec<u8>) -> Result<PhoneReading, DetectionError> {
        self.post_image("api/phone-detection", "Phone", image).await
    }

    async fn post_image<T: DeserializeOwned>(
        &self,
        path: &str,
        endpoint: &str,
        image: Vec<u8>,
    ) -> Result<T, DetectionError> {
        let url = self.base_url.join(path)?;
        let part = Part::bytes(image)
            .file_name("frame.jpg")
            .mime_str("image/jpeg")?;
        let form = Form::new().part("image", part);

        debug!(%url, "posting frame");
        let response = self.http.post(url).multipart(form).send().await?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            error!(endpoint, status = status.as_u16(), "detection request failed");
            return Err(DetectionError::Status {
                endpoint: endpoint.to_string(),
                status: status.as_u16(),
                body,
            });
        }

        Ok(response.json().await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn base_url_gets_trailing_slash() {
        let client = DetectionClient::new("http://localhost:3000/focura").unwrap();
        assert_eq!(
            client.base_url().join("api/posture").unwrap().as_str(),
            "http://localhost:3000/focura/api/posture"
        );
    }

    #[test]
    fn rejects_garbage_url() {
        assert!(matches!(
            DetectionClient::new("not a url"),
            Err(DetectionError::InvalidUrl(_))
        ));
    }
}
