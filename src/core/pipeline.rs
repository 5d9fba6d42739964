use crate::core::{ConfigProvider, Pipeline, ResponseEnvelope, Storage, TransformResult};
use crate::utils::error::Result;
use reqwest::Client;

pub struct PlacePipeline<S: Storage, C: ConfigProvider> {
    storage: S,
    config: C,
    client: Client,
}

impl<S: Storage, C: ConfigProvider> PlacePipeline<S, C> {
    pub fn new(storage: S, config: C) -> Self {
        Self {
            storage,
            config,
            client: Client::new(),
        }
    }

    /// Ids and keys are expected to be URL-safe and are substituted as-is.
    pub fn details_url(&self, place_id: &str) -> String {
        format!(
            "{}?placeid={}&key={}",
            self.config.api_endpoint(),
            place_id,
            self.config.api_key()
        )
    }
}

#[async_trait::async_trait]
impl<S: Storage, C: ConfigProvider> Pipeline for PlacePipeline<S, C> {
    async fn prepare(&self) -> Result<()> {
        tracing::debug!("Resetting output file: {}", self.config.output_path());
        self.storage.remove_file(self.config.output_path()).await
    }

    async fn extract(&self, place_id: &str) -> Result<Vec<u8>> {
        tracing::debug!(
            "Making API request to: {}?placeid={}",
            self.config.api_endpoint(),
            place_id
        );
        // the URL carries the API key, keep it out of error messages
        let response = self
            .client
            .get(self.details_url(place_id))
            .send()
            .await
            .map_err(reqwest::Error::without_url)?;

        // status is not checked, error bodies go to the decoder like any other
        tracing::debug!("API response status: {}", response.status());

        let body = response
            .bytes()
            .await
            .map_err(reqwest::Error::without_url)?;
        tracing::debug!("Read {} bytes for {}", body.len(), place_id);

        Ok(body.to_vec())
    }

    async fn transform(&self, body: Vec<u8>) -> Result<TransformResult> {
        let envelope: ResponseEnvelope = serde_json::from_slice(&body)?;

        if let Some(status) = envelope.upstream_failure() {
            tracing::warn!(
                "⚠️ Places API returned status {} ({}); writing an empty record",
                status,
                envelope.error_message.as_deref().unwrap_or("no error message")
            );
        }

        let payload = serde_json::to_vec(&envelope.result)?;

        Ok(TransformResult {
            detail: envelope.result,
            payload,
        })
    }

    async fn load(&self, result: TransformResult) -> Result<String> {
        tracing::debug!(
            "Appending {} bytes for {:?} to {}",
            result.payload.len(),
            result.detail.place_id,
            self.config.output_path()
        );
        self.storage
            .append_file(self.config.output_path(), &result.payload)
            .await?;

        Ok(self.config.output_path().to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::error::DumpError;
    use httpmock::prelude::*;
    use std::collections::HashMap;
    use std::sync::Arc;
    use tokio::sync::Mutex;

    #[derive(Clone)]
    struct MockStorage {
        files: Arc<Mutex<HashMap<String, Vec<u8>>>>,
    }

    impl MockStorage {
        fn new() -> Self {
            Self {
                files: Arc::new(Mutex::new(HashMap::new())),
            }
        }

        async fn get_file(&self, path: &str) -> Option<Vec<u8>> {
            let files = self.files.lock().await;
            files.get(path).cloned()
        }
    }

    impl Storage for MockStorage {
        async fn remove_file(&self, path: &str) -> Result<()> {
            let mut files = self.files.lock().await;
            files.remove(path);
            Ok(())
        }

        async fn append_file(&self, path: &str, data: &[u8]) -> Result<()> {
            let mut files = self.files.lock().await;
            files.entry(path.to_string()).or_default().extend_from_slice(data);
            Ok(())
        }
    }

    struct MockConfig {
        api_key: String,
        api_endpoint: String,
        output_path: String,
    }

    impl MockConfig {
        fn new(api_endpoint: String) -> Self {
            Self {
                api_key: "test-key".to_string(),
                api_endpoint,
                output_path: "output.json".to_string(),
            }
        }
    }

    impl ConfigProvider for MockConfig {
        fn api_key(&self) -> &str {
            &self.api_key
        }

        fn api_endpoint(&self) -> &str {
            &self.api_endpoint
        }

        fn output_path(&self) -> &str {
            &self.output_path
        }
    }

    #[test]
    fn test_details_url_uses_plain_substitution() {
        let pipeline = PlacePipeline::new(
            MockStorage::new(),
            MockConfig::new("https://maps.example.com/details/json".to_string()),
        );

        assert_eq!(
            pipeline.details_url("ChIJN1t_tDeuEmsRUsoyG83frY4"),
            "https://maps.example.com/details/json?placeid=ChIJN1t_tDeuEmsRUsoyG83frY4&key=test-key"
        );
    }

    #[tokio::test]
    async fn test_extract_sends_place_id_and_key() {
        let server = MockServer::start();
        let api_mock = server.mock(|when, then| {
            when.method(GET)
                .path("/details/json")
                .query_param("placeid", "abc123")
                .query_param("key", "test-key");
            then.status(200)
                .header("Content-Type", "application/json")
                .body(r#"{"result":{"place_id":"abc123"}}"#);
        });

        let pipeline = PlacePipeline::new(
            MockStorage::new(),
            MockConfig::new(server.url("/details/json")),
        );

        let body = pipeline.extract("abc123").await.unwrap();

        api_mock.assert();
        assert_eq!(body, br#"{"result":{"place_id":"abc123"}}"#.to_vec());
    }

    #[tokio::test]
    async fn test_extract_returns_body_for_error_status() {
        let server = MockServer::start();
        let api_mock = server.mock(|when, then| {
            when.method(GET).path("/details/json");
            then.status(500).body(r#"{"status":"UNKNOWN_ERROR"}"#);
        });

        let pipeline = PlacePipeline::new(
            MockStorage::new(),
            MockConfig::new(server.url("/details/json")),
        );

        let body = pipeline.extract("abc123").await.unwrap();

        api_mock.assert();
        assert_eq!(body, br#"{"status":"UNKNOWN_ERROR"}"#.to_vec());
    }

    #[tokio::test]
    async fn test_extract_connection_failure() {
        // nothing listens on port 1
        let pipeline = PlacePipeline::new(
            MockStorage::new(),
            MockConfig::new("http://127.0.0.1:1/details/json".to_string()),
        );

        let result = pipeline.extract("abc123").await;
        assert!(matches!(result, Err(DumpError::ApiError(_))));

        let err = result.unwrap_err();
        assert!(!err.to_string().contains("test-key"));
        assert!(!err.user_friendly_message().contains("test-key"));
    }

    #[tokio::test]
    async fn test_transform_reencodes_result() {
        let pipeline = PlacePipeline::new(
            MockStorage::new(),
            MockConfig::new("http://localhost/details/json".to_string()),
        );
        let body = br#"{"html_attributions":[],"result":{"formatted_address":"1 Main St","geometry":{"location":{"lat":1.5,"lng":2.5}},"rating":4.5,"place_id":"abc123","address_components":[],"photos":[]},"status":"OK"}"#;

        let result = pipeline.transform(body.to_vec()).await.unwrap();

        assert_eq!(result.detail.place_id, "abc123");
        assert_eq!(
            String::from_utf8(result.payload).unwrap(),
            r#"{"address_components":[],"formatted_address":"1 Main St","geometry":{"location":{"lat":1.5,"lng":2.5}},"photos":[],"place_id":"abc123","rating":4.5}"#
        );
    }

    #[tokio::test]
    async fn test_transform_upstream_error_yields_empty_record() {
        let pipeline = PlacePipeline::new(
            MockStorage::new(),
            MockConfig::new("http://localhost/details/json".to_string()),
        );

        let result = pipeline
            .transform(br#"{"status":"NOT_FOUND"}"#.to_vec())
            .await
            .unwrap();

        assert_eq!(result.detail, crate::core::PlaceDetail::default());
        assert!(!result.payload.is_empty());
    }

    #[tokio::test]
    async fn test_transform_malformed_json() {
        let pipeline = PlacePipeline::new(
            MockStorage::new(),
            MockConfig::new("http://localhost/details/json".to_string()),
        );

        let result = pipeline.transform(b"<html>502 Bad Gateway</html>".to_vec()).await;
        assert!(matches!(result, Err(DumpError::SerializationError(_))));
    }

    #[tokio::test]
    async fn test_prepare_then_load_appends_records() {
        let storage = MockStorage::new();
        storage
            .append_file("output.json", b"stale from last run")
            .await
            .unwrap();

        let pipeline = PlacePipeline::new(
            storage.clone(),
            MockConfig::new("http://localhost/details/json".to_string()),
        );
        pipeline.prepare().await.unwrap();
        assert!(storage.get_file("output.json").await.is_none());

        for id in ["a", "b"] {
            let body = format!(r#"{{"result":{{"place_id":"{}"}}}}"#, id);
            let result = pipeline.transform(body.into_bytes()).await.unwrap();
            let path = pipeline.load(result).await.unwrap();
            assert_eq!(path, "output.json");
        }

        let content = String::from_utf8(storage.get_file("output.json").await.unwrap()).unwrap();
        assert!(content.starts_with(r#"{"address_components":[]"#));
        assert!(content.contains(r#""place_id":"a","rating":0.0}{"address_components""#));
        assert!(content.ends_with(r#""place_id":"b","rating":0.0}"#));
    }
}
