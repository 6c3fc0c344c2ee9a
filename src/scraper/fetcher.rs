use crate::config::AppConfig;
use crate::model::{Identifier, ScraperError};
use crate::scraper::traits::{CatalogSource, ControlPanelSource};

use reqwest::header::CONTENT_TYPE;
use reqwest::{Client, RequestBuilder};
use serde_json::Value;
use std::io::{Cursor, Read};
use tracing::{info, warn};

pub struct QcyClient {
    client: Client,
    config: AppConfig,
}

impl QcyClient {
    pub fn new(config: AppConfig) -> Result<Self, ScraperError> {
        let client = Client::builder().build()?;

        Ok(Self { client, config })
    }

    fn with_app_headers(&self, request: RequestBuilder) -> RequestBuilder {
        request
            .header("lang", &self.config.lang)
            .header("country", &self.config.country)
            .header("sys_", &self.config.sys)
            .header("app_version", &self.config.app_version)
    }

    async fn fetch_archive(&self, url: &str) -> Result<Option<Value>, ScraperError> {
        info!("GET {}", url);
        let response = self
            .client
            .get(url)
            .timeout(self.config.archive_timeout())
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(ScraperError::BadStatus(response.status().as_u16()));
        }

        let bytes = response.bytes().await?;
        read_json_from_archive(&bytes)
    }
}

#[async_trait::async_trait]
impl CatalogSource for QcyClient {
    async fn fetch_catalog(&self) -> Result<Value, ScraperError> {
        let url = self.config.endpoint("product/findProductList");
        info!("POST {}", url);

        let response = self
            .with_app_headers(self.client.post(&url))
            .header(CONTENT_TYPE, "application/json; charset=utf-8")
            .body("")
            .timeout(self.config.catalog_timeout())
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(ScraperError::BadStatus(response.status().as_u16()));
        }

        let meta: Value = serde_json::from_slice(&response.bytes().await?)?;

        let Some(archive) = archive_url(&meta).map(str::to_string) else {
            warn!("No product archive URL in server response, using raw response");
            return Ok(meta);
        };

        match self.fetch_archive(&archive).await? {
            Some(catalog) => Ok(catalog),
            None => {
                warn!("No JSON found in product archive, using raw response");
                Ok(meta)
            }
        }
    }
}

#[async_trait::async_trait]
impl ControlPanelSource for QcyClient {
    async fn fetch_control_panel(
        &self,
        vendor_id: &Identifier,
        firmware_version: Option<&str>,
    ) -> Result<Value, ScraperError> {
        let url = self.config.endpoint("product/findControlPanels");
        info!("POST {} vendorId={}", url, vendor_id);

        let form = [
            ("modelId", vendor_id.to_string()),
            ("firmwareVersion", firmware_version.unwrap_or_default().to_string()),
        ];
        let response = self
            .with_app_headers(self.client.post(&url))
            .form(&form)
            .timeout(self.config.panel_timeout())
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(ScraperError::BadStatus(response.status().as_u16()));
        }

        let body: Value = serde_json::from_slice(&response.bytes().await?)?;
        control_panel_from_response(body)
    }
}

/// Location of the catalog archive: `data.product`, or `data` when it is a plain string.
pub fn archive_url(meta: &Value) -> Option<&str> {
    let url = match meta.get("data")? {
        Value::Object(data) => data.get("product")?.as_str()?,
        Value::String(url) => url.as_str(),
        _ => return None,
    };
    (!url.is_empty()).then_some(url)
}

/// Parses the first `.json` entry of a ZIP archive. `Ok(None)` when there is none.
pub fn read_json_from_archive(bytes: &[u8]) -> Result<Option<Value>, ScraperError> {
    let mut archive = zip::ZipArchive::new(Cursor::new(bytes))?;

    for index in 0..archive.len() {
        let mut file = archive.by_index(index)?;
        if !file.name().ends_with(".json") {
            continue;
        }
        info!("Extracted {} ({} bytes)", file.name(), file.size());
        let mut content = Vec::new();
        file.read_to_end(&mut content)?;
        return Ok(Some(serde_json::from_slice(&content)?));
    }

    Ok(None)
}

/// Unwraps `data.controlPanel` from a `findControlPanels` response.
pub fn control_panel_from_response(body: Value) -> Result<Value, ScraperError> {
    let code = body.get("code").and_then(Value::as_i64);
    if code != Some(200) {
        return Err(ScraperError::ApiCode(code));
    }

    match body.get("data").and_then(|data| data.get("controlPanel")) {
        Some(panel @ Value::Object(_)) => Ok(panel.clone()),
        _ => Err(ScraperError::InvalidResponse("missing data.controlPanel".into())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::io::Write;
    use wiremock::matchers::{body_string_contains, header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};
    use zip::write::SimpleFileOptions;

    fn client_for(server: &MockServer) -> QcyClient {
        QcyClient::new(AppConfig {
            base_url: server.uri(),
            ..AppConfig::default()
        })
        .unwrap()
    }

    async fn mount_catalog(server: &MockServer, response: ResponseTemplate) {
        Mock::given(method("POST"))
            .and(path("/product/findProductList"))
            .and(header("app_version", "4.0.7_695"))
            .respond_with(response)
            .expect(1)
            .mount(server)
            .await;
    }

    async fn mount_archive(server: &MockServer, bytes: Vec<u8>) {
        Mock::given(method("GET"))
            .and(path("/files/products.zip"))
            .respond_with(ResponseTemplate::new(200).set_body_bytes(bytes))
            .expect(1)
            .mount(server)
            .await;
    }

    fn zip_with(entries: &[(&str, &str)]) -> Vec<u8> {
        let mut writer = zip::ZipWriter::new(Cursor::new(Vec::new()));
        for (name, content) in entries {
            writer.start_file(*name, SimpleFileOptions::default()).unwrap();
            writer.write_all(content.as_bytes()).unwrap();
        }
        writer.finish().unwrap().into_inner()
    }

    #[test]
    fn archive_url_from_record_or_string() {
        assert_eq!(
            archive_url(&json!({"data": {"product": "https://x/p.zip"}})),
            Some("https://x/p.zip")
        );
        assert_eq!(archive_url(&json!({"data": "https://x/q.zip"})), Some("https://x/q.zip"));
        assert_eq!(archive_url(&json!({"data": {"earphones": []}})), None);
        assert_eq!(archive_url(&json!({"data": ""})), None);
        assert_eq!(archive_url(&json!([1, 2])), None);
    }

    #[test]
    fn reads_first_json_entry() {
        let bytes = zip_with(&[
            ("readme.txt", "hello"),
            ("products.json", r#"{"data": {"earphones": []}}"#),
            ("other.json", r#"{"ignored": true}"#),
        ]);
        let catalog = read_json_from_archive(&bytes).unwrap();
        assert_eq!(catalog, Some(json!({"data": {"earphones": []}})));
    }

    #[test]
    fn archive_without_json_gives_none() {
        let bytes = zip_with(&[("readme.txt", "hello")]);
        assert_eq!(read_json_from_archive(&bytes).unwrap(), None);
    }

    #[test]
    fn garbage_archive_is_an_error() {
        assert!(matches!(
            read_json_from_archive(b"not a zip"),
            Err(ScraperError::Archive(_))
        ));
    }

    #[test]
    fn control_panel_requires_code_200() {
        let ok = json!({"code": 200, "data": {"controlPanel": {"layouts": [{"type": 3}]}}});
        assert_eq!(
            control_panel_from_response(ok).unwrap(),
            json!({"layouts": [{"type": 3}]})
        );

        let rejected = json!({"code": 500, "data": {"controlPanel": {}}});
        assert!(matches!(
            control_panel_from_response(rejected),
            Err(ScraperError::ApiCode(Some(500)))
        ));

        let malformed = json!({"code": 200, "data": {"controlPanel": []}});
        assert!(matches!(
            control_panel_from_response(malformed),
            Err(ScraperError::InvalidResponse(_))
        ));
    }

    #[tokio::test]
    async fn catalog_without_pointer_is_the_response() {
        let server = MockServer::start().await;
        let meta = json!({"code": 200, "data": {"earphones": [{"vendorID": 1}]}});
        mount_catalog(&server, ResponseTemplate::new(200).set_body_json(meta.clone())).await;

        let catalog = client_for(&server).fetch_catalog().await.unwrap();
        assert_eq!(catalog, meta);
    }

    #[tokio::test]
    async fn catalog_pointer_is_followed_into_archive() {
        let server = MockServer::start().await;
        let meta = json!({"code": 200, "data": {"product": format!("{}/files/products.zip", server.uri())}});
        mount_catalog(&server, ResponseTemplate::new(200).set_body_json(meta)).await;
        mount_archive(&server, zip_with(&[("all.json", r#"{"data": {"speaker": []}}"#)])).await;

        let catalog = client_for(&server).fetch_catalog().await.unwrap();
        assert_eq!(catalog, json!({"data": {"speaker": []}}));
    }

    #[tokio::test]
    async fn archive_without_json_falls_back_to_pointer_document() {
        let server = MockServer::start().await;
        let meta = json!({"code": 200, "data": format!("{}/files/products.zip", server.uri())});
        mount_catalog(&server, ResponseTemplate::new(200).set_body_json(meta.clone())).await;
        mount_archive(&server, zip_with(&[("notes.txt", "nothing here")])).await;

        let catalog = client_for(&server).fetch_catalog().await.unwrap();
        assert_eq!(catalog, meta);
    }

    #[tokio::test]
    async fn catalog_server_error_is_bad_status() {
        let server = MockServer::start().await;
        mount_catalog(&server, ResponseTemplate::new(500)).await;

        assert!(matches!(
            client_for(&server).fetch_catalog().await,
            Err(ScraperError::BadStatus(500))
        ));
    }

    #[tokio::test]
    async fn catalog_with_unparsable_body_is_an_error() {
        let server = MockServer::start().await;
        mount_catalog(&server, ResponseTemplate::new(200).set_body_string("<html>")).await;

        assert!(matches!(
            client_for(&server).fetch_catalog().await,
            Err(ScraperError::Json(_))
        ));
    }

    #[tokio::test]
    async fn control_panel_request_sends_form_and_app_headers() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/product/findControlPanels"))
            .and(header("lang", "en"))
            .and(header("country", "US"))
            .and(header("sys_", "android"))
            .and(body_string_contains("modelId=100"))
            .and(body_string_contains("firmwareVersion=1.0.2"))
            .respond_with(ResponseTemplate::new(200).set_body_json(
                json!({"code": 200, "data": {"controlPanel": {"layouts": [{"type": 8}]}}}),
            ))
            .expect(1)
            .mount(&server)
            .await;

        let panel = client_for(&server)
            .fetch_control_panel(&Identifier::Number(100), Some("1.0.2"))
            .await
            .unwrap();
        assert_eq!(panel, json!({"layouts": [{"type": 8}]}));
    }

    #[tokio::test]
    async fn control_panel_without_firmware_sends_empty_field() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/product/findControlPanels"))
            .and(body_string_contains("firmwareVersion="))
            .respond_with(ResponseTemplate::new(200).set_body_json(
                json!({"code": 200, "data": {"controlPanel": {}}}),
            ))
            .expect(1)
            .mount(&server)
            .await;

        let panel = client_for(&server)
            .fetch_control_panel(&Identifier::Text("7".into()), None)
            .await
            .unwrap();
        assert_eq!(panel, json!({}));
    }

    #[tokio::test]
    async fn control_panel_server_error_is_bad_status() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/product/findControlPanels"))
            .respond_with(ResponseTemplate::new(503))
            .mount(&server)
            .await;

        assert!(matches!(
            client_for(&server).fetch_control_panel(&Identifier::Number(1), None).await,
            Err(ScraperError::BadStatus(503))
        ));
    }
}
