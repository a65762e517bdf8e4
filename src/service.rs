use std::io::Read;

use async_trait::async_trait;
use flate2::read::GzDecoder;
use log::{debug, info};
use reqwest::header::{ACCEPT, CONTENT_TYPE};
use reqwest::{Client, Response};

use crate::command::Query;
use crate::config::Config;
use crate::error::Error;
use crate::model::{Credentials, PendingToken, ReportResult, Service};
use crate::request::encode_request;

const ACCEPT_HEADER: &str = "text/html,image/gif,image/jpeg; q=.2, */*; q=.2";
const FORM_CONTENT_TYPE: &str = "application/x-www-form-urlencoded";
const GZIP_CONTENT_TYPE: &str = "application/a-gzip";
const DEFAULT_FILENAME: &str = "report.txt.gz";

#[async_trait]
pub trait ReportLoader {
    /// Sends `query` and returns what the server answered. Gzip reports are unpacked when
    /// `unzip` is set.
    async fn get_report(
        &self,
        credentials: &Credentials,
        query: &Query,
        unzip: bool,
    ) -> Result<ReportResult, Error>;

    async fn begin_token_generation(&self, credentials: &Credentials) -> Result<PendingToken, Error>;

    /// Mirrors the request id of `pending` back to the server and returns its answer.
    async fn confirm_token_generation(
        &self,
        credentials: &Credentials,
        pending: &PendingToken,
        unzip: bool,
    ) -> Result<ReportResult, Error>;
}

pub struct ReportService {
    pub client: Client,
    pub config: Config,
}

#[async_trait]
impl ReportLoader for ReportService {
    async fn get_report(
        &self,
        credentials: &Credentials,
        query: &Query,
        unzip: bool,
    ) -> Result<ReportResult, Error> {
        let response = self
            .post(query.service(), credentials, &query.command(), None)
            .await?;
        report_result(response, unzip).await
    }

    async fn begin_token_generation(&self, credentials: &Credentials) -> Result<PendingToken, Error> {
        let query = Query::GenerateToken;
        let response = self
            .post(query.service(), credentials, &query.command(), None)
            .await?;

        let request_id = header(&response, "service_request_id")
            .ok_or(Error::MissingHeader("service_request_id"))?;
        debug!("Token generation pending with request id {request_id}");

        Ok(PendingToken { request_id })
    }

    async fn confirm_token_generation(
        &self,
        credentials: &Credentials,
        pending: &PendingToken,
        unzip: bool,
    ) -> Result<ReportResult, Error> {
        let query = Query::GenerateToken;
        let confirmation = format!("&isExistingToken=Y&requestId={id}", id = pending.request_id);
        let response = self
            .post(query.service(), credentials, &query.command(), Some(&confirmation))
            .await?;
        report_result(response, unzip).await
    }
}

impl ReportService {
    pub fn new(config: Config) -> ReportService {
        ReportService { client: Client::new(), config }
    }

    async fn post(
        &self,
        service: Service,
        credentials: &Credentials,
        command: &str,
        url_params: Option<&str>,
    ) -> Result<Response, Error> {
        let endpoint = self.config.endpoint(service);
        let mut body = encode_request(credentials, &self.config.version, command);
        if let Some(url_params) = url_params {
            body.push_str(url_params);
        }

        debug!("POST `{command}` to {endpoint}");
        let response = self
            .client
            .post(endpoint)
            .header(ACCEPT, ACCEPT_HEADER)
            .header(CONTENT_TYPE, FORM_CONTENT_TYPE)
            .body(body)
            .send()
            .await?;

        let status = response.status();
        debug!("`{command}` answered with {status}");
        if status.is_success() {
            return Ok(response);
        }

        match status.as_u16() {
            // the body carries a readable error message for these
            400 | 401 | 403 | 404 => Err(Error::ApiRejected(response.text().await?)),
            code => Err(Error::ApiRejected(format!(
                "HTTP Error {code}. Did you choose reasonable query arguments?"
            ))),
        }
    }
}

async fn report_result(response: Response, unzip: bool) -> Result<ReportResult, Error> {
    let is_compressed = header(&response, CONTENT_TYPE.as_str()).is_some_and(|content_type| {
        let mime = content_type.split(';').next().unwrap_or_default();
        mime.trim().eq_ignore_ascii_case(GZIP_CONTENT_TYPE)
    });

    if !is_compressed {
        let content = response.bytes().await?.to_vec();
        return Ok(ReportResult { content, is_compressed, filename: None, message: None });
    }

    let filename = header(&response, "filename")
        .filter(|filename| !filename.is_empty())
        .unwrap_or_else(|| DEFAULT_FILENAME.to_string());
    let message = header(&response, "downloadmsg");
    let bytes = response.bytes().await?;

    if !unzip {
        info!("Received compressed report {filename}");
        return Ok(ReportResult {
            content: bytes.to_vec(),
            is_compressed,
            filename: Some(filename),
            message,
        });
    }

    let mut content = Vec::new();
    GzDecoder::new(bytes.as_ref()).read_to_end(&mut content)?;
    let filename = filename
        .strip_suffix(".gz")
        .map(str::to_string)
        .unwrap_or(filename);
    info!("Unpacked report {filename} ({size} bytes)", size = content.len());

    Ok(ReportResult {
        content,
        is_compressed,
        filename: Some(filename),
        message: message.map(|message| message.replace(".txt.gz", ".txt")),
    })
}

fn header(response: &Response, name: &str) -> Option<String> {
    response
        .headers()
        .get(name)
        .and_then(|value| value.to_str().ok())
        .map(str::to_string)
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use flate2::write::GzEncoder;
    use flate2::Compression;
    use mockito::{mock, server_url, Matcher};

    use crate::command::Query;
    use crate::config::Config;
    use crate::error::Error;
    use crate::model::{Credentials, Mode, PendingToken, Secret, Service};
    use crate::service::{ReportLoader, ReportService};

    fn report_service() -> ReportService {
        ReportService::new(Config {
            sales_endpoint: format!("{url}/sales", url = server_url()),
            finance_endpoint: format!("{url}/finance", url = server_url()),
            version: "2.2".to_string(),
        })
    }

    fn credentials() -> Credentials {
        Credentials {
            user_id: "jane@example.com".to_string(),
            secret: Secret::AccessToken("token".to_string()),
            account: Some(123456),
            mode: Mode::Normal,
        }
    }

    fn gzip(content: &str) -> Vec<u8> {
        let mut encoder = GzEncoder::new(Vec::new(), Compression::default());
        encoder.write_all(content.as_bytes()).unwrap();
        encoder.finish().unwrap()
    }

    #[tokio::test]
    async fn given_text_response_when_get_report_then_give_plain_content() {
        // Given
        let _m = mock("POST", "/sales")
            .match_header("accept", "text/html,image/gif,image/jpeg; q=.2, */*; q=.2")
            .match_header("content-type", "application/x-www-form-urlencoded")
            .match_body(Matcher::Regex("^jsonRequest=\\{\"userid\":\"jane%40example.com\"".to_string()))
            .with_status(200)
            .with_header("content-type", "text/plain")
            .with_body("Sales and Trends is available.")
            .create();

        // When
        let result = report_service()
            .get_report(&credentials(), &Query::Status(Service::Sales), true)
            .await
            .unwrap();

        // Then
        assert_eq!(result.content, b"Sales and Trends is available.".to_vec());
        assert!(!result.is_compressed);
        assert_eq!(result.filename, None);
        assert_eq!(result.message, None);
    }

    #[tokio::test]
    async fn given_finance_query_when_get_report_then_post_to_finance_endpoint() {
        // Given
        let _m = mock("POST", "/finance")
            .match_body(Matcher::Regex("Finance.getVendorsAndRegions".to_string()))
            .with_status(200)
            .with_body("80012345: US, EU")
            .create();

        // When
        let result = report_service()
            .get_report(&credentials(), &Query::VendorsAndRegions, true)
            .await
            .unwrap();

        // Then
        assert_eq!(String::from_utf8(result.content).unwrap(), "80012345: US, EU");
    }

    #[tokio::test]
    async fn given_404_when_get_report_then_api_rejected_with_body() {
        // Given
        let _m = mock("POST", "/sales")
            .with_status(404)
            .with_body("Invalid vendor number")
            .create();

        // When
        let error = report_service()
            .get_report(&credentials(), &Query::Vendors, true)
            .await
            .unwrap_err();

        // Then
        assert!(matches!(&error, Error::ApiRejected(message) if message == "Invalid vendor number"));
        assert_eq!(error.to_string(), "Invalid vendor number");
    }

    #[tokio::test]
    async fn given_500_when_get_report_then_api_rejected_with_status_code() {
        // Given
        let _m = mock("POST", "/sales")
            .with_status(500)
            .with_body("internal error")
            .create();

        // When
        let error = report_service()
            .get_report(&credentials(), &Query::Vendors, true)
            .await
            .unwrap_err();

        // Then
        assert_eq!(
            error.to_string(),
            "HTTP Error 500. Did you choose reasonable query arguments?"
        );
    }

    #[tokio::test]
    async fn given_gzip_report_when_unzip_then_strip_gz_suffixes() {
        // Given
        let _m = mock("POST", "/sales")
            .with_status(200)
            .with_header("content-type", "application/a-gzip")
            .with_header("filename", "S_D_85012345_20230101.txt.gz")
            .with_header("downloadmsg", "Successfully downloaded S_D_85012345_20230101.txt.gz")
            .with_body(gzip("Provider\tUnits\nAPPLE\t3\n"))
            .create();

        // When
        let result = report_service()
            .get_report(&credentials(), &Query::Vendors, true)
            .await
            .unwrap();

        // Then
        assert!(result.is_compressed);
        assert_eq!(result.content, b"Provider\tUnits\nAPPLE\t3\n".to_vec());
        assert_eq!(result.filename.as_deref(), Some("S_D_85012345_20230101.txt"));
        assert_eq!(
            result.message.as_deref(),
            Some("Successfully downloaded S_D_85012345_20230101.txt")
        );
    }

    #[tokio::test]
    async fn given_gzip_report_when_not_unzip_then_keep_archive() {
        // Given
        let archive = gzip("contact list");
        let _m = mock("POST", "/sales")
            .with_status(200)
            .with_header("content-type", "application/a-gzip")
            .with_header("filename", "O_W_85012345_20230108.txt.gz")
            .with_header("downloadmsg", "Successfully downloaded O_W_85012345_20230108.txt.gz")
            .with_body(archive.clone())
            .create();

        // When
        let result = report_service()
            .get_report(&credentials(), &Query::Vendors, false)
            .await
            .unwrap();

        // Then
        assert!(result.is_compressed);
        assert_eq!(result.content, archive);
        assert_eq!(result.filename.as_deref(), Some("O_W_85012345_20230108.txt.gz"));
        assert_eq!(
            result.message.as_deref(),
            Some("Successfully downloaded O_W_85012345_20230108.txt.gz")
        );
    }

    #[tokio::test]
    async fn given_gzip_report_without_filename_when_unzip_then_use_default_name() {
        // Given
        let _m = mock("POST", "/sales")
            .with_status(200)
            .with_header("content-type", "application/a-gzip")
            .with_body(gzip("report"))
            .create();

        // When
        let result = report_service()
            .get_report(&credentials(), &Query::Vendors, true)
            .await
            .unwrap();

        // Then
        assert_eq!(result.filename.as_deref(), Some("report.txt"));
        assert_eq!(result.message, None);
    }

    #[tokio::test]
    async fn given_service_request_id_when_begin_token_generation_then_give_pending_token() {
        // Given
        let _m = mock("POST", "/sales")
            .match_body(Matcher::Regex("Sales.generateToken".to_string()))
            .with_status(200)
            .with_header("service_request_id", "req-42")
            .with_body("If you generate a new access token, your existing token will be deleted.")
            .create();

        // When
        let pending = report_service()
            .begin_token_generation(&credentials())
            .await
            .unwrap();

        // Then
        assert_eq!(pending, PendingToken { request_id: "req-42".to_string() });
    }

    #[tokio::test]
    async fn given_no_service_request_id_when_begin_token_generation_then_missing_header() {
        // Given
        let _m = mock("POST", "/sales").with_status(200).with_body("").create();

        // When
        let error = report_service()
            .begin_token_generation(&credentials())
            .await
            .unwrap_err();

        // Then
        assert!(matches!(error, Error::MissingHeader("service_request_id")));
    }

    #[tokio::test]
    async fn given_pending_token_when_confirm_then_mirror_request_id() {
        // Given
        let _first = mock("POST", "/sales")
            .match_body(Matcher::Regex("\\}$".to_string()))
            .with_status(200)
            .with_header("service_request_id", "req-42")
            .create();
        let _second = mock("POST", "/sales")
            .match_body(Matcher::Regex("\\}&isExistingToken=Y&requestId=req-42$".to_string()))
            .with_status(200)
            .with_body("AccessToken:1a2b3c\nExpiration Date:2024-07-01")
            .create();
        let service = report_service();

        // When
        let pending = service.begin_token_generation(&credentials()).await.unwrap();
        let result = service
            .confirm_token_generation(&credentials(), &pending, true)
            .await
            .unwrap();

        // Then
        assert_eq!(
            String::from_utf8(result.content).unwrap(),
            "AccessToken:1a2b3c\nExpiration Date:2024-07-01"
        );
    }

    #[tokio::test]
    async fn given_gzip_answer_when_confirm_without_unzip_then_keep_archive() {
        // Given
        let archive = gzip("AccessToken:1a2b3c");
        let _m = mock("POST", "/sales")
            .match_body(Matcher::Regex("requestId=req-7$".to_string()))
            .with_status(200)
            .with_header("content-type", "application/a-gzip")
            .with_header("filename", "token.txt.gz")
            .with_body(archive.clone())
            .create();
        let pending = PendingToken { request_id: "req-7".to_string() };

        // When
        let result = report_service()
            .confirm_token_generation(&credentials(), &pending, false)
            .await
            .unwrap();

        // Then
        assert_eq!(result.content, archive);
        assert_eq!(result.filename.as_deref(), Some("token.txt.gz"));
    }
}
