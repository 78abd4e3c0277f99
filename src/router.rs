// src/router.rs

use crate::config::{OutputConfig, ServiceConfig};
use crate::download;
use crate::error::SubmissionError;
use crate::invoice::{Directionality, Invoice};
use reqwest::Client;
use reqwest::header::CONTENT_TYPE;
use sha2::{Digest, Sha256};
use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;
use tracing::{Instrument, error, info, info_span, warn};

/// Every rendered document starts with this.
const PDF_SIGNATURE: &[u8] = b"%PDF-";

/// Longest error body kept in a `SubmissionError::Status`.
const MAX_ERROR_BODY_CHARS: usize = 200;

/// Outcome of a successful submission.
#[derive(Debug, Clone)]
pub struct Submission {
    pub endpoint: String,
    pub path: PathBuf,
    pub bytes: usize,
    pub fingerprint: String,
}

/// Full URL of the renderer for a given text direction.
///
/// Depends on nothing but the direction and the service configuration.
pub fn select_endpoint(service: &ServiceConfig, directionality: Directionality) -> String {
    let path = match (&service.single_path, directionality) {
        (Some(single), _) => single,
        (None, Directionality::Rtl) => &service.rtl_path,
        (None, Directionality::Ltr) => &service.ltr_path,
    };
    format!(
        "{}/{}",
        service.base_url.trim_end_matches('/'),
        path.trim_start_matches('/')
    )
}

/// SHA-256 of a request body, hex encoded.
pub fn fingerprint(body: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(body);
    format!("{:x}", hasher.finalize())
}

/// Holds the in-flight flag for as long as a submission runs.
struct InFlightGuard<'a>(&'a AtomicBool);

impl<'a> InFlightGuard<'a> {
    fn acquire(flag: &'a AtomicBool) -> Option<Self> {
        flag.compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .ok()
            .map(|_| InFlightGuard(flag))
    }
}

impl Drop for InFlightGuard<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}

/// Sends invoices to the PDF renderer and saves what comes back.
pub struct SubmissionRouter {
    client: Client,
    service: ServiceConfig,
    output: OutputConfig,
    in_flight: AtomicBool,
}

impl SubmissionRouter {
    pub fn new(service: ServiceConfig, output: OutputConfig) -> Self {
        Self {
            client: Client::new(),
            service,
            output,
            in_flight: AtomicBool::new(false),
        }
    }

    /// Render `invoice` and save it as the configured output file.
    ///
    /// Refused with [`SubmissionError::InFlight`] while another call is running.
    pub async fn submit(
        &self,
        invoice: &Invoice,
        directionality: Directionality,
    ) -> Result<Submission, SubmissionError> {
        let Some(_guard) = InFlightGuard::acquire(&self.in_flight) else {
            warn!("Submit ignored, previous submission still in flight");
            return Err(SubmissionError::InFlight);
        };

        let endpoint = select_endpoint(&self.service, directionality);
        let body = invoice.request_body()?;
        let fingerprint = fingerprint(&body);

        let span = info_span!(
            "submit",
            endpoint = %endpoint,
            direction = ?directionality,
            items = invoice.items().len(),
        );

        async move {
            info!(body_len = body.len(), fingerprint = %fingerprint, "Submitting invoice");

            let pdf = self.request_pdf(&endpoint, body).await?;
            let path = download::save_pdf(&self.output.dir, &self.output.filename, &pdf)?;

            Ok::<_, SubmissionError>(Submission {
                endpoint,
                path,
                bytes: pdf.len(),
                fingerprint,
            })
        }
        .instrument(span)
        .await
        .inspect_err(|e| error!(error = %e, "Error generating PDF"))
    }

    async fn request_pdf(&self, endpoint: &str, body: Vec<u8>) -> Result<Vec<u8>, SubmissionError> {
        let secs = self.service.timeout_secs;
        let transport = |e: reqwest::Error| {
            if e.is_timeout() {
                SubmissionError::Timeout { secs }
            } else {
                SubmissionError::Transport(e)
            }
        };

        let response = self
            .client
            .post(endpoint)
            .header(CONTENT_TYPE, "application/json")
            .body(body)
            .timeout(Duration::from_secs(secs))
            .send()
            .await
            .map_err(transport)?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(SubmissionError::Status {
                status,
                body: body.chars().take(MAX_ERROR_BODY_CHARS).collect(),
            });
        }

        let content_type = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(|v| v.split(';').next().unwrap_or_default().trim().to_ascii_lowercase());
        if let Some(ct) = &content_type {
            if ct != "application/pdf" && ct != "application/octet-stream" {
                return Err(SubmissionError::MalformedResponse(format!(
                    "unexpected content type {ct}"
                )));
            }
        }

        let bytes = response.bytes().await.map_err(transport)?;
        if !bytes.starts_with(PDF_SIGNATURE) {
            return Err(SubmissionError::MalformedResponse(format!(
                "{} byte body is not a PDF",
                bytes.len()
            )));
        }

        info!(status = %status, bytes = bytes.len(), "PDF received");
        Ok(bytes.to_vec())
    }
}
