// src/session.rs

use crate::config::Config;
use crate::error::InvoiceError;
use crate::invoice::{DraftField, HeaderField, Invoice, InvoiceModel, LineItem};
use crate::labels::Language;
use crate::router::{Submission, SubmissionRouter};
use std::fmt::Write;
use tracing::{info, warn};

/// What the user sees after pressing submit.
#[derive(Debug)]
pub enum SubmissionReport {
    Saved(Submission),
    Failed(String),
}

/// One form: the invoice being edited, its language and the way out to the renderer.
pub struct FormSession {
    model: InvoiceModel,
    language: Language,
    router: SubmissionRouter,
    last_error: Option<String>,
}

impl FormSession {
    pub fn new(config: &Config) -> Self {
        let mut invoice = Invoice::default();
        if let Some(email) = &config.defaults.customer_email {
            invoice.set_field(HeaderField::CustomerEmail, email);
        }
        if let Some(logo) = &config.defaults.logo {
            invoice.set_field(HeaderField::Logo, logo);
        }

        Self {
            model: InvoiceModel::new(invoice),
            language: Language::default(),
            router: SubmissionRouter::new(config.service.clone(), config.output.clone()),
            last_error: None,
        }
    }

    pub fn model(&self) -> &InvoiceModel {
        &self.model
    }

    pub fn language(&self) -> Language {
        self.language
    }

    /// Error banner from the last failed submission, if any.
    pub fn last_error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }

    pub fn set_language(&mut self, language: Language) {
        self.language = language;
        self.model.set_directionality(language.directionality());
        info!(language = ?language, "Language switched");
    }

    pub fn update_field(&mut self, field: HeaderField, value: &str) {
        self.model.update_field(field, value);
    }

    pub fn update_draft_item(&mut self, field: DraftField, raw: &str) -> Result<(), InvoiceError> {
        self.model.update_draft_item(field, raw).inspect_err(|e| {
            if let InvoiceError::Rejected(rejection) = e {
                warn!(field = %rejection.field(), raw, "Draft input rejected");
            }
        })
    }

    pub fn commit_draft_item(&mut self) -> Result<LineItem, InvoiceError> {
        self.model.commit_draft_item().cloned()
    }

    pub fn override_total(&mut self, raw: &str) -> Result<(), InvoiceError> {
        self.model.override_total(raw)
    }

    /// Send the invoice off. Failures become a banner; the invoice is kept either way.
    pub async fn submit(&mut self) -> SubmissionReport {
        let invoice = self.model.invoice();
        match self.router.submit(invoice, invoice.directionality()).await {
            Ok(submission) => {
                info!(
                    endpoint = %submission.endpoint,
                    path = %submission.path.display(),
                    fingerprint = %submission.fingerprint,
                    "Invoice rendered"
                );
                self.last_error = None;
                SubmissionReport::Saved(submission)
            }
            Err(e) => {
                let banner = format!("Error generating PDF: {e}");
                self.last_error = Some(banner.clone());
                SubmissionReport::Failed(banner)
            }
        }
    }

    /// The form as text, in the current language.
    pub fn render(&self) -> String {
        let labels = self.language.labels();
        let invoice = self.model.invoice();
        let draft = self.model.draft();
        let mut out = String::new();

        let _ = writeln!(out, "{}", labels.title);
        if let Some(banner) = &self.last_error {
            let _ = writeln!(out, "!! {banner}");
        }
        for field in HeaderField::ALL {
            let _ = writeln!(
                out,
                "{} {}",
                labels.field(field),
                invoice.field(field).unwrap_or_default()
            );
        }

        let _ = writeln!(out, "{}", labels.items);
        for item in invoice.items() {
            let _ = writeln!(
                out,
                "  {} - {} x ₪{:.2}",
                item.name, item.quantity, item.unit_price
            );
        }
        let _ = writeln!(
            out,
            "  [{}: {}] [{}: {}] [{}: {:.2}]",
            labels.item_name,
            draft.name,
            labels.amount,
            draft.quantity,
            labels.price,
            draft.unit_price
        );

        let _ = writeln!(out, "{} ₪{:.2}", labels.total_amount, invoice.total_amount());
        out
    }
}
