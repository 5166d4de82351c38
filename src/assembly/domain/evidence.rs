//! Completion evidence.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors returned when completion evidence is insufficient.
#[derive(Debug, Clone, Copy, Error, PartialEq, Eq)]
pub enum EvidenceError {
    /// No photo taken before assembly.
    #[error("photos before assembly are required")]
    MissingPhotosBefore,

    /// No photo taken after assembly.
    #[error("photos after assembly are required")]
    MissingPhotosAfter,

    /// The last stage needs the customer's signature.
    #[error("customer signature is required for the last stage")]
    MissingCustomerSignature,
}

/// Photos and signature submitted when finishing a stage.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CompletionEvidence {
    /// Photo URLs taken before assembly.
    pub photos_before: Vec<String>,
    /// Photo URLs taken after assembly.
    pub photos_after: Vec<String>,
    /// URL of the customer signature image.
    pub customer_signature: Option<String>,
    /// Optional completion note.
    pub note: Option<String>,
}

impl CompletionEvidence {
    /// Creates evidence with one photo before and one after.
    #[must_use]
    pub fn with_photos(before: impl Into<String>, after: impl Into<String>) -> Self {
        Self {
            photos_before: vec![before.into()],
            photos_after: vec![after.into()],
            ..Self::default()
        }
    }

    /// Sets the customer signature.
    #[must_use]
    pub fn signed(mut self, signature_url: impl Into<String>) -> Self {
        self.customer_signature = Some(signature_url.into());
        self
    }

    /// Checks the evidence.
    ///
    /// # Errors
    ///
    /// Returns the first missing piece, checking photos before, photos
    /// after and then the signature when `signature_required` is set.
    pub fn check(&self, signature_required: bool) -> Result<(), EvidenceError> {
        if !has_url(&self.photos_before) {
            return Err(EvidenceError::MissingPhotosBefore);
        }
        if !has_url(&self.photos_after) {
            return Err(EvidenceError::MissingPhotosAfter);
        }
        let signed = self
            .customer_signature
            .as_deref()
            .is_some_and(|url| !url.trim().is_empty());
        if signature_required && !signed {
            return Err(EvidenceError::MissingCustomerSignature);
        }
        Ok(())
    }
}

fn has_url(urls: &[String]) -> bool {
    urls.iter().any(|url| !url.trim().is_empty())
}

/// Kind of document uploaded from an assembly screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EvidenceKind {
    /// Photo before assembly.
    Before,
    /// Photo after assembly.
    After,
    /// Customer signature.
    Signature,
    /// Photo of a reported issue.
    Issue,
}

impl EvidenceKind {
    /// Document type stored in the archive.
    #[must_use]
    pub const fn doc_type(self) -> &'static str {
        match self {
            Self::Before => "montaj_oncesi",
            Self::After => "montaj_sonrasi",
            Self::Signature => "musteri_imza",
            Self::Issue => "montaj_sorun",
        }
    }
}

/// Evidence collected while uploads complete.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EvidenceDraft {
    evidence: CompletionEvidence,
    issue_photo: Option<String>,
}

impl EvidenceDraft {
    /// Creates an empty draft.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Records an uploaded document URL under `kind`.
    ///
    /// A new signature or issue photo replaces the previous one.
    pub fn attach(&mut self, kind: EvidenceKind, url: impl Into<String>) {
        let location: String = url.into();
        match kind {
            EvidenceKind::Before => self.evidence.photos_before.push(location),
            EvidenceKind::After => self.evidence.photos_after.push(location),
            EvidenceKind::Signature => self.evidence.customer_signature = Some(location),
            EvidenceKind::Issue => self.issue_photo = Some(location),
        }
    }

    /// Sets the completion note.
    pub fn set_note(&mut self, note: Option<String>) {
        self.evidence.note = note;
    }

    /// Returns the completion evidence collected so far.
    #[must_use]
    pub const fn evidence(&self) -> &CompletionEvidence {
        &self.evidence
    }

    /// Returns the uploaded issue photo.
    #[must_use]
    pub fn issue_photo(&self) -> Option<&str> {
        self.issue_photo.as_deref()
    }

    /// Consumes the draft, returning the completion evidence.
    #[must_use]
    pub fn into_evidence(self) -> CompletionEvidence {
        self.evidence
    }
}
