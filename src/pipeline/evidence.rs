use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use serde::{Deserialize, Serialize};

use super::types::ContentPart;

pub const PDF_MEDIA_TYPE: &str = "application/pdf";
pub const OCTET_STREAM: &str = "application/octet-stream";

/// Source labels recorded in evolution entries.
pub const DOCUMENT_SOURCE_LABEL: &str = "Documento PDF";
pub const TEXT_SOURCE_LABEL: &str = "Reporte de Texto";

/// Input material handed to the model alongside a prompt.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Evidence {
    /// Base64-encoded document bytes.
    Document { media_type: String, data: String },
    Text { text: String },
}

impl Evidence {
    pub fn document(media_type: &str, bytes: &[u8]) -> Self {
        Evidence::Document {
            media_type: media_type.to_string(),
            data: STANDARD.encode(bytes),
        }
    }

    pub fn pdf(bytes: &[u8]) -> Self {
        Self::document(PDF_MEDIA_TYPE, bytes)
    }

    pub fn text(text: impl Into<String>) -> Self {
        Evidence::Text { text: text.into() }
    }

    /// Classify raw file bytes by magic bytes, not by extension.
    ///
    /// PDFs become documents, valid UTF-8 becomes text, anything else is sent
    /// as an opaque document.
    pub fn from_bytes(bytes: &[u8]) -> Self {
        if bytes.starts_with(b"%PDF") {
            return Self::pdf(bytes);
        }
        match std::str::from_utf8(bytes) {
            Ok(text) => Self::text(text),
            Err(_) => Self::document(OCTET_STREAM, bytes),
        }
    }

    pub fn is_document(&self) -> bool {
        matches!(self, Evidence::Document { .. })
    }

    pub fn source_label(&self) -> &'static str {
        match self {
            Evidence::Document { .. } => DOCUMENT_SOURCE_LABEL,
            Evidence::Text { .. } => TEXT_SOURCE_LABEL,
        }
    }

    pub fn to_part(&self) -> ContentPart {
        match self {
            Evidence::Document { media_type, data } => ContentPart::InlineData {
                mime_type: media_type.clone(),
                data: data.clone(),
            },
            Evidence::Text { text } => ContentPart::Text(text.clone()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pdf_detected_by_magic_bytes() {
        let evidence = Evidence::from_bytes(b"%PDF-1.7\n...");
        match &evidence {
            Evidence::Document { media_type, data } => {
                assert_eq!(media_type, PDF_MEDIA_TYPE);
                assert_eq!(STANDARD.decode(data).unwrap(), b"%PDF-1.7\n...");
            }
            other => panic!("expected document, got {other:?}"),
        }
        assert_eq!(evidence.source_label(), "Documento PDF");
    }

    #[test]
    fn utf8_bytes_become_text() {
        let evidence = Evidence::from_bytes("Avance de obra 45%".as_bytes());
        assert_eq!(evidence, Evidence::text("Avance de obra 45%"));
        assert_eq!(evidence.source_label(), "Reporte de Texto");
        assert!(!evidence.is_document());
    }

    #[test]
    fn binary_bytes_become_opaque_document() {
        let evidence = Evidence::from_bytes(&[0xff, 0xfe, 0x00, 0x01]);
        assert!(evidence.is_document());
        assert!(matches!(
            evidence,
            Evidence::Document { ref media_type, .. } if media_type == OCTET_STREAM
        ));
    }

    #[test]
    fn to_part_maps_variants() {
        assert_eq!(
            Evidence::text("hola").to_part(),
            ContentPart::Text("hola".into())
        );
        assert!(matches!(
            Evidence::pdf(b"%PDF").to_part(),
            ContentPart::InlineData { ref mime_type, .. } if mime_type == PDF_MEDIA_TYPE
        ));
    }
}
