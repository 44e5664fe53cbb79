//! Document → transport-safe text.

use base64::{engine::general_purpose::STANDARD, Engine};
use serde::{Deserialize, Serialize};

use crate::document::UploadedDocument;
use crate::error::AnalysisError;

/// MIME type assumed when a caller sends none.
pub const DEFAULT_IMAGE_MIME: &str = "image/jpeg";

/// Base64 of the document bytes plus its MIME type.
///
/// Serializes to the analysis request body `{ "imageBase64", "mimeType" }`.
/// The base64 text carries no `data:` prefix.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EncodedPayload {
    pub image_base64: String,
    pub mime_type: String,
}

impl EncodedPayload {
    pub fn new(image_base64: impl Into<String>, mime_type: impl Into<String>) -> Self {
        Self {
            image_base64: image_base64.into(),
            mime_type: mime_type.into(),
        }
    }

    /// `data:` URL used to embed the document as an inline image.
    pub fn data_url(&self) -> String {
        let mime = if self.mime_type.trim().is_empty() {
            DEFAULT_IMAGE_MIME
        } else {
            self.mime_type.as_str()
        };
        format!("data:{};base64,{}", mime, self.image_base64)
    }

    pub fn decode(&self) -> Result<Vec<u8>, base64::DecodeError> {
        STANDARD.decode(&self.image_base64)
    }
}

/// Encode a document for transport. Byte content is not altered.
pub fn encode(document: &UploadedDocument) -> Result<EncodedPayload, AnalysisError> {
    let bytes = document
        .read_bytes()
        .map_err(|e| AnalysisError::Read(e.to_string()))?;
    Ok(EncodedPayload {
        image_base64: STANDARD.encode(&bytes),
        mime_type: document.mime_type.clone(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::Path;

    #[test]
    fn encode_is_reversible() {
        let bytes: Vec<u8> = (0..=255).collect();
        let doc = UploadedDocument::from_bytes("bin.png", "image/png", bytes.clone());
        let payload = encode(&doc).unwrap();
        assert_eq!(payload.mime_type, "image/png");
        assert!(!payload.image_base64.starts_with("data:"));
        assert_eq!(payload.decode().unwrap(), bytes);
    }

    #[test]
    fn encode_is_deterministic() {
        let doc = UploadedDocument::from_bytes("a.jpg", "image/jpeg", b"hello".to_vec());
        assert_eq!(encode(&doc).unwrap(), encode(&doc).unwrap());
        assert_eq!(encode(&doc).unwrap().image_base64, "aGVsbG8=");
    }

    #[test]
    fn vanished_file_is_read_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("gone.jpg");
        std::fs::write(&path, b"jpeg").unwrap();
        let doc = UploadedDocument::from_path(&path).unwrap();
        std::fs::remove_file(&path).unwrap();

        let err = encode(&doc).unwrap_err();
        assert_eq!(err.kind(), "read");
    }

    #[test]
    fn wire_shape_is_camel_case() {
        let payload = EncodedPayload::new("AAAA", "application/pdf");
        let json = serde_json::to_value(&payload).unwrap();
        assert_eq!(json["imageBase64"], "AAAA");
        assert_eq!(json["mimeType"], "application/pdf");
    }

    #[test]
    fn data_url_defaults_to_jpeg() {
        let payload = EncodedPayload::new("AAAA", "");
        assert_eq!(payload.data_url(), "data:image/jpeg;base64,AAAA");
        assert!(UploadedDocument::from_path(Path::new("/nonexistent/x.png")).is_err());
    }
}
