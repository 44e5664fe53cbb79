//! Uploaded documents and MIME detection.
//!
//! Only image and PDF uploads are accepted at the UI boundary; the analysis
//! pipeline itself does not enforce this.

use std::borrow::Cow;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

/// Where a document's bytes live.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DocumentSource {
    Memory(Vec<u8>),
    /// Read lazily at encode time; the file may vanish in between.
    File(PathBuf),
}

/// The single document owned by an upload session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadedDocument {
    source: DocumentSource,
    pub mime_type: String,
    pub display_name: String,
    pub size_bytes: u64,
}

impl UploadedDocument {
    pub fn from_bytes(
        display_name: impl Into<String>,
        mime_type: impl Into<String>,
        bytes: Vec<u8>,
    ) -> Self {
        Self {
            size_bytes: bytes.len() as u64,
            source: DocumentSource::Memory(bytes),
            mime_type: mime_type.into(),
            display_name: display_name.into(),
        }
    }

    /// Reference a file on disk. The MIME type comes from the extension.
    pub fn from_path(path: &Path) -> io::Result<Self> {
        let metadata = fs::metadata(path)?;
        let display_name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());
        Ok(Self {
            source: DocumentSource::File(path.to_path_buf()),
            mime_type: detect_mime_type(path).to_string(),
            display_name,
            size_bytes: metadata.len(),
        })
    }

    pub fn source(&self) -> &DocumentSource {
        &self.source
    }

    pub fn read_bytes(&self) -> io::Result<Cow<'_, [u8]>> {
        match &self.source {
            DocumentSource::Memory(bytes) => Ok(Cow::Borrowed(bytes)),
            DocumentSource::File(path) => fs::read(path).map(Cow::Owned),
        }
    }

    pub fn is_accepted(&self) -> bool {
        is_accepted_mime(&self.mime_type)
    }

    /// Size in megabytes with two decimals, e.g. `"1.25 MB"`.
    pub fn size_label(&self) -> String {
        format!("{:.2} MB", self.size_bytes as f64 / 1024.0 / 1024.0)
    }
}

/// Detect MIME type by file extension.
pub fn detect_mime_type(path: &Path) -> &'static str {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_lowercase();

    match ext.as_str() {
        "jpg" | "jpeg" => "image/jpeg",
        "png" => "image/png",
        "gif" => "image/gif",
        "webp" => "image/webp",
        "avif" => "image/avif",
        "bmp" => "image/bmp",
        "heic" => "image/heic",
        "tiff" | "tif" => "image/tiff",
        "pdf" => "application/pdf",
        _ => "application/octet-stream",
    }
}

pub fn is_image(mime: &str) -> bool {
    mime.starts_with("image/")
}

pub fn is_pdf(mime: &str) -> bool {
    mime == "application/pdf"
}

/// Whether an upload of this type may be selected for analysis.
pub fn is_accepted_mime(mime: &str) -> bool {
    is_image(mime) || is_pdf(mime)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn detects_common_upload_types() {
        assert_eq!(detect_mime_type(Path::new("scan.JPG")), "image/jpeg");
        assert_eq!(detect_mime_type(Path::new("bill.pdf")), "application/pdf");
        assert_eq!(detect_mime_type(Path::new("photo.webp")), "image/webp");
    }

    #[test]
    fn unknown_extension_fallback() {
        assert_eq!(
            detect_mime_type(Path::new("notes.docx")),
            "application/octet-stream"
        );
        assert!(!is_accepted_mime("application/octet-stream"));
    }

    #[test]
    fn from_path_reads_metadata() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("receipt.png");
        let mut file = fs::File::create(&path).unwrap();
        file.write_all(&[0u8; 2048]).unwrap();

        let doc = UploadedDocument::from_path(&path).unwrap();
        assert_eq!(doc.display_name, "receipt.png");
        assert_eq!(doc.mime_type, "image/png");
        assert_eq!(doc.size_bytes, 2048);
        assert!(doc.is_accepted());
        assert_eq!(doc.read_bytes().unwrap().len(), 2048);
    }

    #[test]
    fn size_label_in_megabytes() {
        let doc = UploadedDocument::from_bytes("a.png", "image/png", vec![0; 1_310_720]);
        assert_eq!(doc.size_label(), "1.25 MB");
    }
}
