//! Résumé loading: plain text (OCR output) or PDF, from disk or an upload.

use std::path::Path;

use bytes::Bytes;
use tracing::info;

use crate::errors::AppError;

/// A résumé received over HTTP.
#[derive(Debug, Clone)]
pub struct ResumeUpload {
    pub file_name: Option<String>,
    pub content_type: Option<String>,
    pub data: Bytes,
}

impl ResumeUpload {
    fn is_pdf(&self) -> bool {
        self.content_type.as_deref() == Some("application/pdf")
            || self.file_name.as_deref().is_some_and(has_pdf_extension)
            || self.data.starts_with(b"%PDF")
    }

    /// Extracts the résumé text. Non-PDF uploads are read as UTF-8 (lossy).
    pub async fn into_text(self) -> Result<String, AppError> {
        if self.is_pdf() {
            let data = self.data;
            extract_pdf(move || pdf_extract::extract_text_from_mem(&data)).await
        } else {
            Ok(String::from_utf8_lossy(&self.data).into_owned())
        }
    }
}

/// Reads the whole résumé at `path`. `.pdf` files go through text extraction,
/// anything else is decoded as UTF-8 (lossy).
pub async fn read_resume(path: &Path) -> Result<String, AppError> {
    let read_error = |source| AppError::ResumeRead {
        path: path.to_path_buf(),
        source,
    };

    let text = if path.to_str().is_some_and(has_pdf_extension) {
        // Surface missing files as read errors rather than PDF errors.
        tokio::fs::metadata(path).await.map_err(read_error)?;
        let owned = path.to_path_buf();
        extract_pdf(move || pdf_extract::extract_text(&owned)).await?
    } else {
        let bytes = tokio::fs::read(path).await.map_err(read_error)?;
        String::from_utf8_lossy(&bytes).into_owned()
    };

    info!("Read resume from {} ({} chars)", path.display(), text.len());
    Ok(text)
}

/// Runs PDF text extraction on the blocking pool.
async fn extract_pdf<F>(extract: F) -> Result<String, AppError>
where
    F: FnOnce() -> Result<String, pdf_extract::OutputError> + Send + 'static,
{
    tokio::task::spawn_blocking(extract)
        .await
        .map_err(|e| {
            AppError::Internal(anyhow::anyhow!("spawn_blocking failed in PDF extraction: {e}"))
        })?
        .map_err(|e| AppError::Pdf(e.to_string()))
}

fn has_pdf_extension(name: &str) -> bool {
    name.to_ascii_lowercase().ends_with(".pdf")
}
