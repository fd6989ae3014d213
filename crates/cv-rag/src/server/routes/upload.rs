//! CV upload endpoint

use axum::{
    extract::{Multipart, State},
    response::Response,
};
use bytes::Bytes;

use crate::error::{Error, Result};
use crate::server::page::Banner;
use crate::server::state::AppState;
use crate::session::{BrowserSession, ChatSession};

const PDF_MIME: &str = "application/pdf";

/// A file taken from the `file` multipart field
struct Upload {
    filename: String,
    content_type: Option<String>,
    data: Bytes,
}

impl Upload {
    /// PDF by extension or by declared content type
    fn is_pdf(&self) -> bool {
        mime_guess::from_path(&self.filename).first_raw() == Some(PDF_MIME)
            || self.content_type.as_deref() == Some(PDF_MIME)
    }
}

/// POST /upload - store a CV and rebuild the index
pub async fn upload_cv(
    State(state): State<AppState>,
    session: BrowserSession,
    mut multipart: Multipart,
) -> Response {
    let mut chat = ChatSession::load(&session);
    let mut banners = Vec::new();

    match read_file_field(&mut multipart).await {
        Ok(Some(upload)) => {
            store_and_index(&state, &mut chat, upload, &mut banners).await;
            chat.save(&session);
        }
        // Submit without a selected file does nothing
        Ok(None) => {}
        Err(e) => banners.push(Banner::error(e.to_string())),
    }

    state.pages().respond(&chat, &banners)
}

async fn store_and_index(
    state: &AppState,
    chat: &mut ChatSession,
    upload: Upload,
    banners: &mut Vec<Banner>,
) {
    if !upload.is_pdf() {
        banners.push(Banner::error(format!(
            "{} is not a PDF. Please upload your CV as a PDF file.",
            upload.filename
        )));
        return;
    }

    tracing::info!("Storing upload: {} ({} bytes)", upload.filename, upload.data.len());

    let path = match state.store().save(&upload.data, &upload.filename).await {
        Ok(path) => path,
        Err(e) => {
            tracing::error!("Upload failed: {}", e);
            banners.push(Banner::error(e.to_string()));
            return;
        }
    };

    chat.file_path = Some(path.clone());
    banners.push(Banner::success(format!(
        "CV submitted successfully! File path: {}",
        path.display()
    )));

    let report = state.index().rebuild().await;
    banners.extend(report.lines.iter().map(Banner::from));
}

/// First `file` field with a filename, if any
async fn read_file_field(multipart: &mut Multipart) -> Result<Option<Upload>> {
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| Error::internal(format!("Failed to read multipart field: {}", e)))?
    {
        if field.name() != Some("file") {
            continue;
        }

        // Browsers send an empty filename when nothing was selected
        let filename = match field.file_name() {
            Some(name) if !name.is_empty() => name.to_string(),
            _ => continue,
        };
        let content_type = field.content_type().map(str::to_string);

        let data = field
            .bytes()
            .await
            .map_err(|e| Error::internal(format!("Failed to read {}: {}", filename, e)))?;

        return Ok(Some(Upload {
            filename,
            content_type,
            data,
        }));
    }

    Ok(None)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn upload(filename: &str, content_type: Option<&str>) -> Upload {
        Upload {
            filename: filename.to_string(),
            content_type: content_type.map(str::to_string),
            data: Bytes::from_static(b"%PDF-1.4"),
        }
    }

    #[test]
    fn test_pdf_detection() {
        assert!(upload("resume.pdf", None).is_pdf());
        assert!(upload("RESUME.PDF", Some("application/octet-stream")).is_pdf());
        assert!(upload("resume", Some("application/pdf")).is_pdf());
        assert!(!upload("resume.docx", None).is_pdf());
        assert!(!upload("resume.txt", Some("text/plain")).is_pdf());
    }
}
