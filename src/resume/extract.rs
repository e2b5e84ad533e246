//! Format-aware text extraction for the source document.
//!
//! `.txt` and `.md` are passed through after lenient UTF-8 decoding, `.docx` is unpacked and its paragraph text collected,
//! and `.pdf` goes through the text layer. A PDF whose text layer is nearly empty is rejected
//! as a probable scan; the cut-off is a heuristic tuned for one-page résumés, not a guarantee.

use regex::{Captures, Regex};
use std::io::Read;
use std::path::{Path, PathBuf};
use std::sync::LazyLock;

use super::types::ExtractError;

/// A PDF whose text layer has fewer non-whitespace characters than this is treated as scanned.
pub const MIN_PDF_TEXT_CHARS: usize = 30;

const DOCX_BODY: &str = "word/document.xml";

static DOCX_TOKEN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?s)<w:t(?:\s[^>]*[^/>])?>(.*?)</w:t>|<w:tab\s*/>|<w:(?:br|cr)\b[^>]*/>|</w:p>")
        .expect("docx token pattern compiles")
});

/// Reader selected from the file extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentFormat {
    /// Text-layer PDF.
    Pdf,
    /// Office Open XML word-processing document.
    Docx,
    /// Plain text or markdown, read verbatim.
    PlainText,
}

impl DocumentFormat {
    /// Pick a reader for `path`, rejecting anything outside `.pdf`, `.docx`, `.txt`, `.md`.
    pub fn from_path(path: &Path) -> Result<Self, ExtractError> {
        let extension = path
            .extension()
            .and_then(|ext| ext.to_str())
            .map(str::to_lowercase)
            .unwrap_or_default();
        match extension.as_str() {
            "pdf" => Ok(Self::Pdf),
            "docx" => Ok(Self::Docx),
            "txt" | "md" => Ok(Self::PlainText),
            _ => Err(ExtractError::UnsupportedFormat {
                extension: if extension.is_empty() {
                    String::new()
                } else {
                    format!(".{extension}")
                },
            }),
        }
    }

    fn label(self) -> &'static str {
        match self {
            Self::Pdf => "pdf",
            Self::Docx => "docx",
            Self::PlainText => "text",
        }
    }
}

/// Extract raw text from the document at `path`.
pub async fn extract_text(path: &Path) -> Result<String, ExtractError> {
    if !matches!(tokio::fs::try_exists(path).await, Ok(true)) {
        return Err(ExtractError::NotFound {
            path: path.to_path_buf(),
        });
    }

    let format = DocumentFormat::from_path(path)?;
    let text = match format {
        DocumentFormat::PlainText => decode_plain_text(&tokio::fs::read(path).await?),
        DocumentFormat::Docx => {
            let owned = path.to_path_buf();
            run_blocking(move || read_docx(&owned), ExtractError::Docx).await?
        }
        DocumentFormat::Pdf => {
            let owned = path.to_path_buf();
            let text = run_blocking(move || read_pdf(owned), ExtractError::Pdf).await?;
            ensure_text_layer(text)?
        }
    };

    tracing::info!(
        path = %path.display(),
        format = format.label(),
        chars = text.chars().count(),
        "Extracted resume text"
    );
    Ok(text)
}

/// Decode plain text leniently: invalid UTF-8 becomes U+FFFD and a leading byte-order mark is dropped.
pub fn decode_plain_text(bytes: &[u8]) -> String {
    let text = String::from_utf8_lossy(bytes);
    text.strip_prefix('\u{feff}').unwrap_or(&text).to_string()
}

/// Reject PDF text that is too sparse to be a real text layer.
pub fn ensure_text_layer(text: String) -> Result<String, ExtractError> {
    let visible = text.chars().filter(|ch| !ch.is_whitespace()).count();
    if visible < MIN_PDF_TEXT_CHARS {
        tracing::warn!(visible, "PDF text layer is nearly empty");
        return Err(ExtractError::NoExtractableText);
    }
    Ok(text)
}

async fn run_blocking<F>(
    job: F,
    on_panic: fn(String) -> ExtractError,
) -> Result<String, ExtractError>
where
    F: FnOnce() -> Result<String, ExtractError> + Send + 'static,
{
    tokio::task::spawn_blocking(job)
        .await
        .map_err(|error| on_panic(format!("reader task failed: {error}")))?
}

fn read_pdf(path: PathBuf) -> Result<String, ExtractError> {
    // pdf-extract prints font diagnostics with `println!`, and stdout may carry the MCP stream.
    let _quiet = match gag::Gag::stdout() {
        Ok(gag) => Some(gag),
        Err(error) => {
            tracing::debug!(%error, "Could not silence stdout during PDF parsing");
            None
        }
    };
    pdf_extract::extract_text(&path).map_err(|error| ExtractError::Pdf(error.to_string()))
}

fn read_docx(path: &Path) -> Result<String, ExtractError> {
    let file = std::fs::File::open(path)?;
    let mut archive =
        zip::ZipArchive::new(file).map_err(|error| ExtractError::Docx(error.to_string()))?;
    let mut xml = String::new();
    archive
        .by_name(DOCX_BODY)
        .map_err(|error| ExtractError::Docx(format!("{DOCX_BODY}: {error}")))?
        .read_to_string(&mut xml)?;
    Ok(docx_xml_to_text(&xml))
}

/// Collect run text from WordprocessingML, one blank-line-separated paragraph at a time.
pub(crate) fn docx_xml_to_text(xml: &str) -> String {
    let mut text = String::new();
    for token in DOCX_TOKEN.captures_iter(xml) {
        push_token(&mut text, &token);
    }
    text.trim_end().to_string()
}

fn push_token(out: &mut String, token: &Captures<'_>) {
    if let Some(run) = token.get(1) {
        out.push_str(&unescape_xml(run.as_str()));
        return;
    }
    let whole = &token[0];
    if whole.starts_with("</w:p") {
        out.push_str("\n\n");
    } else if whole.starts_with("<w:tab") {
        out.push('\t');
    } else {
        out.push('\n');
    }
}

fn unescape_xml(text: &str) -> String {
    text.replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&quot;", "\"")
        .replace("&apos;", "'")
        .replace("&amp;", "&")
}
