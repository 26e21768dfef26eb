//! Document Loader: turns an uploaded file or pasted text into a `SourceDocument`.
//!
//! Two encodings are accepted: PDF (text extracted page by page, in page
//! order, no layout reconstruction) and plain text (UTF-8, Latin-1 fallback).

use bytes::Bytes;
use tracing::debug;

use crate::documents::{DocumentKind, SourceDocument};
use crate::errors::AppError;

const PDF_MAGIC: &[u8] = b"%PDF-";

/// A file received from the client, before any decoding.
#[derive(Debug, Clone)]
pub struct Upload {
    pub file_name: Option<String>,
    pub bytes: Bytes,
}

/// Loads already-plain text. The text is kept exactly as given.
pub fn load_text(kind: DocumentKind, text: &str) -> Result<SourceDocument, AppError> {
    if text.trim().is_empty() {
        return Err(AppError::UnreadableDocument(format!("{kind} input is empty.")));
    }
    Ok(SourceDocument::new(kind, text.to_string()))
}

/// Loads an uploaded payload, detecting PDF by magic bytes or file extension.
pub fn load_bytes(
    kind: DocumentKind,
    file_name: Option<&str>,
    bytes: &[u8],
) -> Result<SourceDocument, AppError> {
    if is_pdf(file_name, bytes) {
        let text = read_pdf(bytes).map_err(|reason| {
            AppError::UnreadableDocument(format!("{kind}: could not read PDF ({reason})."))
        })?;
        if text.is_empty() {
            return Err(AppError::UnreadableDocument(format!(
                "{kind}: no extractable text found in PDF. Scanned documents need a text layer."
            )));
        }
        debug!("{kind}: extracted {} chars from PDF", text.len());
        return Ok(SourceDocument::new(kind, text));
    }

    load_text(kind, &decode_text(bytes))
}

/// Pasted text wins over an uploaded file when it is non-blank.
/// Returns `Ok(None)` when neither input was provided.
pub fn pick_input(
    kind: DocumentKind,
    pasted: Option<&str>,
    upload: Option<&Upload>,
) -> Result<Option<SourceDocument>, AppError> {
    if let Some(text) = pasted.filter(|t| !t.trim().is_empty()) {
        return load_text(kind, text).map(Some);
    }
    match upload {
        Some(upload) => load_bytes(kind, upload.file_name.as_deref(), &upload.bytes).map(Some),
        None => Ok(None),
    }
}

fn is_pdf(file_name: Option<&str>, bytes: &[u8]) -> bool {
    bytes.starts_with(PDF_MAGIC)
        || file_name
            .map(|name| name.to_ascii_lowercase().ends_with(".pdf"))
            .unwrap_or(false)
}

/// Extracts each page and joins them with a newline, in page order.
fn read_pdf(bytes: &[u8]) -> Result<String, String> {
    // pdf-extract panics on some malformed inputs instead of returning an error.
    let pages = match std::panic::catch_unwind(|| {
        pdf_extract::extract_text_from_mem_by_pages(bytes)
    }) {
        Ok(Ok(pages)) => pages,
        Ok(Err(e)) => return Err(e.to_string()),
        Err(_) => return Err("the PDF parser aborted on this file".to_string()),
    };
    Ok(pages.join("\n").trim().to_string())
}

fn decode_text(bytes: &[u8]) -> String {
    match std::str::from_utf8(bytes) {
        Ok(text) => text.to_string(),
        // Latin-1 maps every byte to the code point of the same value.
        Err(_) => bytes.iter().map(|&b| b as char).collect(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use lopdf::content::{Content, Operation};
    use lopdf::{dictionary, Document, Object, Stream};

    /// Builds a PDF with one Courier text line per page.
    fn build_pdf(pages: &[&str]) -> Vec<u8> {
        let mut doc = Document::with_version("1.5");
        let pages_id = doc.new_object_id();
        let font_id = doc.add_object(dictionary! {
            "Type" => "Font",
            "Subtype" => "Type1",
            "BaseFont" => "Courier",
        });
        let resources_id = doc.add_object(dictionary! {
            "Font" => dictionary! { "F1" => font_id },
        });

        let mut kids: Vec<Object> = Vec::new();
        for text in pages {
            let operations = if text.is_empty() {
                vec![]
            } else {
                vec![
                    Operation::new("BT", vec![]),
                    Operation::new("Tf", vec!["F1".into(), 12.into()]),
                    Operation::new("Td", vec![72.into(), 720.into()]),
                    Operation::new("Tj", vec![Object::string_literal(*text)]),
                    Operation::new("ET", vec![]),
                ]
            };
            let content = Content { operations };
            let content_id =
                doc.add_object(Stream::new(dictionary! {}, content.encode().unwrap()));
            let page_id = doc.add_object(dictionary! {
                "Type" => "Page",
                "Parent" => pages_id,
                "Contents" => content_id,
                "Resources" => resources_id,
                "MediaBox" => vec![0.into(), 0.into(), 612.into(), 792.into()],
            });
            kids.push(page_id.into());
        }

        let count = kids.len() as i64;
        doc.objects.insert(
            pages_id,
            Object::Dictionary(dictionary! {
                "Type" => "Pages",
                "Kids" => kids,
                "Count" => count,
            }),
        );
        let catalog_id = doc.add_object(dictionary! {
            "Type" => "Catalog",
            "Pages" => pages_id,
        });
        doc.trailer.set("Root", catalog_id);

        let mut buffer = Vec::new();
        doc.save_to(&mut buffer).unwrap();
        buffer
    }

    #[test]
    fn test_plain_text_is_returned_unchanged() {
        let cv = "John Doe.\n  Backend Engineer at Acme Corp, 2019-2023.\nSkills: Go, PostgreSQL.  ";
        let doc = load_text(DocumentKind::Cv, cv).unwrap();
        assert_eq!(doc.raw_text(), cv);
        assert_eq!(doc.kind(), DocumentKind::Cv);

        let uploaded = load_bytes(DocumentKind::Cv, Some("cv.txt"), cv.as_bytes()).unwrap();
        assert_eq!(uploaded.raw_text(), cv);
    }

    #[test]
    fn test_blank_text_is_unreadable() {
        let err = load_text(DocumentKind::JobDescription, "  \n\t").unwrap_err();
        assert!(matches!(err, AppError::UnreadableDocument(_)));
        assert!(err.to_string().contains("Job description"));
    }

    #[test]
    fn test_invalid_utf8_falls_back_to_latin1() {
        // "Müller" in Latin-1
        let bytes = [b'M', 0xFC, b'l', b'l', b'e', b'r'];
        let doc = load_bytes(DocumentKind::Cv, Some("cv.txt"), &bytes).unwrap();
        assert_eq!(doc.raw_text(), "Müller");
    }

    #[test]
    fn test_utf8_upload_is_kept_unchanged() {
        let text = "\u{feff}Jane Roe\n  Skills: Go  \n";
        let doc = load_bytes(DocumentKind::Cv, Some("cv.txt"), text.as_bytes()).unwrap();
        assert_eq!(doc.raw_text(), text);
    }

    #[test]
    fn test_pdf_detection_by_magic_or_extension() {
        assert!(is_pdf(None, b"%PDF-1.7\n..."));
        assert!(is_pdf(Some("CV.PDF"), b"anything"));
        assert!(!is_pdf(Some("cv.txt"), b"plain words"));
        assert!(!is_pdf(None, b"plain words"));
    }

    #[test]
    fn test_pdf_pages_are_concatenated_in_order() {
        let pdf = build_pdf(&[
            "Backend Engineer at Acme Corp",
            "Skills Go and PostgreSQL",
            "Education BSc Computer Science",
        ]);
        let doc = load_bytes(DocumentKind::Cv, Some("cv.pdf"), &pdf).unwrap();
        let text = doc.raw_text();

        let first = text.find("Acme Corp").expect("page 1 text missing");
        let second = text.find("PostgreSQL").expect("page 2 text missing");
        let third = text.find("Computer Science").expect("page 3 text missing");
        assert!(first < second && second < third, "pages out of order: {text:?}");
    }

    #[test]
    fn test_pdf_without_text_is_unreadable() {
        let pdf = build_pdf(&["", ""]);
        let err = load_bytes(DocumentKind::Cv, Some("scan.pdf"), &pdf).unwrap_err();
        assert!(matches!(err, AppError::UnreadableDocument(_)));
    }

    #[test]
    fn test_corrupt_pdf_is_unreadable() {
        let err = load_bytes(DocumentKind::Cv, None, b"%PDF-1.4\nthis is not a pdf").unwrap_err();
        assert!(matches!(err, AppError::UnreadableDocument(_)));
    }

    #[test]
    fn test_pick_input_prefers_pasted_text() {
        let upload = Upload {
            file_name: Some("jd.txt".to_string()),
            bytes: Bytes::from_static(b"Uploaded job description"),
        };
        let doc = pick_input(
            DocumentKind::JobDescription,
            Some("Pasted job description"),
            Some(&upload),
        )
        .unwrap()
        .unwrap();
        assert_eq!(doc.raw_text(), "Pasted job description");

        let doc = pick_input(DocumentKind::JobDescription, Some("   "), Some(&upload))
            .unwrap()
            .unwrap();
        assert_eq!(doc.raw_text(), "Uploaded job description");
    }

    #[test]
    fn test_pick_input_without_any_source_is_none() {
        assert!(pick_input(DocumentKind::ExampleLetter, None, None)
            .unwrap()
            .is_none());
    }
}
