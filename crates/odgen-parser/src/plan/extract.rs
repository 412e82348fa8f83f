//! Plain-text extraction from shooting plan documents.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use lopdf::{Document, Encoding, Object, ObjectId};

use crate::{detect_format, ParseError, PlanFormat};

/// TJ displacements below this (thousandths of an em) read as a word gap
const WORD_GAP: f32 = -100.0;

/// Extract the plan text: pages in order, each followed by a single newline
pub fn extract_text(path: &Path) -> Result<String, ParseError> {
    match detect_format(path) {
        PlanFormat::Text => std::fs::read_to_string(path).map_err(|source| ParseError::Io {
            path: path.to_path_buf(),
            source,
        }),
        PlanFormat::Pdf => extract_pdf_text(path),
    }
}

fn extract_pdf_text(path: &Path) -> Result<String, ParseError> {
    let pdf_error = |message: String| ParseError::Pdf {
        path: path.to_path_buf(),
        message,
    };

    std::fs::metadata(path).map_err(|source| ParseError::Io {
        path: path.to_path_buf(),
        source,
    })?;

    let mut doc = Document::load(path).map_err(|e| pdf_error(e.to_string()))?;
    if doc.is_encrypted() {
        // permission-only protection opens with the empty user password
        doc.decrypt("")
            .map_err(|e| pdf_error(format!("document is encrypted: {e}")))?;
        tracing::debug!("Decrypted {} with the empty password", path.display());
    }

    let pages = doc.get_pages();
    tracing::info!(pages = pages.len(), "Opened {}", path.display());

    let mut text = String::new();
    for (&page_number, &page_id) in &pages {
        match page_text(&doc, page_id) {
            Ok(page) => {
                tracing::debug!(page = page_number, chars = page.chars().count(), "Extracted page");
                text.push_str(&page);
            }
            Err(e) => {
                tracing::warn!(page = page_number, "Skipping unreadable page: {e}");
            }
        }
        text.push('\n');
    }

    tracing::info!(chars = text.chars().count(), "Extracted plan text");
    Ok(text)
}

/// Text shown on one page, with a line break at every text-line move
fn page_text(doc: &Document, page_id: ObjectId) -> lopdf::Result<String> {
    let encodings: BTreeMap<Vec<u8>, Encoding> = doc
        .get_page_fonts(page_id)?
        .into_iter()
        .filter_map(|(name, font)| match font.get_font_encoding(doc) {
            Ok(encoding) => Some((name, encoding)),
            Err(e) => {
                tracing::debug!(font = %String::from_utf8_lossy(&name), "No usable encoding: {e}");
                None
            }
        })
        .collect();
    let content = doc.get_and_decode_page_content(page_id)?;

    let mut lines = PageLines::default();
    let mut encoding = None;
    let mut matrix_y: Option<f32> = None;
    for operation in &content.operations {
        let operands = &operation.operands;
        match operation.operator.as_str() {
            "Tf" => {
                encoding = operands
                    .first()
                    .and_then(|name| name.as_name().ok())
                    .and_then(|name| encodings.get(name));
            }
            "Td" | "TD" => {
                let moves_down = operands
                    .get(1)
                    .and_then(|ty| ty.as_float().ok())
                    .is_some_and(|ty| ty.abs() > f32::EPSILON);
                if moves_down {
                    lines.break_line();
                } else {
                    lines.space();
                }
            }
            "Tm" => {
                let y = operands.get(5).and_then(|f| f.as_float().ok());
                match (matrix_y, y) {
                    (Some(last), Some(y)) if (last - y).abs() <= f32::EPSILON => lines.space(),
                    _ => lines.break_line(),
                }
                matrix_y = y;
            }
            "T*" | "ET" => lines.break_line(),
            "Tj" | "TJ" => lines.show(encoding, operands),
            "'" | "\"" => {
                lines.break_line();
                lines.show(encoding, &operands[operands.len().saturating_sub(1)..]);
            }
            _ => {}
        }
    }
    Ok(lines.finish())
}

#[derive(Default)]
struct PageLines {
    text: String,
}

impl PageLines {
    fn break_line(&mut self) {
        self.trim_gap();
        if !self.text.is_empty() && !self.text.ends_with('\n') {
            self.text.push('\n');
        }
    }

    fn space(&mut self) {
        if !self.text.is_empty() && !self.text.ends_with([' ', '\n']) {
            self.text.push(' ');
        }
    }

    fn show(&mut self, encoding: Option<&Encoding>, operands: &[Object]) {
        for operand in operands {
            match operand {
                Object::String(bytes, _) => self.text.push_str(&decode(encoding, bytes)),
                Object::Array(items) => self.show(encoding, items),
                Object::Integer(_) | Object::Real(_) => {
                    if operand.as_float().is_ok_and(|gap| gap < WORD_GAP) {
                        self.space();
                    }
                }
                _ => {}
            }
        }
    }

    fn trim_gap(&mut self) {
        let kept = self.text.trim_end_matches(' ').len();
        self.text.truncate(kept);
    }

    fn finish(mut self) -> String {
        self.break_line();
        self.text.truncate(self.text.trim_end().len());
        self.text
    }
}

/// Font-aware decoding, Latin-1 when the font gives no usable encoding
fn decode(encoding: Option<&Encoding>, bytes: &[u8]) -> String {
    encoding
        .and_then(|encoding| Document::decode_text(encoding, bytes).ok())
        .unwrap_or_else(|| bytes.iter().map(|&b| char::from(b)).collect())
}

/// Sibling file that receives the raw extracted text: `<stem>_debug_text.txt`
pub fn debug_dump_path(plan: &Path) -> PathBuf {
    let stem = plan
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "plano".to_string());
    plan.with_file_name(format!("{stem}_debug_text.txt"))
}

/// Write the extracted text beside the plan; failures are logged and ignored
pub fn write_debug_dump(plan: &Path, text: &str) {
    let dump = debug_dump_path(plan);
    if dump == plan {
        return;
    }
    match std::fs::write(&dump, text) {
        Ok(()) => tracing::debug!("Saved extracted text to {}", dump.display()),
        Err(e) => tracing::debug!("Could not save extracted text to {}: {e}", dump.display()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn debug_dump_sits_beside_plan() {
        let dump = debug_dump_path(Path::new("arquivos/PLANO_FINAL.pdf"));
        assert_eq!(dump, Path::new("arquivos/PLANO_FINAL_debug_text.txt"));
    }

    #[test]
    fn text_plans_are_read_verbatim() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("plano.txt");
        std::fs::write(&path, "FILME\ndiária 1:\n").unwrap();
        assert_eq!(extract_text(&path).unwrap(), "FILME\ndiária 1:\n");
    }

    #[test]
    fn corrupt_pdf_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("plano.pdf");
        std::fs::write(&path, b"this is not a pdf").unwrap();
        let err = extract_text(&path).unwrap_err();
        assert!(matches!(err, ParseError::Pdf { .. }));
    }

    #[test]
    fn missing_pdf_is_an_io_error() {
        let err = extract_text(Path::new("/nonexistent/PLANO_FINAL.pdf")).unwrap_err();
        assert!(matches!(err, ParseError::Io { .. }));
    }

    #[test]
    fn unwritable_dump_is_ignored() {
        write_debug_dump(Path::new("/nonexistent/dir/PLANO.pdf"), "texto");
    }
}
