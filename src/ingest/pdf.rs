//! PDF discovery and text extraction.

use super::IngestError;
use std::path::{Path, PathBuf};
use tracing::{debug, info};
use walkdir::WalkDir;

/// Text of a single PDF page.
#[derive(Debug, Clone, PartialEq)]
pub struct Page {
    /// Path of the PDF this page came from.
    pub source: String,
    /// 1-based page number.
    pub number: usize,
    pub text: String,
}

/// Resolve the curriculum path into a list of PDF files.
///
/// A file must carry a `.pdf` extension (any case). A directory is walked
/// recursively and every PDF inside it is returned in path order.
pub fn discover_pdfs(path: &Path) -> Result<Vec<PathBuf>, IngestError> {
    if !path.exists() {
        return Err(IngestError::NotFound(path.to_path_buf()));
    }

    if path.is_file() {
        if !is_pdf(path) {
            return Err(IngestError::NotPdf(path.to_path_buf()));
        }
        return Ok(vec![path.to_path_buf()]);
    }

    let mut pdfs: Vec<PathBuf> = WalkDir::new(path)
        .follow_links(false)
        .into_iter()
        .filter_map(|entry| entry.ok())
        .filter(|entry| entry.file_type().is_file() && is_pdf(entry.path()))
        .map(|entry| entry.into_path())
        .collect();

    if pdfs.is_empty() {
        return Err(IngestError::EmptyDirectory(path.to_path_buf()));
    }

    pdfs.sort();
    debug!("Discovered {} PDF files under {}", pdfs.len(), path.display());
    Ok(pdfs)
}

fn is_pdf(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case("pdf"))
}

/// Load a PDF and return the text of each page.
pub fn load_pdf(path: &Path) -> Result<Vec<Page>, IngestError> {
    let bytes = std::fs::read(path).map_err(|source| IngestError::Io {
        path: path.to_path_buf(),
        source,
    })?;

    let pages = extract_pages(&bytes, &path.display().to_string()).map_err(|message| {
        IngestError::Parse {
            path: path.to_path_buf(),
            message,
        }
    })?;

    info!("Loaded {} pages from {}", pages.len(), path.display());
    Ok(pages)
}

fn extract_pages(bytes: &[u8], source: &str) -> Result<Vec<Page>, String> {
    let texts = pdf_extract::extract_text_from_mem_by_pages(bytes).map_err(|e| e.to_string())?;

    Ok(texts
        .into_iter()
        .enumerate()
        .map(|(i, text)| Page {
            source: source.to_string(),
            number: i + 1,
            text,
        })
        .collect())
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use tempfile::TempDir;

    /// Build a one-page PDF containing `text` with lopdf.
    pub(crate) fn make_test_pdf(text: &str) -> Vec<u8> {
        use lopdf::dictionary;
        use lopdf::{Document, Object, Stream};

        let mut doc = Document::with_version("1.4");

        let font_id = doc.add_object(dictionary! {
            "Type" => "Font",
            "Subtype" => "Type1",
            "BaseFont" => "Helvetica",
        });

        let content = format!("BT /F1 12 Tf 100 700 Td ({text}) Tj ET");
        let content_id = doc.add_object(Stream::new(dictionary! {}, content.into_bytes()));

        let resources = dictionary! {
            "Font" => dictionary! {
                "F1" => font_id,
            },
        };

        let page_id = doc.add_object(dictionary! {
            "Type" => "Page",
            "MediaBox" => vec![0.into(), 0.into(), 612.into(), 792.into()],
            "Contents" => content_id,
            "Resources" => resources,
        });

        let pages_id = doc.add_object(dictionary! {
            "Type" => "Pages",
            "Kids" => vec![page_id.into()],
            "Count" => 1,
        });

        if let Ok(Object::Dictionary(ref mut dict)) = doc.get_object_mut(page_id) {
            dict.set("Parent", pages_id);
        }

        let catalog_id = doc.add_object(dictionary! {
            "Type" => "Catalog",
            "Pages" => pages_id,
        });
        doc.trailer.set("Root", catalog_id);

        let mut buf = Vec::new();
        doc.save_to(&mut buf).unwrap();
        buf
    }

    #[test]
    fn test_load_pdf_extracts_page_text() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("curriculum.pdf");
        std::fs::write(&path, make_test_pdf("Unit One Fractions")).unwrap();

        let pages = load_pdf(&path).unwrap();
        assert_eq!(pages.len(), 1);
        assert_eq!(pages[0].number, 1);
        assert!(pages[0].text.contains("Fractions") || pages[0].text.contains("Unit"));
    }

    #[test]
    fn test_load_invalid_pdf_errors() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("broken.pdf");
        std::fs::write(&path, b"not a pdf").unwrap();

        assert!(matches!(load_pdf(&path), Err(IngestError::Parse { .. })));
    }

    #[test]
    fn test_discover_missing_path() {
        let err = discover_pdfs(Path::new("/definitely/not/here.pdf")).unwrap_err();
        assert!(err.to_string().starts_with("Curriculum PDF not found at:"));
    }

    #[test]
    fn test_discover_rejects_non_pdf() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("notes.txt");
        std::fs::write(&path, "hello").unwrap();

        let err = discover_pdfs(&path).unwrap_err();
        assert!(err.to_string().ends_with("is not a PDF file."));
    }

    #[test]
    fn test_discover_directory_sorted_case_insensitive() {
        let dir = TempDir::new().unwrap();
        std::fs::create_dir(dir.path().join("unit2")).unwrap();
        std::fs::write(dir.path().join("b.PDF"), b"x").unwrap();
        std::fs::write(dir.path().join("a.pdf"), b"x").unwrap();
        std::fs::write(dir.path().join("unit2").join("c.pdf"), b"x").unwrap();
        std::fs::write(dir.path().join("readme.md"), b"x").unwrap();

        let pdfs = discover_pdfs(dir.path()).unwrap();
        let names: Vec<_> = pdfs
            .iter()
            .map(|p| p.strip_prefix(dir.path()).unwrap().display().to_string())
            .collect();
        assert_eq!(names.len(), 3);
        assert_eq!(names[0], "a.pdf");
        assert_eq!(names[1], "b.PDF");
    }

    #[test]
    fn test_discover_empty_directory() {
        let dir = TempDir::new().unwrap();
        assert!(matches!(
            discover_pdfs(dir.path()),
            Err(IngestError::EmptyDirectory(_))
        ));
    }
}
