//! Rendering documents: pretty JSON, HTML script tags and ZIP bundles.

use crate::assemble::Document;
use regex::Regex;
use std::io::{Seek, Write};
use std::sync::OnceLock;
use thiserror::Error;
use zip::write::FileOptions;
use zip::{CompressionMethod, DateTime, ZipWriter};

#[derive(Debug, Error)]
pub enum OutputError {
    #[error("failed to serialize document `{key}`: {source}")]
    Serialize {
        key: String,
        #[source]
        source: serde_json::Error,
    },
    #[error("archive error: {0}")]
    Archive(#[from] zip::result::ZipError),
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, OutputError>;

fn non_alnum() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"[^a-z0-9]+").expect("valid slug pattern"))
}

/// Lower-case, with runs of anything but ASCII letters and digits folded to `-`.
pub fn slugify(text: &str) -> String {
    non_alnum()
        .replace_all(&text.trim().to_lowercase(), "-")
        .trim_matches('-')
        .to_string()
}

/// `<client>-<page-key>.json`; the client part is dropped when it slugifies to nothing.
pub fn file_name(client: &str, key: &str) -> String {
    let client = slugify(client);
    let key = slugify(key);
    let key = if key.is_empty() { "document".to_string() } else { key };
    if client.is_empty() {
        format!("{key}.json")
    } else {
        format!("{client}-{key}.json")
    }
}

pub fn to_pretty_json(doc: &Document) -> Result<String> {
    serde_json::to_string_pretty(&doc.to_json()).map_err(|source| OutputError::Serialize {
        key: doc.key.clone(),
        source,
    })
}

/// The document wrapped for inclusion in an HTML `<head>`.
pub fn script_tag(doc: &Document) -> Result<String> {
    Ok(format!(
        "<script type=\"application/ld+json\">\n{}\n</script>",
        to_pretty_json(doc)?
    ))
}

/// One named JSON file per document.
pub fn render_files(client: &str, documents: &[Document]) -> Result<Vec<(String, String)>> {
    documents
        .iter()
        .map(|doc| Ok((file_name(client, &doc.key), to_pretty_json(doc)?)))
        .collect()
}

/// Write `files` into a ZIP archive.
///
/// Every entry carries the same fixed timestamp, so identical inputs give
/// byte-identical archives.
pub fn write_archive<W: Write + Seek>(files: &[(String, String)], writer: W) -> Result<W> {
    let options = FileOptions::default()
        .compression_method(CompressionMethod::Deflated)
        .last_modified_time(DateTime::default())
        .unix_permissions(0o644);

    let mut zip = ZipWriter::new(writer);
    for (name, contents) in files {
        zip.start_file(name.as_str(), options)?;
        zip.write_all(contents.as_bytes())?;
    }
    Ok(zip.finish()?)
}
