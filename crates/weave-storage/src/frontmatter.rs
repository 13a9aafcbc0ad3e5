//! Frontmatter splitting.

use crate::metadata::Metadata;
use crate::path::LogicalPath;
use crate::storage::{Document, StorageError, StorageErrorKind};

/// Split a leading `---` fenced YAML block from the document text.
///
/// Returns `(Some(yaml), body)` when the text opens with a `---` line and a
/// later line consists of exactly `---`; otherwise `(None, text)`. A leading
/// byte-order mark is ignored. Both `\n` and `\r\n` line endings are accepted.
#[must_use]
pub fn split_frontmatter(raw: &str) -> (Option<&str>, &str) {
    let text = raw.strip_prefix('\u{feff}').unwrap_or(raw);
    let Some(rest) = text
        .strip_prefix("---")
        .and_then(|r| r.strip_prefix("\r\n").or_else(|| r.strip_prefix('\n')))
    else {
        return (None, text);
    };

    let mut offset = 0;
    for line in rest.split_inclusive('\n') {
        if line.trim_end_matches(['\r', '\n']) == "---" {
            return (Some(&rest[..offset]), &rest[offset + line.len()..]);
        }
        offset += line.len();
    }
    (None, text)
}

/// Build a [`Document`] from raw stored text.
pub(crate) fn parse_document(
    path: &LogicalPath,
    raw: &str,
    backend: &'static str,
) -> Result<Document, StorageError> {
    let (yaml, body) = split_frontmatter(raw);
    let metadata = match yaml {
        Some(yaml) => Metadata::from_yaml(yaml).map_err(|e| {
            StorageError::new(StorageErrorKind::InvalidMetadata)
                .with_path(path.to_string())
                .with_backend(backend)
                .with_source(e)
        })?,
        None => Metadata::default(),
    };
    Ok(Document {
        path: path.clone(),
        metadata,
        body: body.to_owned(),
    })
}
