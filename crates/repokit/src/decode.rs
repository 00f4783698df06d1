//! Repository archive decoding
//!
//! Turns the bytes of a GitHub zipball into [`Document`]s. Entries are
//! visited in central-directory order, filtered by file suffix and decoded
//! with a single text encoding. Any failure aborts the whole decode.

use crate::error::{ReaderError, Result};
use crate::types::Document;
use encoding_rs::Encoding;
use std::collections::BTreeSet;
use std::fmt;
use std::io::{Cursor, Read};
use tracing::trace;
use zip::ZipArchive;

/// Default text encoding label
pub const DEFAULT_ENCODING: &str = "utf-8";

/// Labels decoded as 7-bit ASCII
const ASCII_LABELS: &[&str] = &[
    "ascii",
    "us-ascii",
    "646",
    "ansi-x3.4-1968",
    "iso646-us",
    "cp367",
];

/// Labels decoded as ISO-8859-1, one byte per code point U+0000..U+00FF
const LATIN1_LABELS: &[&str] = &[
    "latin1",
    "latin-1",
    "l1",
    "iso-8859-1",
    "iso8859-1",
    "8859",
    "cp819",
];

#[derive(Clone, Copy, PartialEq, Eq)]
enum Codec {
    Ascii,
    Latin1,
    Standard(&'static Encoding),
}

/// Text encoding used to decode every file in the archive
///
/// `ascii` and `latin-1` labels get exact decoders; the WHATWG table would
/// map both to windows-1252. Everything else goes through `encoding_rs`.
#[derive(Clone, Copy, PartialEq, Eq)]
pub struct TextEncoding {
    codec: Codec,
}

impl TextEncoding {
    /// Look up an encoding by label (`utf-8`, `latin1`, `shift_jis`, ...)
    ///
    /// Labels are matched case-insensitively; `_` and `-` are interchangeable
    /// for the ascii and latin-1 aliases.
    pub fn for_label(label: &str) -> Result<Self> {
        let normalized = label.trim().to_ascii_lowercase().replace('_', "-");

        let codec = if ASCII_LABELS.contains(&normalized.as_str()) {
            Codec::Ascii
        } else if LATIN1_LABELS.contains(&normalized.as_str()) {
            Codec::Latin1
        } else {
            Encoding::for_label(label.as_bytes())
                .map(Codec::Standard)
                .ok_or_else(|| ReaderError::UnknownEncoding(label.to_string()))?
        };

        Ok(Self { codec })
    }

    /// Canonical name of the encoding
    pub fn name(&self) -> &'static str {
        match self.codec {
            Codec::Ascii => "ascii",
            Codec::Latin1 => "latin-1",
            Codec::Standard(encoding) => encoding.name(),
        }
    }

    /// Decode `bytes`, failing on any malformed sequence
    ///
    /// A leading byte order mark is kept as content.
    pub fn decode(&self, path: &str, bytes: &[u8]) -> Result<String> {
        let decoded = match self.codec {
            Codec::Ascii => bytes
                .is_ascii()
                .then(|| bytes.iter().map(|&b| char::from(b)).collect()),
            Codec::Latin1 => Some(bytes.iter().map(|&b| char::from(b)).collect()),
            Codec::Standard(encoding) => encoding
                .decode_without_bom_handling_and_without_replacement(bytes)
                .map(|text| text.into_owned()),
        };

        decoded.ok_or_else(|| ReaderError::Decode {
            path: path.to_string(),
            encoding: self.name().to_string(),
        })
    }
}

impl Default for TextEncoding {
    fn default() -> Self {
        Self {
            codec: Codec::Standard(encoding_rs::UTF_8),
        }
    }
}

impl fmt::Debug for TextEncoding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("TextEncoding").field(&self.name()).finish()
    }
}

/// Allow-list of file suffixes, e.g. `.md` or `.py`
///
/// Suffixes are compared exactly, including the leading dot and case.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExtensionFilter {
    extensions: BTreeSet<String>,
}

impl ExtensionFilter {
    /// Create a filter from a list of suffixes
    pub fn new<I, S>(extensions: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            extensions: extensions.into_iter().map(Into::into).collect(),
        }
    }

    /// Returns true if the archive path has an allowed suffix
    pub fn matches(&self, path: &str) -> bool {
        self.extensions.contains(path_suffix(path))
    }

    /// Configured suffixes, sorted
    pub fn extensions(&self) -> impl Iterator<Item = &str> {
        self.extensions.iter().map(String::as_str)
    }

    /// Returns true if nothing can match
    pub fn is_empty(&self) -> bool {
        self.extensions.is_empty()
    }
}

/// Final component of an archive path
///
/// Archive paths always use `/`. A trailing `/` (directory entry) is ignored.
pub fn file_name(path: &str) -> &str {
    let trimmed = path.trim_end_matches('/');
    match trimmed.rfind('/') {
        Some(idx) => &trimmed[idx + 1..],
        None => trimmed,
    }
}

/// Suffix of the final path component, including the leading dot
///
/// Returns `""` when the name has no dot, starts with its only dot
/// (`.gitignore`) or ends with a dot.
pub fn path_suffix(path: &str) -> &str {
    let name = file_name(path);
    match name.rfind('.') {
        Some(idx) if idx > 0 && idx < name.len() - 1 => &name[idx..],
        _ => "",
    }
}

/// Decode a zip archive into documents
///
/// The suffix alone decides: a directory entry has the suffix of its last
/// component and yields an empty document if that suffix is allowed.
/// Entries whose suffix is not in `filter` are skipped silently.
pub fn decode_archive(
    bytes: &[u8],
    filter: &ExtensionFilter,
    encoding: &TextEncoding,
) -> Result<Vec<Document>> {
    let mut archive = ZipArchive::new(Cursor::new(bytes))
        .map_err(|e| ReaderError::Archive(format!("failed to open archive: {}", e)))?;

    let mut documents = Vec::new();

    for index in 0..archive.len() {
        let mut entry = archive
            .by_index(index)
            .map_err(|e| ReaderError::Archive(format!("failed to read entry {}: {}", index, e)))?;

        let path = entry.name().to_string();

        if !filter.matches(&path) {
            trace!(path = %path, "Skipping archive entry");
            continue;
        }

        // Declared sizes come from the archive header and are not trusted
        let mut raw = Vec::new();
        entry
            .read_to_end(&mut raw)
            .map_err(|e| ReaderError::Archive(format!("failed to read {}: {}", path, e)))?;

        let content = encoding.decode(&path, &raw)?;
        let name = file_name(&path).to_string();
        documents.push(Document::new(content, name, path));
    }

    Ok(documents)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use zip::write::SimpleFileOptions;
    use zip::ZipWriter;

    fn build_archive(entries: &[(&str, &[u8])]) -> Vec<u8> {
        let mut writer = ZipWriter::new(Cursor::new(Vec::new()));
        let options = SimpleFileOptions::default();
        for (name, content) in entries {
            if name.ends_with('/') {
                writer.add_directory(*name, options).unwrap();
            } else {
                writer.start_file(*name, options).unwrap();
                writer.write_all(content).unwrap();
            }
        }
        writer.finish().unwrap().into_inner()
    }

    #[test]
    fn test_file_name() {
        assert_eq!(file_name("repo-main/src/x.py"), "x.py");
        assert_eq!(file_name("README.md"), "README.md");
        assert_eq!(file_name("repo-main/src/"), "src");
    }

    #[test]
    fn test_path_suffix() {
        assert_eq!(path_suffix("repo-main/README.md"), ".md");
        assert_eq!(path_suffix("repo-main/archive.tar.gz"), ".gz");
        assert_eq!(path_suffix("repo-main/.gitignore"), "");
        assert_eq!(path_suffix("repo-main/Makefile"), "");
        assert_eq!(path_suffix("repo-main/weird."), "");
        assert_eq!(path_suffix("repo-main/"), "");
        assert_eq!(path_suffix("repo-v1.2/"), ".2");
        assert_eq!(path_suffix("repo-main/Notes.MD"), ".MD");
    }

    #[test]
    fn test_extension_filter() {
        let filter = ExtensionFilter::new([".md", ".py"]);
        assert!(filter.matches("repo-main/README.md"));
        assert!(filter.matches("repo-main/src/x.py"));
        assert!(!filter.matches("repo-main/img.png"));
        assert!(!filter.matches("repo-main/Notes.MD"));
        assert_eq!(filter.extensions().collect::<Vec<_>>(), vec![".md", ".py"]);
        assert!(ExtensionFilter::default().is_empty());
    }

    #[test]
    fn test_encoding_lookup() {
        assert_eq!(TextEncoding::for_label("utf-8").unwrap().name(), "UTF-8");
        assert_eq!(TextEncoding::for_label("UTF8").unwrap().name(), "UTF-8");
        assert_eq!(TextEncoding::for_label("latin1").unwrap().name(), "latin-1");
        assert_eq!(TextEncoding::for_label("ISO_8859_1").unwrap().name(), "latin-1");
        assert_eq!(TextEncoding::for_label("US-ASCII").unwrap().name(), "ascii");
        assert_eq!(
            TextEncoding::for_label("windows-1252").unwrap().name(),
            "windows-1252"
        );
        assert!(matches!(
            TextEncoding::for_label("klingon"),
            Err(ReaderError::UnknownEncoding(_))
        ));
        assert_eq!(TextEncoding::default().name(), "UTF-8");
    }

    #[test]
    fn test_decode_keeps_bom() {
        let text = TextEncoding::default()
            .decode("a.md", b"\xEF\xBB\xBFhello")
            .unwrap();
        assert_eq!(text, "\u{feff}hello");
    }

    #[test]
    fn test_decode_latin1() {
        let encoding = TextEncoding::for_label("latin1").unwrap();
        assert_eq!(encoding.decode("a.txt", b"caf\xE9").unwrap(), "café");
        // C1 controls stay controls, unlike windows-1252
        assert_eq!(encoding.decode("a.txt", b"\x80\x9F").unwrap(), "\u{80}\u{9f}");
        assert_eq!(encoding.decode("a.txt", b"\xFF").unwrap(), "\u{ff}");
    }

    #[test]
    fn test_decode_ascii_is_strict() {
        let encoding = TextEncoding::for_label("ascii").unwrap();
        assert_eq!(encoding.decode("a.txt", b"plain").unwrap(), "plain");

        let err = encoding.decode("a.txt", b"caf\xE9\xFF").unwrap_err();
        assert!(err.is_decode());
        assert!(err.to_string().contains("as ascii"));
    }

    #[test]
    fn test_decode_archive_ascii_rejects_high_bytes() {
        let bytes = build_archive(&[("r-main/menu.md", b"caf\xE9\xFF")]);

        let filter = ExtensionFilter::new([".md"]);
        let encoding = TextEncoding::for_label("us-ascii").unwrap();
        let err = decode_archive(&bytes, &filter, &encoding).unwrap_err();
        assert!(err.is_decode());
    }

    #[test]
    fn test_decode_archive_filters_and_orders() {
        let bytes = build_archive(&[
            ("repo-main/", b""),
            ("repo-main/README.md", b"# Readme"),
            ("repo-main/src/", b""),
            ("repo-main/src/x.py", b"print('x')"),
            ("repo-main/img.png", b"\x89PNG"),
        ]);

        let filter = ExtensionFilter::new([".md", ".py"]);
        let docs = decode_archive(&bytes, &filter, &TextEncoding::default()).unwrap();

        assert_eq!(docs.len(), 2);
        assert_eq!(docs[0].meta.file_name, "README.md");
        assert_eq!(docs[0].meta.file_path, "repo-main/README.md");
        assert_eq!(docs[0].content, "# Readme");
        assert_eq!(docs[1].meta.file_name, "x.py");
        assert_eq!(docs[1].meta.file_path, "repo-main/src/x.py");
        assert_eq!(docs[1].content, "print('x')");
        assert_ne!(docs[0].id, docs[1].id);
        for doc in &docs {
            assert_eq!(doc.meta.file_id, doc.id);
        }
    }

    #[test]
    fn test_decode_archive_keeps_listing_order() {
        let bytes = build_archive(&[
            ("r-main/z.md", b"z"),
            ("r-main/a.md", b"a"),
            ("r-main/m.md", b"m"),
        ]);

        let filter = ExtensionFilter::new([".md"]);
        let docs = decode_archive(&bytes, &filter, &TextEncoding::default()).unwrap();
        let names: Vec<_> = docs.iter().map(|d| d.meta.file_name.as_str()).collect();
        assert_eq!(names, vec!["z.md", "a.md", "m.md"]);
    }

    #[test]
    fn test_decode_archive_dotted_directory_matches_suffix() {
        let bytes = build_archive(&[("repo-v1.2/", b""), ("repo-v1.2/notes.2", b"two")]);

        let filter = ExtensionFilter::new([".2"]);
        let docs = decode_archive(&bytes, &filter, &TextEncoding::default()).unwrap();
        assert_eq!(docs.len(), 2);
        assert_eq!(docs[0].meta.file_path, "repo-v1.2/");
        assert_eq!(docs[0].meta.file_name, "repo-v1.2");
        assert_eq!(docs[0].content, "");
        assert_eq!(docs[1].meta.file_path, "repo-v1.2/notes.2");
    }

    #[test]
    fn test_decode_archive_empty_suffix() {
        let bytes = build_archive(&[
            ("r-main/", b""),
            ("r-main/Makefile", b"all:"),
            ("r-main/a.md", b"a"),
        ]);

        let filter = ExtensionFilter::new([""]);
        let docs = decode_archive(&bytes, &filter, &TextEncoding::default()).unwrap();
        let paths: Vec<_> = docs.iter().map(|d| d.meta.file_path.as_str()).collect();
        assert_eq!(paths, vec!["r-main/", "r-main/Makefile"]);
        assert_eq!(docs[0].content, "");
        assert_eq!(docs[1].content, "all:");
    }

    #[test]
    fn test_decode_archive_invalid_text_fails_whole_call() {
        let bytes = build_archive(&[
            ("r-main/ok.md", b"fine"),
            ("r-main/bad.md", b"\xFF\xFE\xFD"),
        ]);

        let filter = ExtensionFilter::new([".md"]);
        let err = decode_archive(&bytes, &filter, &TextEncoding::default()).unwrap_err();
        assert!(err.is_decode());
        assert!(err.to_string().contains("r-main/bad.md"));
    }

    #[test]
    fn test_decode_archive_invalid_bytes_in_skipped_entry() {
        let bytes = build_archive(&[("r-main/ok.md", b"fine"), ("r-main/bin.dat", b"\xFF")]);

        let filter = ExtensionFilter::new([".md"]);
        let docs = decode_archive(&bytes, &filter, &TextEncoding::default()).unwrap();
        assert_eq!(docs.len(), 1);
    }

    #[test]
    fn test_decode_not_a_zip() {
        let err = decode_archive(
            b"<html>not a zip</html>",
            &ExtensionFilter::new([".md"]),
            &TextEncoding::default(),
        )
        .unwrap_err();
        assert!(matches!(err, ReaderError::Archive(_)));
    }

    #[test]
    fn test_decode_empty_archive() {
        let bytes = build_archive(&[]);
        let docs = decode_archive(
            &bytes,
            &ExtensionFilter::new([".md"]),
            &TextEncoding::default(),
        )
        .unwrap();
        assert!(docs.is_empty());
    }
}
