//! Lint for hardcoded Chinese text in front-end sources.
//!
//! Walks the configured source roots, and for every line that is not a
//! comment finds quoted string literals containing at least one CJK
//! Unified Ideograph. Lines that look like imports or type declarations
//! are ignored. The result is a heuristic report: false positives and
//! negatives are expected.

use std::path::{Path, PathBuf};
use std::sync::LazyLock;

use regex::Regex;
use serde::Serialize;

// ---------------------------------------------------------------------------
// Constants
// ---------------------------------------------------------------------------

/// A quoted literal (single, double or backtick) whose body holds at least
/// one character in U+4E00..U+9FFF. Group 1 is the literal body.
pub const CJK_LITERAL_PATTERN: &str = r#"['"`]([^'"` ]*[\x{4E00}-\x{9FFF}]+[^'"`]*)['"`]"#;

static CJK_LITERAL_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(CJK_LITERAL_PATTERN).expect("valid regex"));

/// Source roots scanned when none are given.
pub const DEFAULT_ROOTS: &[&str] = &["src/pages", "src/contexts", "src/components"];

/// File extensions that are scanned.
pub const DEFAULT_EXTENSIONS: &[&str] = &["tsx", "ts", "jsx", "js"];

/// A line containing any of these is treated as a declaration and skipped.
pub const EXCLUDED_KEYWORDS: &[&str] = &["import", "from", "interface", "type", "export"];

/// Line prefixes (after trimming) that mark a comment line.
pub const COMMENT_PREFIXES: &[&str] = &["//", "*"];

/// Matches printed per file before the remainder is summarised.
pub const MAX_MATCHES_PER_FILE: usize = 10;

// ---------------------------------------------------------------------------
// Types
// ---------------------------------------------------------------------------

/// What to scan.
#[derive(Debug, Clone)]
pub struct ScanOptions {
    pub roots: Vec<PathBuf>,
    pub extensions: Vec<String>,
    pub excluded_keywords: Vec<String>,
}

impl Default for ScanOptions {
    fn default() -> Self {
        Self {
            roots: DEFAULT_ROOTS.iter().map(PathBuf::from).collect(),
            extensions: DEFAULT_EXTENSIONS.iter().map(|s| s.to_string()).collect(),
            excluded_keywords: EXCLUDED_KEYWORDS.iter().map(|s| s.to_string()).collect(),
        }
    }
}

impl ScanOptions {
    /// Default options with `roots` replacing the default roots.
    pub fn with_roots<P: Into<PathBuf>>(roots: impl IntoIterator<Item = P>) -> Self {
        Self {
            roots: roots.into_iter().map(Into::into).collect(),
            ..Self::default()
        }
    }

    fn accepts(&self, path: &Path) -> bool {
        path.extension()
            .and_then(|ext| ext.to_str())
            .is_some_and(|ext| self.extensions.iter().any(|e| e == ext))
    }
}

/// A single hardcoded literal.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LiteralMatch {
    /// 1-based line number.
    pub line_number: usize,
    /// Literal body without the surrounding quotes.
    pub text: String,
    /// The full source line, trimmed.
    pub line: String,
}

/// All matches found in one file.
#[derive(Debug, Clone, Serialize)]
pub struct FileFindings {
    pub path: PathBuf,
    pub matches: Vec<LiteralMatch>,
}

impl FileFindings {
    /// The first `limit` matches, plus how many were left out.
    pub fn truncated(&self, limit: usize) -> (&[LiteralMatch], usize) {
        let shown = self.matches.len().min(limit);
        (&self.matches[..shown], self.matches.len() - shown)
    }
}

/// Result of a full scan. Only files with at least one match are listed.
#[derive(Debug, Clone, Default, Serialize)]
pub struct ScanReport {
    pub files_scanned: usize,
    pub files: Vec<FileFindings>,
}

impl ScanReport {
    pub fn total_matches(&self) -> usize {
        self.files.iter().map(|f| f.matches.len()).sum()
    }
}

// ---------------------------------------------------------------------------
// Line / file matching
// ---------------------------------------------------------------------------

fn is_comment(line: &str) -> bool {
    let trimmed = line.trim_start();
    COMMENT_PREFIXES.iter().any(|p| trimmed.starts_with(p))
}

/// Literal bodies on `line` that contain Chinese text.
///
/// Returns nothing for comment lines and for lines containing any of
/// `excluded_keywords`.
pub fn scan_line<S: AsRef<str>>(line: &str, excluded_keywords: &[S]) -> Vec<String> {
    if is_comment(line) {
        return Vec::new();
    }
    if excluded_keywords
        .iter()
        .any(|kw| line.contains(kw.as_ref()))
    {
        return Vec::new();
    }
    CJK_LITERAL_RE
        .captures_iter(line)
        .filter_map(|caps| caps.get(1))
        .map(|m| m.as_str().to_string())
        .collect()
}

/// Scan a whole source text line by line.
pub fn scan_source<S: AsRef<str>>(source: &str, excluded_keywords: &[S]) -> Vec<LiteralMatch> {
    source
        .lines()
        .enumerate()
        .flat_map(|(idx, line)| {
            scan_line(line, excluded_keywords)
                .into_iter()
                .map(move |text| LiteralMatch {
                    line_number: idx + 1,
                    text,
                    line: line.trim().to_string(),
                })
        })
        .collect()
}

// ---------------------------------------------------------------------------
// Directory walk
// ---------------------------------------------------------------------------

/// Recursively list files under `root` accepted by `options`, sorted.
///
/// A missing root yields an empty list; unreadable directories are skipped.
/// Symlinked directories are not followed.
pub async fn collect_source_files(root: &Path, options: &ScanOptions) -> Vec<PathBuf> {
    let mut files = Vec::new();
    collect_recursive(root, options, &mut files).await;
    files
}

async fn collect_recursive(dir: &Path, options: &ScanOptions, files: &mut Vec<PathBuf>) {
    let mut entries = match tokio::fs::read_dir(dir).await {
        Ok(entries) => entries,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            tracing::debug!(dir = %dir.display(), "Scan root does not exist, skipping");
            return;
        }
        Err(e) => {
            tracing::warn!(dir = %dir.display(), error = %e, "Failed to read directory");
            return;
        }
    };

    // `DirEntry::file_type` does not follow symlinks, so a link back into
    // the tree is never descended into.
    let mut children = Vec::new();
    loop {
        match entries.next_entry().await {
            Ok(Some(entry)) => match entry.file_type().await {
                Ok(file_type) => children.push((entry.path(), file_type.is_dir())),
                Err(e) => {
                    tracing::warn!(
                        path = %entry.path().display(),
                        error = %e,
                        "Failed to read file type"
                    );
                }
            },
            Ok(None) => break,
            Err(e) => {
                tracing::warn!(dir = %dir.display(), error = %e, "Failed to read directory entry");
                break;
            }
        }
    }
    children.sort();

    for (path, is_dir) in children {
        if is_dir {
            Box::pin(collect_recursive(&path, options, files)).await;
        } else if options.accepts(&path) {
            files.push(path);
        }
    }
}

/// Scan one file. Files that cannot be read as UTF-8 text yield `None`.
pub async fn scan_file(path: &Path, options: &ScanOptions) -> Option<Vec<LiteralMatch>> {
    match tokio::fs::read_to_string(path).await {
        Ok(source) => Some(scan_source(&source, &options.excluded_keywords)),
        Err(e) => {
            tracing::debug!(path = %path.display(), error = %e, "Skipping unreadable file");
            None
        }
    }
}

/// Scan every root in `options`, in order.
pub async fn scan(options: &ScanOptions) -> ScanReport {
    let mut report = ScanReport::default();

    for root in &options.roots {
        for path in collect_source_files(root, options).await {
            let Some(matches) = scan_file(&path, options).await else {
                continue;
            };
            report.files_scanned += 1;
            if !matches.is_empty() {
                report.files.push(FileFindings { path, matches });
            }
        }
    }

    tracing::info!(
        files_scanned = report.files_scanned,
        files_with_matches = report.files.len(),
        total_matches = report.total_matches(),
        "Scan complete"
    );
    report
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
