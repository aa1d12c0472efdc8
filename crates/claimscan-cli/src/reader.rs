//! Reading pre-extracted claim text.

use crate::error::{CliError, Result};
use claimscan_domain::traits::DocumentReader;
use std::fs;
use std::path::{Path, PathBuf};

/// Page separator written by `pdftotext`
pub const PAGE_SEPARATOR: char = '\x0c';

/// Reads claim text in which pages are separated by form feeds.
///
/// Pages without text stay in place as empty strings. A final form feed does
/// not open another page.
#[derive(Debug, Clone, Copy, Default)]
pub struct PageTextReader;

impl PageTextReader {
    /// Split document text into pages
    pub fn split_pages(text: &str) -> Vec<String> {
        if text.is_empty() {
            return Vec::new();
        }
        let mut pages: Vec<String> = text.split(PAGE_SEPARATOR).map(str::to_string).collect();
        if text.ends_with(PAGE_SEPARATOR) {
            pages.pop();
        }
        pages
    }
}

impl DocumentReader for PageTextReader {
    type Error = CliError;

    fn read_pages(&self, path: &Path) -> Result<Vec<String>> {
        let text = fs::read_to_string(path)?;
        Ok(Self::split_pages(&text))
    }
}

/// Every `*.txt` file directly inside `dir`, sorted by path
pub fn discover_claims(dir: &Path) -> Result<Vec<PathBuf>> {
    let mut claims = Vec::new();
    for entry in fs::read_dir(dir)? {
        let path = entry?.path();
        if path.is_file() && path.extension().is_some_and(|ext| ext == "txt") {
            claims.push(path);
        }
    }
    claims.sort();
    Ok(claims)
}
