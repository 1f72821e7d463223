use super::PdfDocument;
use crate::config::Config;
use crate::page_range::{parse_page_ranges, PageSet};
use anyhow::{Context, Result};
use serde::Serialize;
use std::fs::File;
use std::io::{BufWriter, Seek, Write};
use std::ops::RangeInclusive;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};
use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, ZipWriter};

/// One PDF written into the archive
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SplitEntry {
    pub name: String,
    pub first_page: u32,
    pub last_page: u32,
}

impl SplitEntry {
    pub fn page_count(&self) -> u32 {
        self.last_page - self.first_page + 1
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct SplitSummary {
    pub output_path: PathBuf,
    pub total_pages: u32,
    pub entries: Vec<SplitEntry>,
}

/// Group pages into runs; each run becomes one output PDF.
pub fn group_consecutive(pages: &PageSet) -> Vec<RangeInclusive<u32>> {
    pages.runs()
}

pub fn entry_name(base: &str, run: &RangeInclusive<u32>) -> String {
    if run.start() == run.end() {
        format!("{}_page{}.pdf", base, run.start())
    } else {
        format!("{}_pages{}-{}.pdf", base, run.start(), run.end())
    }
}

pub fn archive_name(base: &str) -> String {
    format!("{}_split.zip", base)
}

/// Write one deflated PDF per run of `pages` into a ZIP on `writer`.
pub fn split_to_zip<W: Write + Seek>(
    doc: &PdfDocument,
    pages: &PageSet,
    base: &str,
    writer: W,
) -> Result<Vec<SplitEntry>> {
    if pages.is_empty() {
        anyhow::bail!("No pages specified");
    }

    let mut zip = ZipWriter::new(writer);
    let options = SimpleFileOptions::default().compression_method(CompressionMethod::Deflated);

    let mut entries = Vec::new();
    for run in group_consecutive(pages) {
        let page_list: Vec<u32> = run.clone().collect();
        let mut part = doc
            .extract_pages(&page_list)
            .with_context(|| format!("Failed to extract pages from {}", doc.name))?;
        let bytes = PdfDocument::to_bytes(&mut part)?;

        let name = entry_name(base, &run);
        zip.start_file(name.as_str(), options)
            .with_context(|| format!("Failed to create ZIP entry: {}", name))?;
        zip.write_all(&bytes)
            .with_context(|| format!("Failed to write ZIP entry: {}", name))?;
        debug!(entry = %name, bytes = bytes.len(), "wrote archive entry");

        entries.push(SplitEntry {
            name,
            first_page: *run.start(),
            last_page: *run.end(),
        });
    }

    let mut writer = zip.finish().context("Failed to finalize ZIP")?;
    writer.flush().context("Failed to flush ZIP")?;
    Ok(entries)
}

/// Split the PDF at `input` by `ranges` into a ZIP archive.
///
/// Without an explicit `output`, the archive is written next to the input as
/// `<stem>_split.zip`. Nothing is written unless the input and the ranges
/// pass validation.
pub fn split_file(
    input: &Path,
    ranges: &str,
    output: Option<&Path>,
    config: &Config,
) -> Result<SplitSummary> {
    let size = config.check_input(input)?;
    let pages = parse_page_ranges(ranges)?;

    let doc = PdfDocument::open(input)?;
    let total_pages = doc.page_count();
    let pages = pages.check_bound(total_pages)?;

    let base = input
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("document");
    let output_path = match output {
        Some(path) => path.to_path_buf(),
        None => input.with_file_name(archive_name(base)),
    };

    if same_file(input, &output_path) {
        anyhow::bail!(
            "Output {} would overwrite the input PDF",
            output_path.display()
        );
    }

    info!(
        input = %input.display(),
        size,
        total_pages,
        ranges = %pages,
        "splitting PDF"
    );

    let file = File::create(&output_path)
        .with_context(|| format!("Failed to create {}", output_path.display()))?;
    let entries = match split_to_zip(&doc, &pages, base, BufWriter::new(file)) {
        Ok(entries) => entries,
        Err(e) => {
            if let Err(remove_err) = std::fs::remove_file(&output_path) {
                warn!(
                    path = %output_path.display(),
                    error = %remove_err,
                    "could not remove partial archive"
                );
            }
            return Err(e);
        }
    };

    info!(output = %output_path.display(), entries = entries.len(), "split complete");

    Ok(SplitSummary {
        output_path,
        total_pages,
        entries,
    })
}

fn same_file(a: &Path, b: &Path) -> bool {
    match (std::fs::canonicalize(a), std::fs::canonicalize(b)) {
        (Ok(a), Ok(b)) => a == b,
        _ => false,
    }
}
