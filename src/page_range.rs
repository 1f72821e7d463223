use serde::Serialize;
use std::fmt;
use std::ops::RangeInclusive;
use std::str::FromStr;
use thiserror::Error;

const EXAMPLES: &[&str] = &["1-5", "1-3,5", "1,3,5-7", "1-5,8,10-12", "2,4,6-10,15"];

/// Out-of-bound pages named individually in an error message.
const MAX_REPORTED_PAGES: usize = 20;

/// Largest set that is spelled out page by page in listings.
pub const MAX_LISTED_PAGES: u64 = 10_000;

/// Outcome of parsing a page range specification.
pub type ParseResult = std::result::Result<PageSet, RangeError>;

/// Why a page range specification was rejected.
///
/// The `Display` text is meant to be shown to the user verbatim.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RangeError {
    #[error("Page ranges cannot be empty")]
    Empty,

    /// A range token split into more than two parts, e.g. "1-2-3".
    #[error("Invalid range format: {0}")]
    RangeFormat(String),

    #[error("Invalid page numbers in range: {0}")]
    RangeBounds(String),

    #[error("Invalid page number: {0}")]
    PageNumber(String),

    #[error("Page numbers must be positive")]
    NonPositive,

    #[error("Invalid range: {0} (start > end)")]
    Inverted(String),

    #[error("No valid pages specified")]
    NoPages,

    #[error(
        "Page(s) {} are out of bounds (PDF has {} pages)",
        list_pages(.pages),
        .total
    )]
    OutOfBounds { pages: PageSet, total: u32 },
}

/// Coarse classification of a [`RangeError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    EmptyInput,
    MalformedToken,
    NonPositivePage,
    InvertedRange,
    NoPagesSpecified,
    OutOfBounds,
}

impl RangeError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            RangeError::Empty => ErrorKind::EmptyInput,
            RangeError::RangeFormat(_) | RangeError::RangeBounds(_) | RangeError::PageNumber(_) => {
                ErrorKind::MalformedToken
            }
            RangeError::NonPositive => ErrorKind::NonPositivePage,
            RangeError::Inverted(_) => ErrorKind::InvertedRange,
            RangeError::NoPages => ErrorKind::NoPagesSpecified,
            RangeError::OutOfBounds { .. } => ErrorKind::OutOfBounds,
        }
    }
}

fn list_pages(pages: &PageSet) -> String {
    let listed: Vec<String> = pages
        .iter()
        .take(MAX_REPORTED_PAGES)
        .map(|p| p.to_string())
        .collect();
    let remaining = pages.len() - listed.len() as u64;

    let mut out = listed.join(", ");
    if remaining > 0 {
        out.push_str(&format!(" and {} more", remaining));
    }
    out
}

/// A deduplicated set of 1-based page numbers, iterated in ascending order.
///
/// Stored as sorted, disjoint, non-adjacent spans so that a range like
/// "1-400000000" costs the same as "1-4".
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PageSet(Vec<RangeInclusive<u32>>);

impl PageSet {
    /// Number of pages in the set.
    pub fn len(&self) -> u64 {
        self.0
            .iter()
            .map(|span| u64::from(span.end() - span.start()) + 1)
            .sum()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = u32> + '_ {
        self.0.iter().flat_map(|span| span.clone())
    }

    pub fn to_vec(&self) -> Vec<u32> {
        self.iter().collect()
    }

    /// The pages as a list, or `None` past [`MAX_LISTED_PAGES`].
    pub fn listing(&self) -> Option<Vec<u32>> {
        (self.len() <= MAX_LISTED_PAGES).then(|| self.to_vec())
    }

    /// Maximal runs of consecutive pages.
    pub fn runs(&self) -> Vec<RangeInclusive<u32>> {
        self.0.clone()
    }

    /// Add `start..=end`, merging with any span it overlaps or touches.
    pub fn insert_range(&mut self, mut start: u32, mut end: u32) {
        let mut idx = self
            .0
            .partition_point(|span| span.end().saturating_add(1) < start);
        while idx < self.0.len() && *self.0[idx].start() <= end.saturating_add(1) {
            start = start.min(*self.0[idx].start());
            end = end.max(*self.0[idx].end());
            self.0.remove(idx);
        }
        self.0.insert(idx, start..=end);
    }

    /// Reject the set if any page lies beyond `total`.
    pub fn check_bound(self, total: u32) -> ParseResult {
        let out_of_bounds: Vec<RangeInclusive<u32>> = match total.checked_add(1) {
            Some(first) => self
                .0
                .iter()
                .filter(|span| *span.end() >= first)
                .map(|span| (*span.start()).max(first)..=*span.end())
                .collect(),
            None => Vec::new(),
        };
        if out_of_bounds.is_empty() {
            Ok(self)
        } else {
            Err(RangeError::OutOfBounds {
                pages: PageSet(out_of_bounds),
                total,
            })
        }
    }
}

impl FromIterator<u32> for PageSet {
    fn from_iter<I: IntoIterator<Item = u32>>(iter: I) -> Self {
        let mut set = PageSet::default();
        for page in iter {
            set.insert_range(page, page);
        }
        set
    }
}

impl fmt::Display for PageSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&format_runs(&self.0))
    }
}

impl FromStr for PageSet {
    type Err = RangeError;

    fn from_str(s: &str) -> ParseResult {
        parse_page_ranges(s)
    }
}

/// Parse a comma-separated list of page ranges like "1-5,8,10-12".
///
/// Empty tokens are skipped, duplicates collapse, and the first bad token
/// fails the whole specification.
pub fn parse_page_ranges(s: &str) -> ParseResult {
    if s.trim().is_empty() {
        return Err(RangeError::Empty);
    }

    let mut pages = PageSet::default();
    for token in s.split(',').map(str::trim).filter(|t| !t.is_empty()) {
        if token.contains('-') {
            let parts: Vec<&str> = token.split('-').collect();
            if parts.len() != 2 {
                return Err(RangeError::RangeFormat(token.to_string()));
            }

            // "-5" ends up here with an empty start
            let (start, end) = match (parse_bound(parts[0]), parse_bound(parts[1])) {
                (Some(start), Some(end)) => (start, end),
                _ => return Err(RangeError::RangeBounds(token.to_string())),
            };

            if start == 0 || end == 0 {
                return Err(RangeError::NonPositive);
            }
            if start > end {
                return Err(RangeError::Inverted(token.to_string()));
            }

            pages.insert_range(start, end);
        } else {
            let page = parse_bound(token).ok_or_else(|| RangeError::PageNumber(token.to_string()))?;
            if page == 0 {
                return Err(RangeError::NonPositive);
            }
            pages.insert_range(page, page);
        }
    }

    if pages.is_empty() {
        return Err(RangeError::NoPages);
    }

    Ok(pages)
}

fn parse_bound(s: &str) -> Option<u32> {
    s.trim().parse::<u32>().ok()
}

/// Parse `s` and reject any page greater than `total`.
pub fn validate_page_ranges(s: &str, total: u32) -> ParseResult {
    parse_page_ranges(s)?.check_bound(total)
}

/// Split a strictly ascending list of pages into maximal consecutive runs.
pub fn runs(pages: &[u32]) -> Vec<RangeInclusive<u32>> {
    debug_assert!(
        pages.windows(2).all(|w| w[0] < w[1]),
        "pages must be strictly ascending"
    );

    let mut runs = Vec::new();
    let mut pages = pages.iter().copied();

    let Some(first) = pages.next() else {
        return runs;
    };

    let (mut start, mut end) = (first, first);
    for page in pages {
        if end.checked_add(1) == Some(page) {
            end = page;
        } else {
            runs.push(start..=end);
            start = page;
            end = page;
        }
    }
    runs.push(start..=end);

    runs
}

/// Compress a strictly ascending list of pages into a range string like
/// "1-3,7,9-11".
///
/// Unsorted or repeated input should go through [`PageSet`] first.
pub fn format_page_ranges(pages: &[u32]) -> String {
    format_runs(&runs(pages))
}

fn format_runs(runs: &[RangeInclusive<u32>]) -> String {
    runs.iter()
        .map(|run| {
            if run.start() == run.end() {
                run.start().to_string()
            } else {
                format!("{}-{}", run.start(), run.end())
            }
        })
        .collect::<Vec<_>>()
        .join(",")
}

/// Sample specifications to show as input hints.
pub fn page_range_examples() -> &'static [&'static str] {
    EXAMPLES
}

/// A [`ParseResult`] flattened for JSON consumers.
///
/// `pages` is left out when the set is too large to spell out; `ranges` and
/// `count` always describe it.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Validation {
    pub valid: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pages: Option<Vec<u32>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ranges: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub count: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub kind: Option<ErrorKind>,
}

impl From<ParseResult> for Validation {
    fn from(result: ParseResult) -> Self {
        match result {
            Ok(pages) => Validation {
                valid: true,
                pages: pages.listing(),
                ranges: Some(pages.to_string()),
                count: Some(pages.len()),
                error: None,
                kind: None,
            },
            Err(e) => Validation {
                valid: false,
                pages: None,
                ranges: None,
                count: None,
                error: Some(e.to_string()),
                kind: Some(e.kind()),
            },
        }
    }
}
