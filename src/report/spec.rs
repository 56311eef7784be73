//! Report specification parsing
//!
//! Reports are requested with a free-form string whose tokens are recognized
//! by substring presence, in any order; unrecognized text is silently
//! ignored. That permissiveness is a compatibility contract, so the fragile
//! matching lives entirely in this one translation function and the rest of
//! the engine works from the typed `ReportSpec`.

use once_cell::sync::Lazy;
use regex::Regex;

use crate::models::interval::SimpleOrCompound;
use crate::report::AnalysisSettings;

static DIGITS: Lazy<Regex> = Lazy::new(|| Regex::new(r"\d+").unwrap());

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortBy {
    /// `by frequency`: order by occurrence count.
    Frequency,
    /// `by interval` / `by ngram` / `by n-gram` (and the default): order by
    /// the label total orders.
    Label,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortDirection {
    Ascending,
    Descending,
}

/// Typed form of one report request.
#[derive(Debug, Clone, PartialEq)]
pub struct ReportSpec {
    /// Explicit cardinality list from `n=...`, unvalidated; `None` means all
    /// populated cardinalities.
    pub ns: Option<Vec<usize>>,
    /// `quality` / `noQuality` override of the session setting.
    pub heed_quality: Option<bool>,
    /// `simple` / `compound` override of the session setting.
    pub simple_or_compound: Option<SimpleOrCompound>,
    pub sort_by: SortBy,
    ascending_token: bool,
    descending_token: bool,
    /// `graph`: chart-ready data instead of text.
    pub graph: bool,
    /// `total`: short-circuit to a plain sum.
    pub total: bool,
}

impl ReportSpec {
    /// Translates a specification string. Never fails; malformed tokens
    /// degrade to defaults.
    pub fn parse(specs: &str) -> ReportSpec {
        ReportSpec {
            ns: parse_n_list(specs),
            // Token matching is case-sensitive: "noQuality" does not contain
            // the lowercase token "quality".
            heed_quality: if specs.contains("quality") {
                Some(true)
            } else if specs.contains("noQuality") {
                Some(false)
            } else {
                None
            },
            simple_or_compound: if specs.contains("simple") {
                Some(SimpleOrCompound::Simple)
            } else if specs.contains("compound") {
                Some(SimpleOrCompound::Compound)
            } else {
                None
            },
            sort_by: if specs.contains("by frequency") {
                SortBy::Frequency
            } else {
                SortBy::Label
            },
            ascending_token: specs.contains("ascending") || specs.contains("low to high"),
            descending_token: specs.contains("descending") || specs.contains("high to low"),
            graph: specs.contains("graph"),
            total: specs.contains("total"),
        }
    }

    /// Quality sensitivity after applying any override to the session
    /// setting. An explicit `quality` token wins over `noQuality`.
    pub fn effective_quality(&self, settings: &AnalysisSettings) -> bool {
        self.heed_quality.unwrap_or(settings.heed_quality)
    }

    pub fn effective_form(&self, settings: &AnalysisSettings) -> SimpleOrCompound {
        self.simple_or_compound.unwrap_or(settings.simple_or_compound)
    }

    /// Sort direction, defaulting per sort mode: frequency sorts default
    /// descending (most common first), label sorts default ascending.
    pub fn direction(&self) -> SortDirection {
        match self.sort_by {
            SortBy::Frequency => {
                if self.ascending_token {
                    SortDirection::Ascending
                } else {
                    SortDirection::Descending
                }
            }
            SortBy::Label => {
                if self.descending_token {
                    SortDirection::Descending
                } else {
                    SortDirection::Ascending
                }
            }
        }
    }
}

/// Extracts the `n=` list: digits after `n=` up to the first space. When no
/// space follows, the final character is lost; callers must end the list
/// with a space. Duplicates collapse and the list comes back sorted.
fn parse_n_list(specs: &str) -> Option<Vec<usize>> {
    let pos = specs.find("n=")?;
    let tail = &specs[pos + 2..];
    let segment = match tail.find(' ') {
        Some(cut) => &tail[..cut],
        None => {
            let mut chars = tail.chars();
            chars.next_back();
            chars.as_str()
        }
    };
    let mut ns: Vec<usize> = DIGITS
        .find_iter(segment)
        .filter_map(|m| m.as_str().parse().ok())
        .collect();
    ns.sort_unstable();
    ns.dedup();
    Some(ns)
}
