//! Ticker-to-company-name resolution.
//!
//! Backed by the SEC `company_tickers.json` map, loaded once at startup.
//! Resolved names are cleaned of corporate suffixes so they work as news
//! search terms ("Apple Inc." searches poorly, "Apple" doesn't).

use std::collections::HashMap;
use std::path::Path;

use anyhow::{Context, Result};
use news_core::NameResolver;
use serde::Deserialize;

#[derive(Debug, Deserialize)]
struct CompanyEntry {
    ticker: String,
    title: String,
}

/// In-memory ticker directory.
pub struct SymbolDirectory {
    names: HashMap<String, String>,
}

impl SymbolDirectory {
    /// Load from the SEC company tickers file: a JSON object keyed by
    /// arbitrary indices, each value holding `ticker` and `title`.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("reading company tickers file {}", path.display()))?;
        let directory = Self::parse(&raw)
            .with_context(|| format!("parsing company tickers file {}", path.display()))?;
        tracing::debug!(tickers = directory.len(), "symbol directory loaded");
        Ok(directory)
    }

    fn parse(raw: &str) -> Result<Self> {
        let entries: HashMap<String, CompanyEntry> = serde_json::from_str(raw)?;
        let names = entries
            .into_values()
            .map(|entry| (entry.ticker.to_uppercase(), entry.title))
            .collect();
        Ok(Self { names })
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }
}

impl NameResolver for SymbolDirectory {
    fn resolve(&self, ticker: &str) -> Option<String> {
        self.names
            .get(&ticker.to_uppercase())
            .map(|title| clean_company_name(title))
    }
}

/// Strip one trailing corporate suffix, with an optional comma before it
/// and an optional period after it: "Apple, Inc." becomes "Apple".
pub fn clean_company_name(name: &str) -> String {
    const SUFFIXES: [&str; 6] = ["Incorporated", "Inc", "Ltd", "LLC", "Corp", "Company"];

    let trimmed = name.trim();
    let no_period = trimmed.strip_suffix('.').unwrap_or(trimmed);

    for suffix in SUFFIXES {
        if no_period.len() <= suffix.len() {
            continue;
        }
        let split = no_period.len() - suffix.len();
        if !no_period.is_char_boundary(split) {
            continue;
        }
        let (head, tail) = no_period.split_at(split);
        if !tail.eq_ignore_ascii_case(suffix) {
            continue;
        }
        // Word boundary: "Zinc" must not lose its "inc".
        if !head.ends_with(|c: char| c.is_whitespace() || c == ',') {
            continue;
        }
        let head = head.trim_end().trim_end_matches(',').trim_end();
        if !head.is_empty() {
            return head.to_string();
        }
    }

    trimmed.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = r#"{
        "0": { "cik_str": 320193, "ticker": "AAPL", "title": "Apple Inc." },
        "1": { "cik_str": 789019, "ticker": "MSFT", "title": "Microsoft Corp" },
        "2": { "cik_str": 1318605, "ticker": "TSLA", "title": "Tesla, Inc." }
    }"#;

    #[test]
    fn test_resolve_cleans_suffix() {
        let directory = SymbolDirectory::parse(SAMPLE).unwrap();
        assert_eq!(directory.resolve("AAPL").as_deref(), Some("Apple"));
        assert_eq!(directory.resolve("MSFT").as_deref(), Some("Microsoft"));
        assert_eq!(directory.resolve("TSLA").as_deref(), Some("Tesla"));
    }

    #[test]
    fn test_resolve_is_case_insensitive() {
        let directory = SymbolDirectory::parse(SAMPLE).unwrap();
        assert_eq!(directory.resolve("aapl").as_deref(), Some("Apple"));
    }

    #[test]
    fn test_resolve_unknown_ticker() {
        let directory = SymbolDirectory::parse(SAMPLE).unwrap();
        assert!(directory.resolve("ZZZZ").is_none());
    }

    #[test]
    fn test_clean_company_name_variants() {
        assert_eq!(clean_company_name("Apple Inc."), "Apple");
        assert_eq!(clean_company_name("Apple, Inc."), "Apple");
        assert_eq!(clean_company_name("Alphabet Incorporated"), "Alphabet");
        assert_eq!(clean_company_name("Acme Company"), "Acme");
        assert_eq!(clean_company_name("Imperial Brands LLC"), "Imperial Brands");
    }

    #[test]
    fn test_clean_company_name_keeps_embedded_suffix() {
        // Suffix must be its own word.
        assert_eq!(clean_company_name("Zinc"), "Zinc");
        assert_eq!(clean_company_name("Holding Corporation"), "Holding Corporation");
    }

    #[test]
    fn test_clean_company_name_without_suffix() {
        assert_eq!(clean_company_name("  Berkshire Hathaway  "), "Berkshire Hathaway");
    }

    #[test]
    fn test_parse_rejects_malformed_file() {
        assert!(SymbolDirectory::parse("not json").is_err());
    }
}
