//! Collapses raw fetch results into a unique article set.

use std::collections::HashSet;

use news_core::RawArticle;

/// Remove duplicates, keeping the first occurrence in iteration order.
///
/// Two articles are duplicates when they share a case-folded, trimmed
/// title and the same link. The store's (ticker, title, time) constraint
/// is the second, authoritative layer; this pass just keeps one fetch from
/// carrying the same story through multiple windows.
pub fn dedup_articles(articles: Vec<RawArticle>) -> Vec<RawArticle> {
    let mut seen: HashSet<(String, String)> = HashSet::new();

    articles
        .into_iter()
        .filter(|article| {
            let key = (
                article.title.trim().to_lowercase(),
                article.link.clone(),
            );
            seen.insert(key)
        })
        .collect()
}
