//! Ordering of the fetched collection for display.
//!
//! Title collation is case-insensitive: titles are compared lowercased first
//! and only ties between differently-cased spellings fall back to raw byte
//! order. A missing title compares as the empty string. Missing or
//! unparseable timestamps compare lowest. Both directions keep collection
//! order for equal keys.

use chrono::{DateTime, Utc};
use std::cmp::Ordering;

use crate::format::parse_timestamp;
use crate::model::{Document, FilterCriteria, SortKey, SortOrder};

#[derive(Debug, PartialEq, Eq, PartialOrd, Ord)]
enum CompareKey<'a> {
    Title { folded: String, raw: &'a str },
    Date(Option<DateTime<Utc>>),
}

impl<'a> CompareKey<'a> {
    fn for_document(doc: &'a Document, sort: SortKey) -> Self {
        match sort {
            SortKey::Title => {
                let raw = doc.title.as_deref().unwrap_or("");
                Self::Title {
                    folded: raw.to_lowercase(),
                    raw,
                }
            }
            SortKey::Date => Self::Date(doc.updated_at.as_deref().and_then(parse_timestamp)),
        }
    }
}

/// Returns the documents in display order. The input is left untouched.
#[must_use]
pub fn project(documents: &[Document], criteria: FilterCriteria) -> Vec<&Document> {
    let mut keyed: Vec<(CompareKey<'_>, &Document)> = documents
        .iter()
        .map(|doc| (CompareKey::for_document(doc, criteria.sort), doc))
        .collect();

    // `sort_by` is stable, so equal keys keep their collection order.
    keyed.sort_by(|(a, _), (b, _)| directed(a.cmp(b), criteria.order));

    keyed.into_iter().map(|(_, doc)| doc).collect()
}

fn directed(ordering: Ordering, order: SortOrder) -> Ordering {
    match order {
        SortOrder::Asc => ordering,
        SortOrder::Desc => ordering.reverse(),
    }
}
