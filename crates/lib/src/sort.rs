use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::{collate, content::Entry};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortKey {
    #[default]
    Newest,
    Oldest,
}

impl SortKey {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            SortKey::Newest => "newest",
            SortKey::Oldest => "oldest",
        }
    }

    /// The canonical literals, `newest` and `oldest`.
    #[must_use]
    pub fn from_literal(literal: &str) -> Option<Self> {
        match literal {
            "newest" => Some(SortKey::Newest),
            "oldest" => Some(SortKey::Oldest),
            _ => None,
        }
    }
}

const ONGOING_MARKERS: [&str; 3] = ["present", "current", "ongoing"];

/// A comparable point in time for ordering entries.
///
/// `Ongoing` is later than every concrete date. Dates that are missing or
/// can't be parsed collapse to 1970-01-01.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum SortDate {
    At(NaiveDate),
    Ongoing,
}

impl SortDate {
    #[must_use]
    pub fn parse(raw: Option<&str>) -> Self {
        let Some(raw) = raw.map(str::trim) else {
            return SortDate::At(NaiveDate::default());
        };
        if ONGOING_MARKERS
            .iter()
            .any(|marker| raw.eq_ignore_ascii_case(marker))
        {
            return SortDate::Ongoing;
        }
        SortDate::At(parse_date(raw).unwrap_or_default())
    }
}

fn parse_date(raw: &str) -> Option<NaiveDate> {
    if let Ok(datetime) = DateTime::parse_from_rfc3339(raw) {
        return Some(datetime.with_timezone(&Utc).date_naive());
    }

    for format in ["%Y-%m-%d", "%Y/%m/%d"] {
        if let Ok(date) = NaiveDate::parse_from_str(raw, format) {
            return Some(date);
        }
    }

    // Month precision: pin to the first of the month. `%B` takes both
    // `Jan` and `January`.
    let first_of = format!("1 {raw}");
    for format in ["%d %Y-%m", "%d %Y/%m", "%d %B %Y"] {
        if let Ok(date) = NaiveDate::parse_from_str(&first_of, format) {
            return Some(date);
        }
    }

    if raw.len() == 4 && raw.bytes().all(|b| b.is_ascii_digit()) {
        return NaiveDate::from_ymd_opt(raw.parse().ok()?, 1, 1);
    }

    None
}

/// Orders `entries` by their date under `key`, newest or oldest first.
///
/// Equal dates fall back to [`collate::compare`] on the entry labels, and
/// anything still equal keeps its input order.
#[must_use]
pub fn sort<'a, E: Entry>(entries: &[&'a E], key: SortKey) -> Vec<&'a E> {
    let mut keyed = entries
        .iter()
        .map(|entry| (SortDate::parse(entry.sort_date(key)), *entry))
        .collect::<Vec<_>>();

    keyed.sort_by(|(f_date, f), (g_date, g)| {
        let by_date = match key {
            SortKey::Newest => g_date.cmp(f_date),
            SortKey::Oldest => f_date.cmp(g_date),
        };
        by_date.then_with(|| collate::compare(f.label(), g.label()))
    });

    keyed.into_iter().map(|(_, entry)| entry).collect()
}
