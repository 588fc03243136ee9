//! Free-text search for the "jump to month" dialog.
//!
//! Every month in a window of about half a century around today is given a
//! label such as `אלול תשפ״ה`.  Queries and labels are compared after both
//! have been through [`normalize`], so punctuation, spacing and case do not
//! matter.  A query consisting of a single word is taken to be a year, and
//! resolves to the list of that year's months.  Years may also be typed in
//! full, with the thousands letter, as the picker header shows them.

use crate::config::Policy;
use crate::date::{CalendarDate, HebrewMonth};
use crate::engine::CalendarEngine;
use crate::format::{long_year, month_label, month_name, short_year, GERESH, GERSHAYIM};
use crate::months::months_of_year;
use crate::navigation::{step_month, Direction, NavigationError};
use std::cell::OnceCell;
use std::cmp::Ordering;
use std::collections::{HashMap, HashSet};
use thiserror::Error;
use tracing::{debug, trace};

/// How many years before today the index starts
const YEARS_BEFORE_TODAY: i32 = 25;

/// How many months the index covers
const WINDOW_MONTHS: usize = 51 * 13;

static QUOTE_MARKS: &[char] = &[
    GERESH, GERSHAYIM, '\'', '"', '`', '\u{00B4}', '\u{2018}', '\u{2019}', '\u{201C}',
    '\u{201D}',
];

/// Alternative spellings accepted for month names
static MONTH_ALIASES: &[(&str, HebrewMonth)] = &[
    ("חשון", HebrewMonth::Cheshvan),
    ("מרחשון", HebrewMonth::Cheshvan),
    ("מרחשוון", HebrewMonth::Cheshvan),
    ("מר חשון", HebrewMonth::Cheshvan),
    ("מר חשוון", HebrewMonth::Cheshvan),
    ("כסליו", HebrewMonth::Kislev),
    ("אדר ראשון", HebrewMonth::AdarI),
    ("אדר שני", HebrewMonth::AdarII),
    ("איר", HebrewMonth::Iyar),
    ("סיון", HebrewMonth::Sivan),
    ("מנחם אב", HebrewMonth::Av),
];

/// Canonicalize text for comparison: drop quotation marks (Hebrew and
/// ASCII), collapse whitespace runs into single spaces, lowercase, and trim
pub fn normalize(text: &str) -> String {
    let stripped = text
        .chars()
        .filter(|c| !QUOTE_MARKS.contains(c))
        .collect::<String>();
    stripped
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .to_lowercase()
}

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct SearchEntry {
    pub label: String,
    /// First day of the labelled month
    pub anchor: CalendarDate,
}

impl SearchEntry {
    fn new(anchor: CalendarDate) -> SearchEntry {
        SearchEntry {
            label: month_label(anchor.year(), anchor.month()),
            anchor,
        }
    }

    /// The label minus its trailing year
    fn month_part(&self) -> &str {
        self.label
            .rsplit_once(' ')
            .map_or(self.label.as_str(), |(month, _)| month)
    }
}

#[derive(Clone, Debug, Eq, PartialEq)]
pub enum SearchOutcome {
    /// The query named a single month
    Month(SearchEntry),
    /// The query named a year; the caller should offer its months
    Year { year: i32, choices: Vec<SearchEntry> },
}

#[derive(Clone, Debug, Eq, Error, PartialEq)]
pub enum SearchError {
    #[error("search text is empty")]
    EmptyQuery,
    #[error("no month matches {0:?}")]
    NoMatch(String),
    #[error("search index could not be built")]
    Index(#[source] NavigationError),
}

#[derive(Clone, Debug, Eq, PartialEq)]
struct IndexedEntry {
    entry: SearchEntry,
    /// Normalized label
    key: String,
    /// Normalized year part of the label
    year_key: String,
    /// `key` with the year written in full (`אלול התשפה`)
    long_key: String,
    /// `year_key` with the thousands letter (`התשפה`)
    long_year_key: String,
    /// Months since the start of the index
    position: usize,
}

/// Label lookup for the months around today, in chronological order
#[derive(Clone, Debug)]
pub struct SearchIndex {
    entries: Vec<IndexedEntry>,
    order: MonthOrder,
}

impl SearchIndex {
    /// Walk month by month from Tishrei of 25 years before `today`
    pub fn build<E: CalendarEngine + ?Sized>(
        engine: &E,
        today: CalendarDate,
    ) -> Result<SearchIndex, NavigationError> {
        let (min_year, _) = engine.year_range();
        let start_year = (today.year() - YEARS_BEFORE_TODAY).max(min_year);
        let mut month = engine
            .date(start_year, HebrewMonth::Tishrei, 1)
            .map_err(NavigationError::InvalidTarget)?;
        let mut seen = HashSet::new();
        let mut entries = Vec::with_capacity(WINDOW_MONTHS);
        for position in 0..WINDOW_MONTHS {
            let entry = SearchEntry::new(month);
            if seen.insert(entry.label.clone()) {
                let year = long_year(month.year());
                entries.push(IndexedEntry {
                    key: normalize(&entry.label),
                    year_key: normalize(&short_year(month.year())),
                    long_key: normalize(&format!("{} {year}", month_name(month.month()))),
                    long_year_key: normalize(&year),
                    position,
                    entry,
                });
            }
            month = match step_month(engine, month, Direction::Forward) {
                Ok(next) => next,
                Err(NavigationError::OutOfTime) => break,
                Err(e) => return Err(e),
            };
        }
        debug!(entries = entries.len(), start_year, "Built search index");
        Ok(SearchIndex {
            entries,
            order: MonthOrder::default(),
        })
    }

    /// Sort year listings with `order` instead of the default
    pub fn with_month_order(mut self, order: MonthOrder) -> SearchIndex {
        self.order = order;
        self
    }

    pub fn month_order(&self) -> &MonthOrder {
        &self.order
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn entries(&self) -> impl Iterator<Item = &SearchEntry> + '_ {
        self.entries.iter().map(|ie| &ie.entry)
    }

    /// Resolve `text` to a month or, for a one-word query, to a year.
    ///
    /// When `policy` disables past dates, months of the current year before
    /// today's month are not candidates.  Among several matching months the one nearest to
    /// today's month wins, and of two equally near the earlier one.
    pub fn query<E: CalendarEngine + ?Sized>(
        &self,
        engine: &E,
        text: &str,
        today: CalendarDate,
        policy: Policy,
    ) -> Result<SearchOutcome, SearchError> {
        let query = normalize(text);
        if query.is_empty() {
            return Err(SearchError::EmptyQuery);
        }
        let no_match = || SearchError::NoMatch(text.trim().to_owned());
        let candidates = self.candidates(today, policy).collect::<Vec<_>>();
        if let Some(ie) = candidates.iter().find(|ie| ie.is_exactly(&query)) {
            debug!(%query, label = %ie.entry.label, "Exact search match");
            return Ok(SearchOutcome::Month(ie.entry.clone()));
        }
        if !query.contains(' ') {
            let year = self.guess_year(&query, today).ok_or_else(no_match)?;
            let choices = self.months_for_year(engine, year, today, policy);
            if choices.is_empty() {
                return Err(no_match());
            }
            debug!(%query, year, choices = choices.len(), "Year search");
            return Ok(SearchOutcome::Year { year, choices });
        }
        let pivot = self.pivot(today);
        let found = nearest(
            candidates.into_iter().filter(|ie| ie.contains(&query)),
            pivot,
        )
        .ok_or_else(no_match)?;
        debug!(%query, label = %found.entry.label, "Search match");
        Ok(SearchOutcome::Month(found.entry.clone()))
    }

    /// Entries whose label contains `text`, nearest to today first, for
    /// offering as completions while the user types
    pub fn suggestions(
        &self,
        text: &str,
        today: CalendarDate,
        policy: Policy,
    ) -> Vec<&SearchEntry> {
        let query = normalize(text);
        if query.is_empty() {
            return Vec::new();
        }
        let pivot = self.pivot(today);
        let mut found = self
            .candidates(today, policy)
            .filter(|ie| ie.contains(&query))
            .collect::<Vec<_>>();
        found.sort_by_key(|ie| ie.position.abs_diff(pivot));
        trace!(%query, found = found.len(), "Search suggestions");
        found.into_iter().map(|ie| &ie.entry).collect()
    }

    /// Every month of `year` that `policy` lets the user open, in canonical
    /// month order.  Only the current year loses months to
    /// `disable_past_dates`; other years are listed whole.
    pub fn months_for_year<E: CalendarEngine + ?Sized>(
        &self,
        engine: &E,
        year: i32,
        today: CalendarDate,
        policy: Policy,
    ) -> Vec<SearchEntry> {
        let (min_year, max_year) = engine.year_range();
        if !(min_year..=max_year).contains(&year) {
            return Vec::new();
        }
        let mut choices = months_of_year(engine, year)
            .iter()
            .filter_map(|m| engine.date(year, m, 1).ok())
            .filter(|&anchor| !is_hidden(anchor, today, policy))
            .map(SearchEntry::new)
            .collect::<Vec<_>>();
        choices.sort_by(|a, b| self.order.compare(a, b));
        choices
    }

    /// Work out which year a one-word query names.  Numerals of four or more
    /// digits are taken as-is; shorter ones and Hebrew letters are matched
    /// against every year in the index, past or not.
    fn guess_year(&self, query: &str, today: CalendarDate) -> Option<i32> {
        let pivot = self.pivot(today);
        let found = match query.parse::<u32>() {
            Ok(n) if n >= 1000 => return i32::try_from(n).ok(),
            Ok(n) => nearest(
                self.entries
                    .iter()
                    .filter(|ie| ie.entry.anchor.year().unsigned_abs() % 1000 == n),
                pivot,
            ),
            Err(_) => nearest(
                self.entries
                    .iter()
                    .filter(|ie| ie.year_key.contains(query) || ie.long_year_key == query),
                pivot,
            ),
        };
        found.map(|ie| ie.entry.anchor.year())
    }

    fn candidates(
        &self,
        today: CalendarDate,
        policy: Policy,
    ) -> impl Iterator<Item = &IndexedEntry> + '_ {
        self.entries
            .iter()
            .filter(move |ie| !is_hidden(ie.entry.anchor, today, policy))
    }

    /// Position of today's month, or of where it would be
    fn pivot(&self, today: CalendarDate) -> usize {
        let floor = today.first_of_month();
        let i = self.entries.partition_point(|ie| ie.entry.anchor < floor);
        match self.entries.get(i) {
            Some(ie) => ie.position,
            None => self.entries.last().map_or(0, |ie| ie.position + 1),
        }
    }
}

impl IndexedEntry {
    fn is_exactly(&self, query: &str) -> bool {
        self.key == query || self.long_key == query
    }

    fn contains(&self, query: &str) -> bool {
        self.key.contains(query) || self.long_key.contains(query)
    }
}

/// Whether `policy` keeps the month starting at `anchor` out of search
/// results: only months earlier in today's own year are hidden
fn is_hidden(anchor: CalendarDate, today: CalendarDate, policy: Policy) -> bool {
    policy.disable_past_dates && anchor.year() == today.year() && anchor < today.first_of_month()
}

/// The entry nearest to `pivot`; on a tie the earlier entry wins
fn nearest<'a, I>(entries: I, pivot: usize) -> Option<&'a IndexedEntry>
where
    I: IntoIterator<Item = &'a IndexedEntry>,
{
    // `min_by_key` keeps the first of equal minima, and entries arrive in
    // chronological order.
    entries
        .into_iter()
        .min_by_key(|ie| ie.position.abs_diff(pivot))
}

/// Canonical ordering of months by name.
///
/// Labels are ordered by the month they name, Tishrei first, rather than
/// alphabetically.  Names are looked up after [`normalize`]; the standard
/// spellings and a handful of common variants are known, and more can be
/// added with [`MonthOrder::with_alias`].
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct MonthOrder {
    names: HashMap<String, HebrewMonth>,
}

impl MonthOrder {
    pub fn new() -> MonthOrder {
        let mut names = HashMap::new();
        for month in HebrewMonth::ALL {
            names.insert(normalize(month_name(month)), month);
            names.insert(normalize(&month.to_string()), month);
        }
        for &(alias, month) in MONTH_ALIASES {
            names.insert(normalize(alias), month);
        }
        MonthOrder { names }
    }

    pub fn with_alias(mut self, name: &str, month: HebrewMonth) -> MonthOrder {
        self.names.insert(normalize(name), month);
        self
    }

    pub fn month(&self, name: &str) -> Option<HebrewMonth> {
        self.names.get(&normalize(name)).copied()
    }

    /// Compare two entries by the month named in their labels.  Unknown
    /// names sort after known ones; labels break ties.
    pub fn compare(&self, a: &SearchEntry, b: &SearchEntry) -> Ordering {
        let by_month = match (self.month(a.month_part()), self.month(b.month_part())) {
            (Some(x), Some(y)) => x.cmp(&y),
            (Some(_), None) => Ordering::Less,
            (None, Some(_)) => Ordering::Greater,
            (None, None) => Ordering::Equal,
        };
        by_month.then_with(|| a.label.cmp(&b.label))
    }
}

impl Default for MonthOrder {
    fn default() -> MonthOrder {
        MonthOrder::new()
    }
}

/// A [`SearchIndex`] built on first use and kept for the life of the picker
#[derive(Debug, Default)]
pub struct SearchCache {
    index: OnceCell<SearchIndex>,
    order: MonthOrder,
}

impl SearchCache {
    pub fn new() -> SearchCache {
        SearchCache::default()
    }

    /// Build the index with `order` for sorting year listings
    pub fn with_month_order(mut self, order: MonthOrder) -> SearchCache {
        self.order = order;
        self
    }

    /// The index, if it has been built
    pub fn get(&self) -> Option<&SearchIndex> {
        self.index.get()
    }

    pub fn get_or_build<E: CalendarEngine + ?Sized>(
        &self,
        engine: &E,
        today: CalendarDate,
    ) -> Result<&SearchIndex, NavigationError> {
        if let Some(index) = self.index.get() {
            return Ok(index);
        }
        let index = SearchIndex::build(engine, today)?.with_month_order(self.order.clone());
        Ok(self.index.get_or_init(|| index))
    }
}
