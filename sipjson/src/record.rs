// SPDX-License-Identifier: Apache-2.0

use alloc::string::String;
use alloc::vec::Vec;

use crate::field_matcher::lookup;
use crate::{ExtractError, Pattern, Scalar};

/// One extracted object: field names mapped to decoded scalars.
///
/// Fields appear in query order, followed by the classifier field when the
/// query did not list it. Absent or unusable fields hold [`Scalar::Null`].
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Record {
    fields: Vec<(String, Scalar)>,
}

impl Record {
    /// Build a record from the raw text of one closed object.
    pub(crate) fn from_span(span: &[u8], query: &RecordQuery<'_>) -> Self {
        let mut fields: Vec<(String, Scalar)> = query
            .fields()
            .iter()
            .map(|pattern| (String::from(pattern.key()), lookup(span, pattern)))
            .collect();

        if let Some((key, _)) = query.classifier() {
            if !query.fields().iter().any(|p| p.key() == key) {
                fields.push((String::from(key), lookup(span, &Pattern::boolean(key))));
            }
        }

        Self { fields }
    }

    pub fn get(&self, name: &str) -> Option<&Scalar> {
        self.fields
            .iter()
            .find(|(field, _)| field == name)
            .map(|(_, value)| value)
    }

    /// Shorthand for `get(name)?.as_str()`.
    pub fn str(&self, name: &str) -> Option<&str> {
        self.get(name)?.as_str()
    }

    pub fn fields(&self) -> impl Iterator<Item = (&str, &Scalar)> {
        self.fields.iter().map(|(name, value)| (name.as_str(), value))
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Category of this record: `true` only for a literal `true`.
    fn category(&self, key: &str) -> bool {
        self.get(key).and_then(Scalar::as_bool).unwrap_or(false)
    }
}

impl<'a> FromIterator<(&'a str, Scalar)> for Record {
    fn from_iter<I: IntoIterator<Item = (&'a str, Scalar)>>(iter: I) -> Self {
        Self {
            fields: iter
                .into_iter()
                .map(|(name, value)| (String::from(name), value))
                .collect(),
        }
    }
}

/// Per-category record limits for a boolean classifier field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CategoryCaps {
    /// Records whose classifier field is `true` (e.g. daytime periods)
    pub when_true: usize,
    /// Records whose classifier field is `false` or missing
    pub when_false: usize,
}

impl CategoryCaps {
    pub const fn new(when_true: usize, when_false: usize) -> Self {
        Self {
            when_true,
            when_false,
        }
    }
}

/// Accepted-record counts for one session.
#[derive(Debug)]
pub(crate) struct CategoryCounters {
    caps: CategoryCaps,
    accepted_true: usize,
    accepted_false: usize,
}

impl CategoryCounters {
    pub fn new(caps: CategoryCaps) -> Self {
        Self {
            caps,
            accepted_true: 0,
            accepted_false: 0,
        }
    }

    /// Count the record if its category still has room.
    pub fn admit(&mut self, category: bool) -> bool {
        let (count, cap) = if category {
            (&mut self.accepted_true, self.caps.when_true)
        } else {
            (&mut self.accepted_false, self.caps.when_false)
        };
        if *count < cap {
            *count = count.saturating_add(1);
            true
        } else {
            false
        }
    }

    pub fn saturated(&self) -> bool {
        self.accepted_true >= self.caps.when_true && self.accepted_false >= self.caps.when_false
    }
}

/// Describes which records to pull out of a document.
///
/// ```rust
/// use sipjson::{CategoryCaps, Pattern, RecordQuery};
///
/// const PERIOD_FIELDS: [Pattern<'static>; 3] = [
///     Pattern::string("name"),
///     Pattern::number("temperature"),
///     Pattern::string("shortForecast"),
/// ];
///
/// let query = RecordQuery::new("periods", "number", &PERIOD_FIELDS)
///     .classify_by("isDaytime", CategoryCaps::new(7, 3));
/// assert_eq!(query.array_key(), "periods");
/// ```
#[derive(Debug, Clone, Copy)]
pub struct RecordQuery<'q> {
    array_key: &'q str,
    anchor_key: &'q str,
    fields: &'q [Pattern<'q>],
    classifier: Option<(&'q str, CategoryCaps)>,
}

impl<'q> RecordQuery<'q> {
    /// Records are the objects of the `array_key` array; `anchor_key` must
    /// occur exactly once in each of them.
    pub const fn new(array_key: &'q str, anchor_key: &'q str, fields: &'q [Pattern<'q>]) -> Self {
        Self {
            array_key,
            anchor_key,
            fields,
            classifier: None,
        }
    }

    /// Cap records per value of the boolean field `key`.
    ///
    /// Without a classifier every record is accepted until the array or the
    /// stream ends.
    pub const fn classify_by(self, key: &'q str, caps: CategoryCaps) -> Self {
        Self {
            classifier: Some((key, caps)),
            ..self
        }
    }

    pub fn array_key(&self) -> &'q str {
        self.array_key
    }

    pub fn anchor_key(&self) -> &'q str {
        self.anchor_key
    }

    pub fn fields(&self) -> &'q [Pattern<'q>] {
        self.fields
    }

    pub fn classifier(&self) -> Option<(&'q str, CategoryCaps)> {
        self.classifier
    }

    /// Category of `record`, or `None` when the query has no classifier.
    pub(crate) fn category_of(&self, record: &Record) -> Option<bool> {
        self.classifier.map(|(key, _)| record.category(key))
    }
}

/// Why record extraction stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StopReason {
    /// Every category reached its cap.
    CapsReached,
    /// The closing `]` of the record array was reached.
    ArrayEnd,
    /// The stream ended between records.
    EndOfStream,
    /// The stream ended before the record array was found.
    ArrayNotFound,
    /// The stream ended inside a record.
    IncompleteObject,
    /// A record did not fit in the scratch buffer.
    BufferFull,
    /// The reader failed.
    ReaderError,
}

/// Records collected by one extraction, and how it ended.
#[derive(Debug, Clone, PartialEq)]
pub struct RecordBatch {
    pub records: Vec<Record>,
    pub stop: StopReason,
}

impl RecordBatch {
    pub fn into_records(self) -> Vec<Record> {
        self.records
    }

    /// The error behind a degraded stop, if any.
    ///
    /// Reaching the caps, the end of the array or the end of the stream
    /// between records are normal terminations.
    pub fn error(&self) -> Option<ExtractError> {
        match self.stop {
            StopReason::CapsReached | StopReason::ArrayEnd | StopReason::EndOfStream => None,
            StopReason::ArrayNotFound => Some(ExtractError::NotFound),
            StopReason::IncompleteObject => Some(ExtractError::IncompleteObject),
            StopReason::BufferFull => Some(ExtractError::BufferFull),
            StopReason::ReaderError => Some(ExtractError::ReaderError),
        }
    }
}
