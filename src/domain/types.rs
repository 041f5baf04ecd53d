//! Shared domain types.
//!
//! The splitting core only ever looks at a handful of fields per record (group
//! identifier, target label, record identity), so the table model is small:
//!
//! - `Dataset`: named fields + loosely typed rows
//! - `DatasetView`: a borrowed dataset, optionally restricted to a row subset
//! - `GroupKey`: canonical, orderable form of a group identifier
//! - `SplitLabel`: the three partitions

use std::collections::HashMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::SplitError;

/// Cell tokens treated as missing when parsing raw text.
const MISSING_TOKENS: [&str; 4] = ["?", "NA", "NULL", "NAN"];

/// A single cell value.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Missing,
    Int(i64),
    Float(f64),
    Text(String),
}

impl Value {
    /// Coerce a raw text cell: missing markers, then integer, then finite float, else text.
    pub fn parse(raw: &str) -> Value {
        let s = raw.trim();
        if s.is_empty() || MISSING_TOKENS.iter().any(|m| s.eq_ignore_ascii_case(m)) {
            return Value::Missing;
        }
        if let Ok(v) = s.parse::<i64>() {
            return Value::Int(v);
        }
        match s.parse::<f64>() {
            Ok(v) if v.is_finite() => Value::Float(v),
            _ => Value::Text(s.to_string()),
        }
    }

    pub fn is_missing(&self) -> bool {
        matches!(self, Value::Missing)
    }

    /// Interpret the value as a binary label.
    pub fn as_binary(&self) -> Option<u8> {
        match self {
            Value::Int(0) => Some(0),
            Value::Int(1) => Some(1),
            Value::Float(v) if *v == 0.0 => Some(0),
            Value::Float(v) if *v == 1.0 => Some(1),
            Value::Text(s) => match s.trim() {
                "0" => Some(0),
                "1" => Some(1),
                _ => None,
            },
            _ => None,
        }
    }

    /// Canonical group identifier, or `None` for missing values.
    ///
    /// Integral floats collapse onto the integer key so `42` and `42.0` name
    /// the same entity group. Text is coerced like `Value::parse` first, so
    /// `Text("42")` matches `Int(42)` too; other text (including missing
    /// markers such as `"NA"`) is kept verbatim.
    pub fn group_key(&self) -> Option<GroupKey> {
        match self {
            Value::Missing => None,
            Value::Int(v) => Some(GroupKey::Int(*v)),
            Value::Float(v) => {
                if v.fract() == 0.0 && *v >= i64::MIN as f64 && *v <= i64::MAX as f64 {
                    Some(GroupKey::Int(*v as i64))
                } else {
                    Some(GroupKey::Text(v.to_string()))
                }
            }
            Value::Text(s) => match Value::parse(s) {
                numeric @ (Value::Int(_) | Value::Float(_)) => numeric.group_key(),
                _ => Some(GroupKey::Text(s.clone())),
            },
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            Value::Text(s) => Some(s),
            _ => None,
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Missing => Ok(()),
            Value::Int(v) => write!(f, "{v}"),
            Value::Float(v) => write!(f, "{v}"),
            Value::Text(s) => write!(f, "{s}"),
        }
    }
}

impl From<i64> for Value {
    fn from(v: i64) -> Self {
        Value::Int(v)
    }
}

impl From<f64> for Value {
    fn from(v: f64) -> Self {
        Value::Float(v)
    }
}

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Value::Text(v.to_string())
    }
}

impl From<String> for Value {
    fn from(v: String) -> Self {
        Value::Text(v)
    }
}

/// Canonical entity-group identifier.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum GroupKey {
    Int(i64),
    Text(String),
}

impl fmt::Display for GroupKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GroupKey::Int(v) => write!(f, "{v}"),
            GroupKey::Text(s) => write!(f, "{s}"),
        }
    }
}

/// The three partitions a dataset is split into.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SplitLabel {
    Train,
    Validation,
    Test,
}

impl SplitLabel {
    pub const ALL: [SplitLabel; 3] = [SplitLabel::Train, SplitLabel::Validation, SplitLabel::Test];

    pub fn name(self) -> &'static str {
        match self {
            SplitLabel::Train => "train",
            SplitLabel::Validation => "validation",
            SplitLabel::Test => "test",
        }
    }
}

impl fmt::Display for SplitLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// In-memory tabular dataset.
///
/// Field names are matched exactly; callers normalize them upstream (see
/// `io::ingest`). Every record has exactly one value per field.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Dataset {
    fields: Vec<String>,
    index: HashMap<String, usize>,
    records: Vec<Vec<Value>>,
}

impl Dataset {
    /// Create an empty dataset with the given field names.
    pub fn new<S: Into<String>>(fields: impl IntoIterator<Item = S>) -> Result<Self, SplitError> {
        let fields: Vec<String> = fields.into_iter().map(Into::into).collect();
        let mut index = HashMap::with_capacity(fields.len());
        for (idx, name) in fields.iter().enumerate() {
            if index.insert(name.clone(), idx).is_some() {
                return Err(SplitError::Configuration(format!("duplicate field name `{name}`")));
            }
        }
        Ok(Self {
            fields,
            index,
            records: Vec::new(),
        })
    }

    /// Create a dataset from field names and complete records.
    pub fn from_records<S: Into<String>>(
        fields: impl IntoIterator<Item = S>,
        records: Vec<Vec<Value>>,
    ) -> Result<Self, SplitError> {
        let mut dataset = Self::new(fields)?;
        dataset.records.reserve(records.len());
        for record in records {
            dataset.push_record(record)?;
        }
        Ok(dataset)
    }

    pub fn push_record(&mut self, record: Vec<Value>) -> Result<(), SplitError> {
        if record.len() != self.fields.len() {
            return Err(SplitError::Configuration(format!(
                "record {} has {} values, expected {}",
                self.records.len(),
                record.len(),
                self.fields.len()
            )));
        }
        self.records.push(record);
        Ok(())
    }

    /// Append a new field, one value per existing record.
    pub fn add_field(&mut self, name: impl Into<String>, values: Vec<Value>) -> Result<(), SplitError> {
        let name = name.into();
        if self.index.contains_key(&name) {
            return Err(SplitError::Configuration(format!("duplicate field name `{name}`")));
        }
        if values.len() != self.records.len() {
            return Err(SplitError::Configuration(format!(
                "field `{name}` has {} values, expected {}",
                values.len(),
                self.records.len()
            )));
        }
        self.index.insert(name.clone(), self.fields.len());
        self.fields.push(name);
        for (record, value) in self.records.iter_mut().zip(values) {
            record.push(value);
        }
        Ok(())
    }

    pub fn fields(&self) -> &[String] {
        &self.fields
    }

    pub fn records(&self) -> &[Vec<Value>] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn has_field(&self, name: &str) -> bool {
        self.index.contains_key(name)
    }

    pub fn field_index(&self, name: &str) -> Option<usize> {
        self.index.get(name).copied()
    }

    /// Column index for `name`, or a `MissingField` error.
    pub fn require_field(&self, name: &str) -> Result<usize, SplitError> {
        self.field_index(name).ok_or_else(|| SplitError::MissingField {
            field: name.to_string(),
        })
    }

    /// All values of one column, in row order.
    pub fn column(&self, name: &str) -> Result<impl Iterator<Item = &Value> + '_, SplitError> {
        let col = self.require_field(name)?;
        Ok(self.records.iter().map(move |r| &r[col]))
    }

    /// Copy out the given rows (in the given order) into a new dataset.
    ///
    /// # Panics
    /// Panics if any index is out of bounds.
    pub fn subset(&self, rows: &[usize]) -> Dataset {
        Dataset {
            fields: self.fields.clone(),
            index: self.index.clone(),
            records: rows.iter().map(|&i| self.records[i].clone()).collect(),
        }
    }

    /// View over every row.
    pub fn view(&self) -> DatasetView<'_> {
        DatasetView {
            dataset: self,
            rows: None,
        }
    }

    /// View restricted to `rows`.
    ///
    /// # Panics
    /// Iterating the view panics if any index is out of bounds.
    pub fn view_rows<'a>(&'a self, rows: &'a [usize]) -> DatasetView<'a> {
        DatasetView {
            dataset: self,
            rows: Some(rows),
        }
    }
}

/// A borrowed dataset, optionally restricted to a subset of rows.
#[derive(Debug, Clone, Copy)]
pub struct DatasetView<'a> {
    dataset: &'a Dataset,
    rows: Option<&'a [usize]>,
}

impl<'a> DatasetView<'a> {
    pub fn dataset(&self) -> &'a Dataset {
        self.dataset
    }

    pub fn len(&self) -> usize {
        self.rows.map_or(self.dataset.len(), <[usize]>::len)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn records(&self) -> Box<dyn Iterator<Item = &'a [Value]> + 'a> {
        let dataset = self.dataset;
        match self.rows {
            Some(rows) => Box::new(rows.iter().map(move |&i| dataset.records[i].as_slice())),
            None => Box::new(dataset.records.iter().map(Vec::as_slice)),
        }
    }

    /// All values of one column within the view.
    pub fn column(&self, name: &str) -> Result<impl Iterator<Item = &'a Value> + 'a, SplitError> {
        let col = self.dataset.require_field(name)?;
        Ok(self.records().map(move |r| &r[col]))
    }
}

impl<'a> From<&'a Dataset> for DatasetView<'a> {
    fn from(dataset: &'a Dataset) -> Self {
        dataset.view()
    }
}

/// One view per partition, as handed to the disjointness reporter.
#[derive(Debug, Clone, Copy)]
pub struct PartitionViews<'a> {
    pub train: DatasetView<'a>,
    pub validation: DatasetView<'a>,
    pub test: DatasetView<'a>,
}

impl<'a> PartitionViews<'a> {
    pub fn new(
        train: impl Into<DatasetView<'a>>,
        validation: impl Into<DatasetView<'a>>,
        test: impl Into<DatasetView<'a>>,
    ) -> Self {
        Self {
            train: train.into(),
            validation: validation.into(),
            test: test.into(),
        }
    }

    pub fn get(&self, label: SplitLabel) -> DatasetView<'a> {
        match label {
            SplitLabel::Train => self.train,
            SplitLabel::Validation => self.validation,
            SplitLabel::Test => self.test,
        }
    }
}
