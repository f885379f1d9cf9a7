use serde::{Deserialize, Serialize};

use crate::errors::{Result, SeriesError};

/// Ordered (timestamp, value) pairs with a strictly increasing index.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(
    try_from = "SeriesPayload<K>",
    bound(deserialize = "K: Ord + Deserialize<'de>")
)]
pub struct TimeSeries<K> {
    index: Vec<K>,
    values: Vec<f64>,
}

/// Wire shape of a single series: parallel `index` and `values` arrays.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SeriesPayload<K> {
    pub index: Vec<K>,
    pub values: Vec<f64>,
}

impl<K: Ord> TryFrom<SeriesPayload<K>> for TimeSeries<K> {
    type Error = SeriesError;

    fn try_from(p: SeriesPayload<K>) -> Result<Self> {
        TimeSeries::new(p.index, p.values)
    }
}

impl<K: Ord> TimeSeries<K> {
    pub fn new(index: Vec<K>, values: Vec<f64>) -> Result<Self> {
        if index.len() != values.len() {
            return Err(SeriesError::LengthMismatch { index: index.len(), values: values.len() });
        }
        if let Some(pos) = index.windows(2).position(|w| w[0] >= w[1]) {
            return Err(SeriesError::UnorderedIndex(pos + 1));
        }
        Ok(TimeSeries { index, values })
    }

    /// Position of `ts` in the index, by binary search.
    pub fn position_of(&self, ts: &K) -> Option<usize> {
        self.index.binary_search(ts).ok()
    }
}

impl TimeSeries<usize> {
    /// Series indexed by position `0..values.len()`.
    pub fn from_values(values: Vec<f64>) -> Self {
        TimeSeries { index: (0..values.len()).collect(), values }
    }
}

impl<K> TimeSeries<K> {
    pub fn empty() -> Self {
        TimeSeries { index: Vec::new(), values: Vec::new() }
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn index(&self) -> &[K] {
        &self.index
    }

    pub fn values(&self) -> &[f64] {
        &self.values
    }

    pub fn get(&self, pos: usize) -> Option<(&K, f64)> {
        Some((self.index.get(pos)?, *self.values.get(pos)?))
    }

    pub fn first(&self) -> Option<(&K, f64)> {
        self.get(0)
    }

    pub fn last(&self) -> Option<(&K, f64)> {
        self.get(self.len().checked_sub(1)?)
    }

    /// Mutable access to the values; the index stays fixed.
    pub fn values_mut(&mut self) -> &mut [f64] {
        &mut self.values
    }
}

impl<K: Clone> TimeSeries<K> {
    /// Copy of positions `start..=end`. Panics if `end` is out of range.
    pub fn slice(&self, start: usize, end: usize) -> TimeSeries<K> {
        TimeSeries {
            index: self.index[start..=end].to_vec(),
            values: self.values[start..=end].to_vec(),
        }
    }
}

/// A named column of a [`Table`].
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Column<K> {
    pub name: String,
    pub series: TimeSeries<K>,
}

/// Ordered collection of named series. Column order is insertion order.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Table<K> {
    columns: Vec<Column<K>>,
}

impl<K> Default for Table<K> {
    fn default() -> Self {
        Table { columns: Vec::new() }
    }
}

impl<K> Table<K> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push_column(&mut self, name: impl Into<String>, series: TimeSeries<K>) -> Result<()> {
        let name = name.into();
        if self.columns.iter().any(|c| c.name == name) {
            return Err(SeriesError::DuplicateColumn(name));
        }
        self.columns.push(Column { name, series });
        Ok(())
    }

    pub fn with_column(mut self, name: impl Into<String>, series: TimeSeries<K>) -> Result<Self> {
        self.push_column(name, series)?;
        Ok(self)
    }

    pub fn columns(&self) -> &[Column<K>] {
        &self.columns
    }

    pub fn names(&self) -> impl Iterator<Item = &str> + '_ {
        self.columns.iter().map(|c| c.name.as_str())
    }

    pub fn len(&self) -> usize {
        self.columns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ColumnPayload {
    pub name: String,
    pub values: Vec<f64>,
}

/// Data-frame shaped payload: one shared index, columns in order.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FramePayload<K> {
    pub index: Vec<K>,
    pub columns: Vec<ColumnPayload>,
}

impl<K: Ord + Clone> TryFrom<FramePayload<K>> for Table<K> {
    type Error = SeriesError;

    fn try_from(frame: FramePayload<K>) -> Result<Self> {
        let mut table = Table::new();
        for col in frame.columns {
            let series = TimeSeries::new(frame.index.clone(), col.values)?;
            table.push_column(col.name, series)?;
        }
        Ok(table)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    #[test]
    fn test_new_rejects_unordered_index() {
        let res = TimeSeries::new(vec![1, 3, 2], vec![0.0, 1.0, 2.0]);
        assert_eq!(res.unwrap_err(), SeriesError::UnorderedIndex(2));
        let res = TimeSeries::new(vec![1, 1], vec![0.0, 1.0]);
        assert_eq!(res.unwrap_err(), SeriesError::UnorderedIndex(1));
    }

    #[test]
    fn test_new_rejects_length_mismatch() {
        let res = TimeSeries::new(vec![1, 2], vec![0.0]);
        assert!(matches!(res, Err(SeriesError::LengthMismatch { index: 2, values: 1 })));
    }

    #[test]
    fn test_slice_is_inclusive() {
        let s = TimeSeries::from_values(vec![0.0, 1.0, 2.0, 3.0]);
        let sl = s.slice(1, 2);
        assert_eq!(sl.index(), &[1, 2]);
        assert_eq!(sl.values(), &[1.0, 2.0]);
        assert_eq!(s.position_of(&3), Some(3));
        assert_eq!(s.last(), Some((&3, 3.0)));
    }

    #[test]
    fn test_series_deserialize_validates() {
        let ok: TimeSeries<NaiveDate> =
            serde_json::from_str(r#"{"index":["2020-12-14","2020-12-15"],"values":[0.0,1.0]}"#).unwrap();
        assert_eq!(ok.len(), 2);
        let bad = serde_json::from_str::<TimeSeries<NaiveDate>>(
            r#"{"index":["2020-12-15","2020-12-14"],"values":[0.0,1.0]}"#,
        );
        assert!(bad.is_err());
    }

    #[test]
    fn test_frame_payload_keeps_column_order() {
        let frame = FramePayload {
            index: vec![1, 2],
            columns: vec![
                ColumnPayload { name: "b".into(), values: vec![1.0, 0.0] },
                ColumnPayload { name: "a".into(), values: vec![0.0, 1.0] },
            ],
        };
        let table = Table::try_from(frame).unwrap();
        assert_eq!(table.names().collect::<Vec<_>>(), vec!["b", "a"]);
    }

    #[test]
    fn test_duplicate_column_rejected() {
        let s = TimeSeries::from_values(vec![1.0]);
        let res = Table::new().with_column("x", s.clone()).unwrap().with_column("x", s);
        assert_eq!(res.unwrap_err(), SeriesError::DuplicateColumn("x".into()));
    }
}
