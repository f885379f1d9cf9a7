//! episodes
//!
//! Splits a position quantity series into episodes: contiguous stretches where the
//! position is open. An episode starts where the quantity leaves zero and runs through
//! the point where it returns to zero, inclusive. A position still open at the end of
//! the series yields a final unterminated episode.

use log::debug;
use serde::Serialize;
use series_common::{Table, TimeSeries};

/// One open-to-close stretch of a position series.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Episode<K> {
    series: TimeSeries<K>,
    terminated: bool,
}

impl<K> Episode<K> {
    pub fn series(&self) -> &TimeSeries<K> {
        &self.series
    }

    /// False when the position was still open at the end of the source series.
    pub fn is_terminated(&self) -> bool {
        self.terminated
    }

    pub fn entry(&self) -> &K {
        &self.series.index()[0]
    }

    /// Timestamp of the closing zero, or of the last sample when unterminated.
    pub fn exit(&self) -> &K {
        &self.series.index()[self.series.len() - 1]
    }

    pub fn len(&self) -> usize {
        self.series.len()
    }

    pub fn is_empty(&self) -> bool {
        self.series.is_empty()
    }

    /// Largest absolute quantity held during the episode.
    pub fn peak_abs(&self) -> f64 {
        self.series.values().iter().fold(0.0_f64, |m, v| m.max(v.abs()))
    }
}

// fold state: previous value plus the position of the currently open entry
struct Scan {
    prev: f64,
    open: Option<usize>,
}

/// Segment `series` into episodes, in chronological order.
pub fn segment_series<K: Clone>(series: &TimeSeries<K>) -> Vec<Episode<K>> {
    let mut out = Vec::new();
    let mut scan = Scan { prev: 0.0, open: None };

    for (pos, &qty) in series.values().iter().enumerate() {
        if qty != 0.0 && scan.prev == 0.0 {
            scan.open = Some(pos);
        } else if qty == 0.0 && scan.prev != 0.0 {
            if let Some(entry) = scan.open.take() {
                out.push(Episode { series: series.slice(entry, pos), terminated: true });
            }
        }
        scan.prev = qty;
    }

    if let Some(entry) = scan.open {
        out.push(Episode { series: series.slice(entry, series.len() - 1), terminated: false });
    }
    debug!("segmented {} samples into {} episodes", series.len(), out.len());
    out
}

/// Segment every column of `table`, keeping column order.
pub fn segment_table<K: Clone>(table: &Table<K>) -> Vec<(String, Vec<Episode<K>>)> {
    table
        .columns()
        .iter()
        .map(|c| (c.name.clone(), segment_series(&c.series)))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn days(start: &str, values: &[f64]) -> TimeSeries<NaiveDate> {
        let first = NaiveDate::parse_from_str(start, "%Y-%m-%d").unwrap();
        let index = first.iter_days().take(values.len()).collect();
        TimeSeries::new(index, values.to_vec()).unwrap()
    }

    fn assert_episodes(out: &[Episode<NaiveDate>], expected: &[TimeSeries<NaiveDate>]) {
        assert_eq!(out.len(), expected.len());
        for (e, x) in out.iter().zip(expected) {
            assert_eq!(e.series(), x);
        }
    }

    #[test]
    fn test_single_closed_episode() {
        let s = days("2020-12-14", &[0.0, 1.0, 2.0, 3.0, 0.0]);
        let out = segment_series(&s);
        assert_episodes(&out, &[days("2020-12-15", &[1.0, 2.0, 3.0, 0.0])]);
        assert!(out[0].is_terminated());
    }

    #[test]
    fn test_all_zero_yields_nothing() {
        let s = days("2020-12-14", &[0.0; 5]);
        assert!(segment_series(&s).is_empty());
    }

    #[test]
    fn test_empty_series() {
        let s: TimeSeries<usize> = TimeSeries::empty();
        assert!(segment_series(&s).is_empty());
    }

    #[test]
    fn test_two_episodes() {
        let s = days("2020-12-14", &[0.0, 1.0, 2.0, 0.0, 3.0, 0.0]);
        let out = segment_series(&s);
        assert_episodes(
            &out,
            &[days("2020-12-15", &[1.0, 2.0, 0.0]), days("2020-12-18", &[3.0, 0.0])],
        );
    }

    #[test]
    fn test_open_at_start() {
        let s = days("2020-12-14", &[1.0, 2.0, 0.0, 3.0, 0.0]);
        let out = segment_series(&s);
        assert_episodes(
            &out,
            &[days("2020-12-14", &[1.0, 2.0, 0.0]), days("2020-12-17", &[3.0, 0.0])],
        );
    }

    #[test]
    fn test_open_at_end_is_unterminated() {
        let s = days("2020-12-14", &[0.0, 1.0, 2.0, 0.0, 3.0]);
        let out = segment_series(&s);
        assert_episodes(
            &out,
            &[days("2020-12-15", &[1.0, 2.0, 0.0]), days("2020-12-18", &[3.0])],
        );
        assert!(out[0].is_terminated());
        assert!(!out[1].is_terminated());
        assert_eq!(out[1].entry(), out[1].exit());
    }

    #[test]
    fn test_sign_flip_without_zero_stays_one_episode() {
        let s = TimeSeries::from_values(vec![0.0, 2.0, -2.0, 0.0]);
        let out = segment_series(&s);
        assert_eq!(out.len(), 1);
        assert_eq!(out[0].series().values(), &[2.0, -2.0, 0.0]);
        assert_eq!(out[0].peak_abs(), 2.0);
    }

    #[test]
    fn test_every_nonzero_run_covered_once() {
        let values = vec![0.0, 5.0, 0.0, 0.0, 1.0, 1.0, 0.0, 7.0, 0.0, 2.0];
        let s = TimeSeries::from_values(values.clone());
        let out = segment_series(&s);
        let mut covered = vec![0usize; values.len()];
        for e in &out {
            for &i in e.series().index() {
                covered[i] += 1;
            }
        }
        for (i, v) in values.iter().enumerate() {
            if *v != 0.0 {
                assert_eq!(covered[i], 1, "position {i}");
            }
            assert!(covered[i] <= 1);
        }
        assert_eq!(out.len(), 4);
    }

    #[test]
    fn test_segment_table_keeps_order() {
        let table = Table::new()
            .with_column("000001", days("2020-12-14", &[0.0, 1.0, 2.0, 3.0, 0.0]))
            .unwrap()
            .with_column("000002", days("2020-12-14", &[0.0, 1.0, 0.0, 2.0, 0.0]))
            .unwrap();
        let out = segment_table(&table);
        assert_eq!(out.len(), 2);
        assert_eq!(out[0].0, "000001");
        assert_episodes(&out[0].1, &[days("2020-12-15", &[1.0, 2.0, 3.0, 0.0])]);
        assert_eq!(out[1].0, "000002");
        assert_episodes(
            &out[1].1,
            &[days("2020-12-15", &[1.0, 0.0]), days("2020-12-17", &[2.0, 0.0])],
        );
    }
}
