//! Dense repository × day matrix built from sparse daily snapshots.

use std::collections::{BTreeMap, BTreeSet};

use chrono::NaiveDate;

use super::fetch::ContributionSnapshot;
use crate::table::TextTable;

/// Header of the entity column.
pub const ENTITY_HEADER: &str = "Repository";

/// Accumulates one [`ContributionSnapshot`] per day.
///
/// Every repository ever seen has an explicit count for every day added so
/// far: a repository first seen on a later day is backfilled with zeroes, and
/// a known repository missing from a day's snapshot gets a zero for that day.
#[derive(Debug, Default, Clone)]
pub struct ContribTabulator {
    contribs: BTreeMap<String, BTreeMap<NaiveDate, u64>>,
    dates: BTreeSet<NaiveDate>,
    totals: BTreeMap<NaiveDate, u64>,
}

impl ContribTabulator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Merge the snapshot for `date`.
    pub fn add(&mut self, date: NaiveDate, mut snapshot: ContributionSnapshot) {
        self.totals.insert(date, snapshot.values().sum());
        for (repo, per_date) in &mut self.contribs {
            per_date.insert(date, snapshot.remove(repo).unwrap_or(0));
        }
        for (new_repo, count) in snapshot {
            let mut per_date: BTreeMap<NaiveDate, u64> =
                self.dates.iter().map(|&old| (old, 0)).collect();
            per_date.insert(date, count);
            self.contribs.insert(new_repo, per_date);
        }
        self.dates.insert(date);
    }

    /// Days added so far, ascending.
    pub fn dates(&self) -> impl Iterator<Item = NaiveDate> + '_ {
        self.dates.iter().copied()
    }

    /// Repositories seen so far, sorted.
    pub fn repositories(&self) -> impl Iterator<Item = &str> {
        self.contribs.keys().map(String::as_str)
    }

    /// Per-day counts for `repo`.
    pub fn counts(&self, repo: &str) -> Option<&BTreeMap<NaiveDate, u64>> {
        self.contribs.get(repo)
    }

    /// Sum of the snapshot passed for each day.
    pub fn daily_totals(&self) -> &BTreeMap<NaiveDate, u64> {
        &self.totals
    }

    pub fn grand_total(&self) -> u64 {
        self.totals.values().sum()
    }

    pub fn is_empty(&self) -> bool {
        self.dates.is_empty()
    }

    /// Build the grid: one column per day plus a `Total` column, one row per
    /// repository plus a `TOTAL` row. Zero cells are left blank.
    pub fn to_table(&self) -> TextTable {
        let headers = std::iter::once(ENTITY_HEADER.to_string())
            .chain(self.dates.iter().map(NaiveDate::to_string))
            .chain(std::iter::once("Total".to_string()));
        let mut table = TextTable::new(headers);

        for (repo, per_date) in &self.contribs {
            let cells = std::iter::once(repo.clone())
                .chain(self.dates.iter().map(|d| blank_zero(per_date.get(d).copied())))
                .chain(std::iter::once(per_date.values().sum::<u64>().to_string()));
            table.push_row(cells);
        }

        let totals = std::iter::once("TOTAL".to_string())
            .chain(self.dates.iter().map(|d| blank_zero(self.totals.get(d).copied())))
            .chain(std::iter::once(self.grand_total().to_string()));
        table.push_row(totals);
        table
    }

    pub fn render(&self) -> String {
        self.to_table().render()
    }
}

fn blank_zero(count: Option<u64>) -> String {
    match count {
        Some(0) | None => String::new(),
        Some(n) => n.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn day(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 3, d).unwrap()
    }

    fn snapshot(entries: &[(&str, u64)]) -> ContributionSnapshot {
        entries.iter().map(|(k, v)| (k.to_string(), *v)).collect()
    }

    #[test]
    fn backfills_new_and_missing_entities() {
        let mut tbl = ContribTabulator::new();
        tbl.add(day(1), snapshot(&[("A", 5)]));
        tbl.add(day(2), snapshot(&[("B", 7)]));

        let a = tbl.counts("A").unwrap();
        assert_eq!(a.get(&day(1)), Some(&5));
        assert_eq!(a.get(&day(2)), Some(&0));
        let b = tbl.counts("B").unwrap();
        assert_eq!(b.get(&day(1)), Some(&0));
        assert_eq!(b.get(&day(2)), Some(&7));
        assert_eq!(
            tbl.daily_totals(),
            &BTreeMap::from([(day(1), 5), (day(2), 7)])
        );
    }

    #[test]
    fn every_row_covers_every_date() {
        let mut tbl = ContribTabulator::new();
        tbl.add(day(1), snapshot(&[("a", 1)]));
        tbl.add(day(2), snapshot(&[]));
        tbl.add(day(3), snapshot(&[("b", 2), ("c", 3)]));
        tbl.add(day(4), snapshot(&[("a", 4)]));

        let dates: Vec<NaiveDate> = tbl.dates().collect();
        assert_eq!(dates, vec![day(1), day(2), day(3), day(4)]);
        for repo in tbl.repositories() {
            let counts = tbl.counts(repo).unwrap();
            let keys: Vec<NaiveDate> = counts.keys().copied().collect();
            assert_eq!(keys, dates, "{repo}");
        }
        assert_eq!(tbl.daily_totals()[&day(2)], 0);
        assert_eq!(tbl.grand_total(), 10);
    }

    #[test]
    fn out_of_order_days_still_backfilled() {
        let mut tbl = ContribTabulator::new();
        tbl.add(day(5), snapshot(&[("a", 1)]));
        tbl.add(day(3), snapshot(&[("b", 2)]));

        assert_eq!(tbl.counts("a").unwrap()[&day(3)], 0);
        assert_eq!(tbl.counts("b").unwrap()[&day(5)], 0);
        assert_eq!(tbl.dates().next(), Some(day(3)));
    }

    #[test]
    fn render_blanks_zero_cells() {
        let mut tbl = ContribTabulator::new();
        tbl.add(day(1), snapshot(&[("org/repo", 5)]));
        tbl.add(day(2), snapshot(&[]));

        let expected = "\
+------------+------------+------------+-------+
| Repository | 2024-03-01 | 2024-03-02 | Total |
+------------+------------+------------+-------+
| org/repo   |          5 |            |     5 |
| TOTAL      |          5 |            |     5 |
+------------+------------+------------+-------+";
        assert_eq!(tbl.render(), expected);
    }

    #[test]
    fn render_is_idempotent() {
        let mut tbl = ContribTabulator::new();
        tbl.add(day(1), snapshot(&[("x", 3), ("y", 1)]));
        tbl.add(day(2), snapshot(&[("y", 2)]));
        let first = tbl.render();
        assert_eq!(first, tbl.render());
        assert_eq!(first, tbl.render());
    }

    #[test]
    fn render_empty_tabulator_has_total_row_only() {
        let tbl = ContribTabulator::new();
        assert!(tbl.is_empty());
        let expected = "\
+------------+-------+
| Repository | Total |
+------------+-------+
| TOTAL      |     0 |
+------------+-------+";
        assert_eq!(tbl.render(), expected);
    }

    #[test]
    fn rows_sorted_by_repository() {
        let mut tbl = ContribTabulator::new();
        tbl.add(day(1), snapshot(&[("zeta/z", 1), ("alpha/a", 1), ("mid/m", 1)]));
        let rendered = tbl.render();
        let names: Vec<&str> = rendered
            .lines()
            .skip(3)
            .filter_map(|l| l.split('|').nth(1))
            .map(str::trim)
            .collect();
        assert_eq!(names, vec!["alpha/a", "mid/m", "zeta/z", "TOTAL"]);
    }
}
