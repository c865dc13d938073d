use std::collections::BTreeSet;

use crate::table::{year_of, Record};

fn record_year(record: &Record) -> Option<&str> {
    record.date().and_then(year_of)
}

/// Distinct years present in `rows`, ascending.
pub fn years(rows: &[Record]) -> Vec<String> {
    rows.iter()
        .filter_map(record_year)
        .collect::<BTreeSet<_>>()
        .into_iter()
        .map(str::to_string)
        .collect()
}

/// Rows whose date falls in `year`, in input order.
pub fn filter_by_year(rows: &[Record], year: &str) -> Vec<Record> {
    rows.iter()
        .filter(|r| record_year(r) == Some(year))
        .cloned()
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::table::CsvTable;

    fn rows(text: &str) -> Vec<Record> {
        CsvTable::parse(text).unwrap().into_records()
    }

    #[test]
    fn distinct_sorted_years() {
        let rows = rows("\"Date\",\"A\"\n2009-01,1\n2010-05,2\n2009-07,3\n");
        assert_eq!(years(&rows), vec!["2009", "2010"]);
    }

    #[test]
    fn blank_dates_are_ignored() {
        let rows = rows("\"Date\",\"A\"\n,1\n2011-02,2\n2011-03\n");
        assert_eq!(years(&rows), vec!["2011"]);
        assert_eq!(filter_by_year(&rows, "").len(), 0);
    }

    #[test]
    fn filter_keeps_order() {
        let rows = rows("\"Date\",\"A\"\n2009-02,1\n2010-01,2\n2009-01,3\n");
        let picked: Vec<_> = filter_by_year(&rows, "2009")
            .iter()
            .map(|r| r.get("\"A\"").unwrap().to_string())
            .collect();
        assert_eq!(picked, vec!["1", "3"]);
    }

    #[test]
    fn unknown_year_filters_to_nothing() {
        let rows = rows("\"Date\",\"A\"\n2009-02,1\n");
        assert!(filter_by_year(&rows, "1999").is_empty());
    }
}
