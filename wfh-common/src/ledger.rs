//! Weekly selection ledger
//!
//! Validates a submission and checks it against a store snapshot. The ledger
//! performs no I/O: the caller appends the returned record and persists it,
//! holding whatever write guard the deployment needs around the whole
//! load-check-append-save sequence.

use crate::record::{SelectionRecord, WfhDay};
use crate::roster::Roster;
use crate::store::Table;
use crate::week::{current_week_id, resolve_wfh_date, week_start};
use crate::{Error, Result};
use chrono::NaiveDateTime;

/// Check `name` against the roster and parse `day`
pub fn validate(roster: &Roster, name: &str, day: &str) -> Result<WfhDay> {
    if !roster.contains(name) {
        return Err(Error::InvalidInput(format!("{:?} is not on the staff roster", name)));
    }
    day.parse()
        .map_err(|e: Error| Error::InvalidInput(e.to_string()))
}

/// Build the record for `name` choosing `day` in the week of `now`
///
/// Fails with `InvalidInput` for an unknown name or day, and with `Duplicate`
/// if the snapshot already holds a record for this person and week.
pub fn submit(
    store_snapshot: &Table,
    roster: &Roster,
    name: &str,
    day: &str,
    now: NaiveDateTime,
) -> Result<SelectionRecord> {
    let day = validate(roster, name, day)?;

    let today = now.date();
    let week_id = current_week_id(today);
    let week_starting = week_start(today);
    let wfh_date = resolve_wfh_date(week_starting, day);

    if store_snapshot.records().any(|r| r.matches(name, &week_id)) {
        return Err(Error::Duplicate {
            name: name.to_string(),
            week_id: week_id.to_string(),
        });
    }

    Ok(SelectionRecord {
        name: name.to_string(),
        week_id,
        week_starting: Some(week_starting),
        day: Some(day),
        wfh_date: Some(wfh_date),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Days, NaiveDate};

    fn tuesday() -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2025, 3, 11)
            .unwrap()
            .and_hms_opt(9, 30, 0)
            .unwrap()
    }

    #[test]
    fn test_submit_thursday_and_friday_dates() {
        let roster = Roster::default();
        let table = Table::empty();
        let monday = NaiveDate::from_ymd_opt(2025, 3, 10).unwrap();

        for name in roster.names() {
            let thu = submit(&table, &roster, name, "Thursday", tuesday()).unwrap();
            assert_eq!(thu.week_starting, Some(monday));
            assert_eq!(thu.wfh_date, Some(monday + Days::new(3)));

            let fri = submit(&table, &roster, name, "Friday", tuesday()).unwrap();
            assert_eq!(fri.wfh_date, Some(monday + Days::new(4)));
        }
    }

    #[test]
    fn test_submit_karabo_scenario() {
        let roster = Roster::default();
        let mut table = Table::empty();

        let record = submit(&table, &roster, "Karabo Kotu", "Thursday", tuesday()).unwrap();
        assert_eq!(record.week_id.as_str(), "2025-11");
        assert_eq!(record.day, Some(WfhDay::Thursday));
        assert_eq!(record.wfh_date, NaiveDate::from_ymd_opt(2025, 3, 13));
        table.push(record);

        let later = tuesday() + Days::new(2);
        let err = submit(&table, &roster, "Karabo Kotu", "Friday", later).unwrap_err();
        match err {
            Error::Duplicate { name, week_id } => {
                assert_eq!(name, "Karabo Kotu");
                assert_eq!(week_id, "2025-11");
            }
            other => panic!("expected Duplicate, got {:?}", other),
        }
        assert_eq!(table.len(), 1);
    }

    #[test]
    fn test_submit_allows_next_week() {
        let roster = Roster::default();
        let mut table = Table::empty();
        table.push(submit(&table, &roster, "Marie Ayaba", "Friday", tuesday()).unwrap());

        let next_week = tuesday() + Days::new(7);
        let record = submit(&table, &roster, "Marie Ayaba", "Friday", next_week).unwrap();
        assert_eq!(record.week_id.as_str(), "2025-12");
    }

    #[test]
    fn test_submit_other_person_same_week() {
        let roster = Roster::default();
        let mut table = Table::empty();
        table.push(submit(&table, &roster, "Marie Ayaba", "Friday", tuesday()).unwrap());
        assert!(submit(&table, &roster, "Olivia Dlamini", "Friday", tuesday()).is_ok());
    }

    #[test]
    fn test_submit_rejects_unknown_name() {
        let err = submit(&Table::empty(), &Roster::default(), "Nobody", "Friday", tuesday())
            .unwrap_err();
        assert!(matches!(err, Error::InvalidInput(_)));
    }

    #[test]
    fn test_submit_rejects_unknown_day() {
        let err = submit(&Table::empty(), &Roster::default(), "Karabo Kotu", "Monday", tuesday())
            .unwrap_err();
        assert!(matches!(err, Error::InvalidInput(_)));
    }

    #[test]
    fn test_legacy_rows_without_week_do_not_block() {
        let csv = "Name,Day\nKarabo Kotu,Thursday\n";
        let table = Table::read_csv(csv.as_bytes()).unwrap();
        assert!(submit(&table, &Roster::default(), "Karabo Kotu", "Friday", tuesday()).is_ok());
    }
}
