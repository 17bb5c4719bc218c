//! Selection service
//!
//! Entry point for callers such as the HTTP layer. Owns the injected store,
//! roster and admin authenticator, and serializes every mutating
//! load-check-append-save cycle behind one write guard so the
//! one-selection-per-person-per-week invariant holds for concurrent requests
//! within a process.

use crate::admin::{self, AdminAuthenticator};
use crate::export::{self, ExportFile, ExportFormat};
use crate::ledger;
use crate::record::SelectionRecord;
use crate::roster::Roster;
use crate::store::RecordStore;
use crate::week::{current_week_id, WeekInfo};
use crate::{Error, Result};
use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use std::sync::{Arc, Mutex, MutexGuard};
use tracing::info;

/// Which stored selections to list
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SelectionScope {
    /// Only the week containing `now`
    Current,
    #[default]
    All,
}

pub struct SelectionService {
    store: Arc<dyn RecordStore>,
    roster: Roster,
    authenticator: Arc<dyn AdminAuthenticator>,
    write_guard: Mutex<()>,
}

impl SelectionService {
    pub fn new(
        store: Arc<dyn RecordStore>,
        roster: Roster,
        authenticator: Arc<dyn AdminAuthenticator>,
    ) -> Self {
        Self {
            store,
            roster,
            authenticator,
            write_guard: Mutex::new(()),
        }
    }

    pub fn roster(&self) -> &Roster {
        &self.roster
    }

    pub fn current_week(&self, now: NaiveDateTime) -> WeekInfo {
        WeekInfo::for_date(now.date())
    }

    /// Record `name`'s choice of `day` for the week of `now`
    ///
    /// Input is validated before the store is touched; a duplicate leaves the
    /// store unchanged.
    pub fn submit(&self, name: &str, day: &str, now: NaiveDateTime) -> Result<SelectionRecord> {
        ledger::validate(&self.roster, name, day)?;

        let _guard = self.lock_writes();
        let mut table = self.store.load()?;

        let record = match ledger::submit(&table, &self.roster, name, day, now) {
            Ok(record) => record,
            Err(e @ Error::Duplicate { .. }) => {
                info!("Duplicate selection rejected: {}", e);
                return Err(e);
            }
            Err(e) => return Err(e),
        };

        table.push(record.clone());
        self.store.save(&table)?;

        info!(
            "{} selected {} ({}) for week {}",
            record.name,
            record.day.map(|d| d.as_str()).unwrap_or_default(),
            record
                .wfh_date
                .map(|d| d.to_string())
                .unwrap_or_default(),
            record.week_id
        );
        Ok(record)
    }

    /// Stored selections, optionally limited to the current week
    pub fn selections(&self, scope: SelectionScope, now: NaiveDateTime) -> Result<Vec<SelectionRecord>> {
        let table = self.store.load()?;
        let records = table.records().cloned();

        Ok(match scope {
            SelectionScope::All => records.collect(),
            SelectionScope::Current => {
                let week_id = current_week_id(now.date());
                records.filter(|r| r.week_id == week_id).collect()
            }
        })
    }

    /// Render every stored selection in `format`
    pub fn export(&self, format: ExportFormat, now: NaiveDateTime) -> Result<ExportFile> {
        let table = self.store.load()?;
        let file = export::export(&table, format, now.date())?;
        info!("Exported {} selections as {} ({})", table.len(), format, file.filename);
        Ok(file)
    }

    /// Discard all selections if `credential` is authorized
    pub fn reset(&self, credential: &str) -> Result<()> {
        let _guard = self.lock_writes();
        admin::reset(self.store.as_ref(), self.authenticator.as_ref(), credential)?;
        info!("Admin reset: all selections discarded");
        Ok(())
    }

    fn lock_writes(&self) -> MutexGuard<'_, ()> {
        // The guarded value is (), so a poisoned lock carries no broken state
        self.write_guard
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}
