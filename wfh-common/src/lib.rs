//! # WFH Common Library
//!
//! Core of the work-from-home selection service:
//! - Selection record types and week resolution
//! - CSV record store with tolerant loading
//! - Selection ledger (one choice per person per week)
//! - CSV, spreadsheet and text export
//! - Admin reset and configuration loading

pub mod admin;
pub mod config;
pub mod error;
pub mod export;
pub mod ledger;
pub mod record;
pub mod roster;
pub mod service;
pub mod store;
pub mod time;
pub mod week;

pub use error::{Error, Result};
pub use record::{SelectionRecord, WeekId, WfhDay};
pub use roster::Roster;
pub use service::{SelectionScope, SelectionService};
pub use store::{CsvRecordStore, MemoryRecordStore, RecordStore, Table};
