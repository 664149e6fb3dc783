//! Implements the `Sheet` trait using in-memory data for testing purposes.
//!
//! Note: this is compiled even in the "production" version of this app so that we can run the whole
//! app, top-to-bottom, without using Google Sheets.

use crate::api::{Sheet, TRANSACTIONS};
use crate::Result;
use anyhow::Context;
use std::collections::HashMap;
use std::io::Cursor;
use std::sync::{Mutex, MutexGuard, OnceLock};
use tracing::trace;

/// The contents of an in-memory spreadsheet: tab name to rows.
#[derive(Debug, Clone, Default, Eq, PartialEq)]
pub struct TestSheetState {
    tabs: HashMap<String, Vec<Vec<String>>>,
}

impl TestSheetState {
    /// The state that every new spreadsheet starts with.
    pub fn seeded() -> Self {
        let mut tabs = HashMap::new();
        tabs.insert(TRANSACTIONS.to_string(), load_csv(TRANSACTION_DATA));
        Self { tabs }
    }

    /// The rows of `tab`, empty if the tab does not exist.
    pub fn rows(&self, tab: &str) -> &[Vec<String>] {
        self.tabs.get(tab).map(Vec::as_slice).unwrap_or_default()
    }

    pub fn set_rows(&mut self, tab: &str, rows: Vec<Vec<String>>) {
        self.tabs.insert(tab.to_string(), rows);
    }
}

/// An implementation of the `Sheet` trait that does not use Google sheets. The data lives for the
/// duration of the process and is shared by every `TestSheet` with the same spreadsheet ID.
///
/// Ranges are only honored down to the tab name. For the transactions tab the stored rows are the
/// data region, without the sheet headers.
pub struct TestSheet {
    spreadsheet_id: String,
}

impl TestSheet {
    /// Create a `TestSheet` for `spreadsheet_id`, seeding it on first use.
    pub fn new(spreadsheet_id: impl Into<String>) -> Self {
        let spreadsheet_id = spreadsheet_id.into();
        states()
            .entry(spreadsheet_id.clone())
            .or_insert_with(TestSheetState::seeded);
        Self { spreadsheet_id }
    }

    /// A copy of the current contents.
    pub fn get_state(&self) -> TestSheetState {
        states()
            .get(&self.spreadsheet_id)
            .cloned()
            .unwrap_or_default()
    }

    /// Replace the contents.
    pub fn set_state(&self, state: TestSheetState) {
        states().insert(self.spreadsheet_id.clone(), state);
    }
}

#[async_trait::async_trait]
impl Sheet for TestSheet {
    async fn get(&mut self, range: &str) -> Result<Vec<Vec<String>>> {
        trace!("get {range} from test sheet {}", self.spreadsheet_id);
        let tab = tab_name(range);
        states()
            .get(&self.spreadsheet_id)
            .and_then(|state| state.tabs.get(tab))
            .cloned()
            .with_context(|| format!("Sheet '{tab}' not found"))
    }

    async fn append(&mut self, range: &str, rows: &[Vec<String>]) -> Result<()> {
        trace!("append {} rows to {range}", rows.len());
        let tab = tab_name(range);
        states()
            .entry(self.spreadsheet_id.clone())
            .or_default()
            .tabs
            .entry(tab.to_string())
            .or_default()
            .extend_from_slice(rows);
        Ok(())
    }
}

fn states() -> MutexGuard<'static, HashMap<String, TestSheetState>> {
    static STATES: OnceLock<Mutex<HashMap<String, TestSheetState>>> = OnceLock::new();
    STATES
        .get_or_init(Default::default)
        .lock()
        .unwrap_or_else(|poisoned| poisoned.into_inner())
}

fn tab_name(range: &str) -> &str {
    range.split('!').next().unwrap_or(range)
}

/// Loads rows from a CSV-formatted string. Every line is a row, there is no header.
fn load_csv(csv_data: &str) -> Vec<Vec<String>> {
    let mut rdr = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_reader(Cursor::new(csv_data.as_bytes()));

    rdr.records()
        .filter_map(|result| result.ok())
        .map(|record| record.iter().map(|field| field.to_string()).collect())
        .collect()
}

/// Seed rows for the transactions tab, columns C through I.
const TRANSACTION_DATA: &str = r##"14.50,Eating Out,Impulse,Afternoon,Friday,1,10/2/2026 12:41:07
82.17,Cooking/Groceries,Planned,Evening,Saturday,1,10/3/2026 18:05:44
6.25,Eating Out,Treat,Morning,Monday,2,10/5/2026 8:12:30
45.00,Going Out,Social,Night,Friday,2,10/9/2026 22:31:02
120.00,Travel/Adventure,Planned,Afternoon,Sunday,2,10/11/2026 15:00:00
19.99,Shopping,Impulse,Evening,Tuesday,3,10/13/2026 19:47:51
38.40,Cooking/Groceries,Necessary,Afternoon,Thursday,3,10/15/2026 16:20:09
"##;
