use crate::api::{Ledger, Sheet, TRANSACTIONS_APPEND_RANGE, TRANSACTIONS_READ_RANGE};
use crate::model::{ExtendedExpenseRecord, NewExpense};
use crate::parse::parse_sheet_rows;
use crate::Result;
use anyhow::Context;
use tracing::{debug, info};

/// Implements `Ledger` on top of any `Sheet`.
pub(super) struct SheetLedger {
    sheet: Box<dyn Sheet>,
}

impl SheetLedger {
    pub(super) fn new(sheet: Box<dyn Sheet>) -> Self {
        Self { sheet }
    }
}

#[async_trait::async_trait]
impl Ledger for SheetLedger {
    async fn fetch_rows(&mut self) -> Result<Vec<ExtendedExpenseRecord>> {
        let rows = self
            .sheet
            .get(TRANSACTIONS_READ_RANGE)
            .await
            .context("Failed to read the transactions tab")?;
        debug!("Received {} rows from the transactions tab", rows.len());
        Ok(parse_sheet_rows(&rows))
    }

    async fn append(&mut self, expense: &NewExpense) -> Result<()> {
        let row = expense.to_row();
        self.sheet
            .append(TRANSACTIONS_APPEND_RANGE, &[row])
            .await
            .context("Failed to append the expense to the transactions tab")?;
        info!(
            "Logged {} for {} ({})",
            expense.amount(),
            expense.category(),
            expense.mood()
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::{TestSheet, TRANSACTIONS};
    use crate::model::Mood;

    #[tokio::test]
    async fn test_fetch_rows_from_seed() {
        let sheet = TestSheet::new("ledger_fetch_rows");
        let mut ledger = SheetLedger::new(Box::new(sheet));
        let rows = ledger.fetch_rows().await.unwrap();
        assert!(!rows.is_empty());
        assert!(rows.iter().all(|r| !r.record.month.is_empty()));
    }

    #[tokio::test]
    async fn test_append() {
        let id = "ledger_append";
        let sheet = TestSheet::new(id);
        let before = sheet.get_state().rows(TRANSACTIONS).len();
        let mut ledger = SheetLedger::new(Box::new(sheet));

        let expense = NewExpense::parse("12.5", "eating out", "impulsive").unwrap();
        ledger.append(&expense).await.unwrap();

        let state = TestSheet::new(id).get_state();
        let rows = state.rows(TRANSACTIONS);
        assert_eq!(rows.len(), before + 1);
        assert_eq!(
            rows.last().unwrap(),
            &vec![
                "12.5".to_string(),
                "Eating Out".to_string(),
                Mood::Impulse.to_string()
            ]
        );
    }
}
