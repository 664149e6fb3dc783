use crate::api::{self, Mode};
use crate::commands::Out;
use crate::model::NewExpense;
use crate::{Config, Result};

/// Validates a new expense and appends it to the transactions tab of the sheet.
///
/// # Arguments
/// - `amount` - A positive amount of at least one cent, `$` and thousands separators are allowed.
/// - `category` - One of the known categories, in any case.
/// - `mood` - One of the purchase types, e.g. `Planned` or `Impulse`.
pub async fn log(
    config: &Config,
    mode: Mode,
    amount: &str,
    category: &str,
    mood: &str,
) -> Result<Out<NewExpense>> {
    let expense = NewExpense::parse(amount, category, mood)?;
    let mut ledger = api::ledger(config, mode).await?;
    ledger.append(&expense).await?;
    let message = format!(
        "Logged {} under {} as {}",
        expense.amount(),
        expense.category(),
        expense.mood()
    );
    Ok(Out::new(message, expense))
}
