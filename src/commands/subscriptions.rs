use crate::commands::Out;
use crate::error::{ErrorType, IntoResult};
use crate::model::Amount;
use crate::subscriptions::Subscriptions;
use crate::{Config, Result};

/// Totals the recurring costs in the subscriptions file.
pub async fn subscriptions(config: &Config) -> Result<Out<Subscriptions>> {
    let source = config.subscriptions_source().pub_result(ErrorType::Config)?;
    let text = source.fetch_text().await?;
    let subscriptions = Subscriptions::parse(&text);
    let message = format!(
        "{} active subscriptions cost {} per month and {} per year",
        subscriptions.counts.active,
        Amount::new(subscriptions.monthly_total),
        Amount::new(subscriptions.yearly_total)
    );
    Ok(Out::new(message, subscriptions))
}
