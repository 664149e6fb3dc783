use crate::analytics::{merge, Analytics, Forecast, Insights};
use crate::api::{self, Mode, Source};
use crate::commands::Out;
use crate::error::{ErrorType, IntoResult};
use crate::model::{parse_month_label, Amount, ExtendedExpenseRecord};
use crate::parse::{parse_expenses, parse_extended_expenses};
use crate::{Config, Result};
use anyhow::anyhow;
use chrono::NaiveDate;
use tracing::{debug, warn};

/// Builds the spending analytics for the V1 history file.
pub async fn analytics(config: &Config) -> Result<Out<Analytics>> {
    let source = config.history_source().pub_result(ErrorType::Config)?;
    let text = source.fetch_text().await?;
    let analytics = Analytics::new(parse_expenses(&text));
    if analytics.is_empty() {
        return Ok(Out::new(format!("No expense data found in {source}"), analytics));
    }
    let message = format!(
        "Analyzed {} expenses over {} months totaling {}",
        analytics.entries.len(),
        analytics.month_count,
        Amount::new(analytics.grand_total)
    );
    Ok(Out::new(message, analytics))
}

/// Builds the behavioral insights from the live sheet merged with the V2 history.
///
/// # Arguments
/// - `month` - Restricts the insights to one month, given as a label such as `Jan 2026`.
///
/// # Errors
/// - `month` is not a month label
/// - Neither the live sheet nor the V2 history could be read
pub async fn insights(config: &Config, mode: Mode, month: Option<&str>) -> Result<Out<Insights>> {
    let month = month
        .map(|m| {
            parse_month_label(m).ok_or_else(|| anyhow!("'{m}' is not a month like 'Jan 2026'"))
        })
        .transpose()
        .pub_result(ErrorType::Validation)?;

    let mut records = load_behavioral(config, mode).await?;
    if let Some(wanted) = month {
        records.retain(|r| parse_month_label(&r.record.month) == Some(wanted));
    }

    let insights = Insights::new(records);
    let scope = match month {
        Some((year, m)) => m.label(year),
        None => "all months".to_string(),
    };
    if insights.is_empty() {
        return Ok(Out::new(format!("No expense data found for {scope}"), insights));
    }
    let message = format!(
        "Analyzed {} expenses for {scope} totaling {}",
        insights.analytics.entries.len(),
        Amount::new(insights.analytics.grand_total)
    );
    Ok(Out::new(message, insights))
}

/// Projects the current month's spending as of `today`.
pub async fn forecast(config: &Config, mode: Mode, today: NaiveDate) -> Result<Out<Forecast>> {
    let records = load_behavioral(config, mode).await?;
    match Forecast::new(&records, today) {
        None => Ok("No expense data found, nothing to forecast".into()),
        Some(forecast) => {
            let verdict = if forecast.is_overspending {
                "ahead of"
            } else {
                "within"
            };
            let message = format!(
                "{} spending is {verdict} the usual pace, estimated {} by the end of the month",
                forecast.current_month,
                Amount::new(forecast.end_of_month_estimate)
            );
            Ok(Out::new(message, forecast))
        }
    }
}

/// Reads the live sheet and the V2 history concurrently and merges them, with the sheet taking
/// precedence. One failed source is tolerated.
async fn load_behavioral(config: &Config, mode: Mode) -> Result<Vec<ExtendedExpenseRecord>> {
    let source = config.insights_source().pub_result(ErrorType::Config)?;
    let (live, history) = tokio::join!(fetch_live(config, mode), fetch_history(&source));
    match (live, history) {
        (Ok(live), Ok(history)) => {
            debug!(
                "{} live records, {} history records",
                live.len(),
                history.len()
            );
            Ok(merge(live, history))
        }
        (Ok(live), Err(e)) => {
            warn!("Unable to read the history at {source}, using the live sheet only: {e:#}");
            Ok(live)
        }
        (Err(e), Ok(history)) => {
            warn!("Unable to read the live sheet, using the history only: {e:#}");
            Ok(history)
        }
        (Err(live), Err(history)) => Err(anyhow!(
            "Unable to read the live sheet ({live:#}) or the history at {source} ({history:#})"
        ))
        .pub_result(ErrorType::Source),
    }
}

async fn fetch_live(config: &Config, mode: Mode) -> Result<Vec<ExtendedExpenseRecord>> {
    let mut ledger = api::ledger(config, mode).await?;
    ledger.fetch_rows().await
}

async fn fetch_history(source: &Source) -> Result<Vec<ExtendedExpenseRecord>> {
    let text = source.fetch_text().await?;
    Ok(parse_extended_expenses(&text))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::{TestSheetState, TRANSACTIONS};
    use crate::test::TestEnv;
    use rust_decimal::Decimal;
    use std::str::FromStr;

    fn d(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    #[tokio::test]
    async fn test_analytics() {
        let env = TestEnv::new().await;
        let out = analytics(&env.config()).await.unwrap();
        let analytics = out.structure().unwrap();
        assert_eq!(analytics.grand_total, d("175"));
        assert_eq!(analytics.month_count, 2);
        assert!(out.message().contains("$175.00"));
    }

    #[tokio::test]
    async fn test_analytics_missing_source() {
        let env = TestEnv::new().await;
        env.remove_source(&env.config().history_source().unwrap())
            .await;
        assert!(analytics(&env.config()).await.is_err());
    }

    #[tokio::test]
    async fn test_insights_merges_sources() {
        let env = TestEnv::new().await;
        let out = insights(&env.config(), Mode::Test, None).await.unwrap();
        let insights = out.structure().unwrap();
        // seven live rows plus two history rows, the third history row is already live
        assert_eq!(insights.analytics.entries.len(), 9);
        assert_eq!(insights.analytics.grand_total, d("446.31"));
        assert!(insights.top_mood.is_some());
    }

    #[tokio::test]
    async fn test_insights_for_month() {
        let env = TestEnv::new().await;
        let out = insights(&env.config(), Mode::Test, Some("sep 2026"))
            .await
            .unwrap();
        let insights = out.structure().unwrap();
        assert_eq!(insights.analytics.entries.len(), 2);
        assert_eq!(insights.analytics.grand_total, d("120"));
        assert!(out.message().contains("Sep 2026"));

        let e = insights_error(&env, Some("Smarch")).await;
        assert_eq!(crate::error::error_type(&e), Some(ErrorType::Validation));
    }

    async fn insights_error(env: &TestEnv, month: Option<&str>) -> anyhow::Error {
        insights(&env.config(), Mode::Test, month).await.unwrap_err()
    }

    #[tokio::test]
    async fn test_insights_one_source_missing() {
        let env = TestEnv::new().await;
        env.remove_source(&env.config().insights_source().unwrap())
            .await;
        let out = insights(&env.config(), Mode::Test, None).await.unwrap();
        assert_eq!(out.structure().unwrap().analytics.entries.len(), 7);

        // an empty tab still counts as a successful read
        let mut state = TestSheetState::default();
        state.set_rows(TRANSACTIONS, Vec::new());
        env.sheet().set_state(state);
        let out = insights(&env.config(), Mode::Test, None).await.unwrap();
        assert!(out.structure().unwrap().is_empty());
        assert!(out.message().starts_with("No expense data"));
    }

    #[tokio::test]
    async fn test_insights_both_sources_missing() {
        let env = TestEnv::new().await;
        env.remove_source(&env.config().insights_source().unwrap())
            .await;
        env.sheet().set_state(TestSheetState::default());
        let e = insights_error(&env, None).await;
        assert_eq!(crate::error::error_type(&e), Some(ErrorType::Source));
    }

    #[tokio::test]
    async fn test_forecast() {
        let env = TestEnv::new().await;
        let today = NaiveDate::from_ymd_opt(2026, 10, 18).unwrap();
        let out = forecast(&env.config(), Mode::Test, today).await.unwrap();
        let forecast = out.structure().unwrap();
        assert_eq!(forecast.current_month, "Oct 2026");
        assert_eq!(forecast.current_spend, d("326.31"));
        assert_eq!(forecast.historical_monthly_average, d("120"));
        assert!(forecast.is_overspending);
        assert!(out.message().starts_with("Oct 2026 spending is ahead of"));
    }
}
