use crate::model::Amount;
use serde::{Deserialize, Serialize};

/// Notes containing this phrase (in any case) keep a subscription out of the totals.
pub const EXCLUSION_PHRASE: &str = "not used for calculation";

#[derive(
    Debug, Default, Clone, Copy, Eq, PartialEq, Ord, PartialOrd, Hash, Serialize, Deserialize,
)]
pub enum SubscriptionStatus {
    #[default]
    Active,
    Canceled,
    Done,
}

serde_plain::derive_display_from_serialize!(SubscriptionStatus);
serde_plain::derive_fromstr_from_deserialize!(SubscriptionStatus);

/// When in the month (or year) a subscription is billed.
#[derive(
    Debug, Default, Clone, Copy, Eq, PartialEq, Ord, PartialOrd, Hash, Serialize, Deserialize,
)]
pub enum BillingCycle {
    #[default]
    #[serde(rename = "Monthly-Start")]
    MonthlyStart,
    #[serde(rename = "Monthly-Mid")]
    MonthlyMid,
    #[serde(rename = "Monthly-End")]
    MonthlyEnd,
    Yearly,
}

serde_plain::derive_display_from_serialize!(BillingCycle);
serde_plain::derive_fromstr_from_deserialize!(BillingCycle);

impl BillingCycle {
    pub fn is_yearly(self) -> bool {
        matches!(self, BillingCycle::Yearly)
    }
}

/// The account a subscription is charged to.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Ord, PartialOrd, Hash, Serialize, Deserialize)]
pub enum Bank {
    Navy,
    #[serde(rename = "Apple Card")]
    AppleCard,
    Santander,
    #[serde(rename = "Capital One")]
    CapitalOne,
}

serde_plain::derive_display_from_serialize!(Bank);
serde_plain::derive_fromstr_from_deserialize!(Bank);

/// One row of the subscriptions file.
#[derive(Debug, Clone, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Subscription {
    pub name: String,
    pub status: SubscriptionStatus,
    pub category: String,
    pub cost: Amount,
    pub cycle: BillingCycle,
    /// Day of the month the charge lands on.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bill_date: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bank: Option<Bank>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

impl Subscription {
    /// True when the notes ask for this subscription to be left out of the totals.
    pub fn is_excluded(&self) -> bool {
        self.notes
            .as_deref()
            .is_some_and(|n| n.to_lowercase().contains(EXCLUSION_PHRASE))
    }

    /// True when the subscription contributes to the monthly and yearly totals.
    pub fn counts_toward_totals(&self) -> bool {
        self.status == SubscriptionStatus::Active && !self.is_excluded()
    }
}
