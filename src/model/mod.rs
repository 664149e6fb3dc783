//! Types that represent the core data model, such as `ExpenseRecord` and `Subscription`.
mod amount;
mod calendar;
mod category;
mod expense;
mod mood;
mod subscription;

pub use amount::{Amount, AmountError};
pub use calendar::{parse_month_label, parse_timestamp, DayOfWeek, Month, TimeOfDay};
pub use category::{canonical_category, normalize_category, CATEGORIES, OTHER};
pub use expense::{ExpenseRecord, ExtendedExpenseRecord, NewExpense};
pub use mood::Mood;
pub use subscription::{Bank, BillingCycle, Subscription, SubscriptionStatus, EXCLUSION_PHRASE};
