use serde::{Deserialize, Serialize};

/// The purchase type (or mood) an expense was logged with.
#[derive(
    Debug, Default, Clone, Copy, Eq, PartialEq, Ord, PartialOrd, Hash, Serialize, Deserialize,
)]
pub enum Mood {
    #[default]
    Planned,
    Impulse,
    Social,
    Necessary,
    Treat,
    Family,
}

serde_plain::derive_display_from_serialize!(Mood);
serde_plain::derive_fromstr_from_deserialize!(Mood);

impl Mood {
    pub const ALL: [Mood; 6] = [
        Mood::Planned,
        Mood::Impulse,
        Mood::Social,
        Mood::Necessary,
        Mood::Treat,
        Mood::Family,
    ];

    /// Matches a mood ignoring case. `Impulsive` was used before `Impulse`.
    pub fn normalize(raw: &str) -> Option<Mood> {
        let raw = raw.trim();
        if raw.eq_ignore_ascii_case("impulsive") {
            return Some(Mood::Impulse);
        }
        Self::ALL
            .into_iter()
            .find(|m| m.to_string().eq_ignore_ascii_case(raw))
    }
}
