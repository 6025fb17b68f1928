use std::fmt::{Display, Formatter, Result as FmtResult};

/// Identity of one conferencing participant producing audio.
#[derive(Clone, Copy, Debug, Default, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub struct SpeakerId(pub u64);

impl Display for SpeakerId {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        Display::fmt(&self.0, f)
    }
}

impl From<u64> for SpeakerId {
    fn from(id: u64) -> Self {
        Self(id)
    }
}
