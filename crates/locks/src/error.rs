use thiserror::Error;

/// Failures surfaced by lock transitions.
///
/// Expected non-transitions (already locked, cooldown active) are not errors;
/// they are [`crate::machine::TryLockOutcome`] variants, since re-triggering
/// is normal and must stay silent.
#[derive(Debug, Error)]
pub enum LockError {
    #[error("channel {channel_id} is not locked")]
    NotLocked { channel_id: String },

    #[error("requesting actor may not release this lock")]
    Unauthorized,

    #[error("{action} failed: {source}")]
    SideEffect {
        action: &'static str,
        #[source]
        source: anyhow::Error,
    },
}

impl LockError {
    pub(crate) fn side_effect(action: &'static str, source: anyhow::Error) -> Self {
        Self::SideEffect { action, source }
    }
}

pub type Result<T> = std::result::Result<T, LockError>;
