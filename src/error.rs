use crate::models::MediaKind;
use crate::upload::AssetKind;
use thiserror::Error;

/// Everything that can go wrong during a state transition. All variants are
/// recoverable: the attempted transition is rejected and the store is left
/// untouched.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("access restricted to @vit.edu domains")]
    InvalidEmail,

    #[error("invalid OTP")]
    InvalidCode,

    #[error("no club found assigned to this email")]
    NoClubAssigned,

    #[error("incorrect club access password")]
    WrongClubPassword,

    #[error("incorrect system access password")]
    WrongSystemPassword,

    #[error("current password incorrect")]
    WrongCurrentPassword,

    #[error("new passwords do not match or are empty")]
    PasswordMismatch,

    #[error("registration closed, the deadline has passed")]
    RegistrationClosed,

    #[error("already a member of this club")]
    AlreadyMember,

    #[error("join request already pending")]
    AlreadyRequested,

    #[error("{0} is required")]
    MissingField(&'static str),

    #[error("between 1 and 5 reminders are required")]
    ReminderCount,

    #[error("gallery limit reached for {0}s")]
    GalleryLimit(MediaKind),

    #[error("{kind} is too large: {size} bytes exceeds the {limit} byte limit")]
    OversizedAsset {
        kind: AssetKind,
        size: usize,
        limit: usize,
    },

    #[error("invalid stream url")]
    InvalidStreamUrl,

    #[error("{0} not found")]
    NotFound(&'static str),

    #[error("text generation service unavailable")]
    GenerationUnavailable,

    #[error("session store error: {0}")]
    Persist(#[from] std::io::Error),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

pub type AppResult<T> = Result<T, AppError>;
