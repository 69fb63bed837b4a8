use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    // Interactive input that is not one of y/yes/n/no. The front end re-prompts.
    #[error("You must say yes or no, got {0:?}")]
    InvalidResponse(String),

    // Only totals 12..=20 against dealer cards 2..=11 are decision states.
    // Anything else reaching a policy table is a caller bug.
    #[error(
        "No decision state for player total {player_total}, dealer card {dealer_card}, usable ace {usable_ace}"
    )]
    StateNotFound {
        player_total: u32,
        dealer_card: u32,
        usable_ace: bool,
    },

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
