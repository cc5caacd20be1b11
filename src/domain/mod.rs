//! Domain layer - Core business logic and models.
//!
//! Pure logic for the deposit watcher: decoding on-chain values,
//! computing deposit capacity, subscription state, and the
//! localized message table. No I/O happens here (hexagonal
//! architecture inner ring).

pub mod capacity;
pub mod subscription;
pub mod texts;

// Re-export core types for convenience
pub use capacity::{CAPACITY_DIVISOR, DecodeError, compute_capacity, decode_hex};
pub use subscription::{
    ChatId, Language, MenuAction, Subscription, ThresholdError, UserId, parse_threshold,
};
pub use texts::Texts;
