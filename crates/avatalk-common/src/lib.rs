pub mod errors;
pub mod events;
pub mod guard;
pub mod id;
pub mod types;

pub use errors::{ConfigError, SessionError};
pub use events::{EndReason, EventBus, NoticeLevel, UiEvent};
pub use guard::BusyGuard;
pub use id::{new_correlation_id, SessionGeneration};
pub use types::{AvatarQuality, Phase, SpeakMode};
