//! Lifecycle of one avatar streaming session.

mod session;
mod sink;


pub use session::{AvatarSession, AvatarSessionController, SessionSignal, SessionState};
pub use sink::{MemorySink, PlaybackSink};
