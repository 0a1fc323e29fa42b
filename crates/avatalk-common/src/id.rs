use serde::{Deserialize, Serialize};
use std::fmt;

/// Short hex id used to correlate the log lines of one user operation.
pub fn new_correlation_id() -> String {
    let uuid = uuid::Uuid::new_v4();
    let bytes = uuid.as_bytes();
    format!(
        "{:02x}{:02x}{:02x}{:02x}",
        bytes[0], bytes[1], bytes[2], bytes[3]
    )
}

/// Epoch of the orchestrator's session lifecycle.
///
/// Bumped every time a session is started; work that began under an
/// older generation must not touch the current state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, Default)]
pub struct SessionGeneration(u64);

impl SessionGeneration {
    pub fn next(self) -> Self {
        Self(self.0.wrapping_add(1))
    }

    pub fn get(self) -> u64 {
        self.0
    }
}

impl fmt::Display for SessionGeneration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn correlation_id_length() {
        let cid = new_correlation_id();
        assert_eq!(cid.len(), 8);
    }

    #[test]
    fn correlation_id_is_hex() {
        let cid = new_correlation_id();
        assert!(cid.chars().all(|c| c.is_ascii_hexdigit()));
    }

    #[test]
    fn generation_starts_at_zero_and_increments() {
        let g = SessionGeneration::default();
        assert_eq!(g.get(), 0);
        let next = g.next();
        assert_eq!(next.get(), 1);
        assert!(next > g);
        assert_ne!(next, g);
    }

    #[test]
    fn generation_display() {
        let g = SessionGeneration::default().next().next();
        assert_eq!(g.to_string(), "2");
    }
}
