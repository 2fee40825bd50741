use std::time::{Duration, Instant};

const ERROR_TTL: Duration = Duration::from_secs(5);
const SUCCESS_TTL: Duration = Duration::from_secs(3);
const INFO_TTL: Duration = Duration::from_secs(4);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MessageKind {
    Error,
    Success,
    Info,
}

/// The single status message under the input box. Showing a new one replaces
/// the old one; each hides itself after a kind-specific delay.
#[derive(Debug, Clone)]
pub struct StatusMessage {
    pub kind: MessageKind,
    pub text: String,
    expires_at: Instant,
}

impl StatusMessage {
    pub fn new(kind: MessageKind, text: impl Into<String>, now: Instant) -> Self {
        let ttl = match kind {
            MessageKind::Error => ERROR_TTL,
            MessageKind::Success => SUCCESS_TTL,
            MessageKind::Info => INFO_TTL,
        };
        Self {
            kind,
            text: text.into(),
            expires_at: now + ttl,
        }
    }

    pub fn error(text: impl Into<String>) -> Self {
        Self::new(MessageKind::Error, text, Instant::now())
    }

    pub fn success(text: impl Into<String>) -> Self {
        Self::new(MessageKind::Success, text, Instant::now())
    }

    pub fn info(text: impl Into<String>) -> Self {
        Self::new(MessageKind::Info, text, Instant::now())
    }

    pub fn is_expired(&self, now: Instant) -> bool {
        now >= self.expires_at
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn errors_outlive_successes() {
        let t0 = Instant::now();
        let err = StatusMessage::new(MessageKind::Error, "x", t0);
        let ok = StatusMessage::new(MessageKind::Success, "y", t0);

        let at_4s = t0 + Duration::from_secs(4);
        assert!(!err.is_expired(at_4s));
        assert!(ok.is_expired(at_4s));
        assert!(err.is_expired(t0 + Duration::from_secs(5)));
        assert!(!ok.is_expired(t0 + Duration::from_millis(2_999)));
    }
}
