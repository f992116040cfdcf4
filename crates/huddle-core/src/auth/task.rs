//! In-flight request tracking.
//!
//! Every remote submission gets a fresh `RequestToken`. A response is applied
//! only while its token is still the active one; anything else is stale.

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct RequestToken(pub u64);

#[derive(Debug, Default)]
pub struct RequestSeq {
    next: u64,
}

impl RequestSeq {
    pub fn next_token(&mut self) -> RequestToken {
        let token = RequestToken(self.next);
        self.next = self.next.wrapping_add(1);
        token
    }
}

/// Request lifecycle for one form instance (mutated only by the controller).
#[derive(Debug, Default, Clone)]
pub struct InFlight {
    active: Option<RequestToken>,
}

impl InFlight {
    pub fn is_running(&self) -> bool {
        self.active.is_some()
    }

    /// Marks `token` as the active request, superseding any previous one.
    pub fn on_started(&mut self, token: RequestToken) {
        self.active = Some(token);
    }

    /// Clears the slot if `token` is active. Returns false for stale tokens.
    pub fn finish_if_active(&mut self, token: RequestToken) -> bool {
        let ok = self.active == Some(token);
        if ok {
            self.active = None;
        }
        ok
    }

    pub fn clear(&mut self) {
        self.active = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tokens_are_unique() {
        let mut seq = RequestSeq::default();
        let a = seq.next_token();
        let b = seq.next_token();
        assert_ne!(a, b);
    }

    #[test]
    fn test_newer_token_supersedes_older() {
        let mut seq = RequestSeq::default();
        let mut slot = InFlight::default();
        let first = seq.next_token();
        slot.on_started(first);
        let second = seq.next_token();
        slot.on_started(second);

        assert!(!slot.finish_if_active(first));
        assert!(slot.is_running());
        assert!(slot.finish_if_active(second));
        assert!(!slot.is_running());
    }

    #[test]
    fn test_cleared_slot_rejects_everything() {
        let mut seq = RequestSeq::default();
        let mut slot = InFlight::default();
        let token = seq.next_token();
        slot.on_started(token);
        slot.clear();
        assert!(!slot.finish_if_active(token));
    }
}
