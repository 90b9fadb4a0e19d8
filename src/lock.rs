#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReleaseReason {
    Completed,
    /// The ceiling elapsed before the timeline completed.
    Ceiling,
    Disposed,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LockState {
    Unlocked,
    Locked,
    Released(ReleaseReason),
}

/// Page interaction lock held while the splash plays.
///
/// Engaged once per mount and released exactly once, by whichever comes
/// first: completion, the ceiling, or teardown.
#[derive(Debug, Clone)]
pub struct InteractionLock {
    ceiling_seconds: f32,
    ceiling_at: f32,
    state: LockState,
}

impl InteractionLock {
    pub fn new(ceiling_seconds: f32) -> Self {
        Self {
            ceiling_seconds,
            ceiling_at: 0.0,
            state: LockState::Unlocked,
        }
    }

    pub fn state(&self) -> LockState {
        self.state
    }

    pub fn is_locked(&self) -> bool {
        self.state == LockState::Locked
    }

    pub fn engage(&mut self, now_seconds: f32) -> bool {
        if self.state != LockState::Unlocked {
            return false;
        }
        self.ceiling_at = now_seconds + self.ceiling_seconds;
        self.state = LockState::Locked;
        true
    }

    pub fn release(&mut self, reason: ReleaseReason) -> bool {
        if !self.is_locked() {
            return false;
        }
        self.state = LockState::Released(reason);
        true
    }

    /// Releases with [`ReleaseReason::Ceiling`] if the ceiling has elapsed.
    pub fn enforce_ceiling(&mut self, now_seconds: f32) -> bool {
        self.is_locked()
            && now_seconds >= self.ceiling_at
            && self.release(ReleaseReason::Ceiling)
    }
}
