use std::fmt;

/// Fixed vocabulary of lifecycle events written to the `events` table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LifecycleEvent {
    SessionInitialize,
    SessionStart,
    SessionEnd,
    FixLost,
    FixFound,
    FixWait,
}

impl LifecycleEvent {
    /// Convert enum → DB string
    pub fn to_db_str(&self) -> &'static str {
        match self {
            LifecycleEvent::SessionInitialize => "SESSION_INITIALIZE",
            LifecycleEvent::SessionStart => "SESSION_START",
            LifecycleEvent::SessionEnd => "SESSION_END",
            LifecycleEvent::FixLost => "FIX_LOST",
            LifecycleEvent::FixFound => "FIX_FOUND",
            LifecycleEvent::FixWait => "FIX_WAIT",
        }
    }

    /// Convert DB string → enum
    pub fn from_db_str(s: &str) -> Option<Self> {
        match s {
            "SESSION_INITIALIZE" => Some(LifecycleEvent::SessionInitialize),
            "SESSION_START" => Some(LifecycleEvent::SessionStart),
            "SESSION_END" => Some(LifecycleEvent::SessionEnd),
            "FIX_LOST" => Some(LifecycleEvent::FixLost),
            "FIX_FOUND" => Some(LifecycleEvent::FixFound),
            "FIX_WAIT" => Some(LifecycleEvent::FixWait),
            _ => None,
        }
    }

    pub fn is_session_end(&self) -> bool {
        matches!(self, LifecycleEvent::SessionEnd)
    }

    /// FIX_WAIT repeats every few seconds while searching, so it is logged quieter.
    pub fn is_noisy(&self) -> bool {
        matches!(self, LifecycleEvent::FixWait)
    }
}

impl fmt::Display for LifecycleEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.to_db_str())
    }
}
