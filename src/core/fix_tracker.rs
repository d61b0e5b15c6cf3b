use crate::models::LifecycleEvent;

/// Absent ticks tolerated (after the loss tick) before a FIX_WAIT reminder.
pub const FIX_WAIT_THRESHOLD: u32 = 5;

/// Result of feeding one tick to the tracker.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TickOutcome {
    pub event: Option<LifecycleEvent>,
    /// A fix is present, so this tick may emit a position record.
    pub record_eligible: bool,
}

/// Debounced fix-presence state machine, evaluated once per tick.
///
/// Starts as if no fix was ever held: the first absent tick reports
/// FIX_LOST straight away.
#[derive(Debug, Default, Clone)]
pub struct FixTracker {
    fix_lost: bool,
    wait_count: u32,
}

impl FixTracker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_fix_lost(&self) -> bool {
        self.fix_lost
    }

    pub fn wait_count(&self) -> u32 {
        self.wait_count
    }

    pub fn observe(&mut self, has_fix: bool) -> TickOutcome {
        if !has_fix {
            let event = if !self.fix_lost {
                self.fix_lost = true;
                self.wait_count = 0;
                Some(LifecycleEvent::FixLost)
            } else {
                self.wait_count += 1;
                if self.wait_count > FIX_WAIT_THRESHOLD {
                    self.wait_count = 0;
                    Some(LifecycleEvent::FixWait)
                } else {
                    None
                }
            };

            return TickOutcome {
                event,
                record_eligible: false,
            };
        }

        let event = if self.fix_lost {
            self.fix_lost = false;
            self.wait_count = 0;
            Some(LifecycleEvent::FixFound)
        } else {
            None
        };

        TickOutcome {
            event,
            record_eligible: true,
        }
    }
}
