pub mod acquisition;
pub mod fix_tracker;
pub mod limiter;

pub use acquisition::{AcquisitionLoop, ExitStatus, LoopOptions, LoopState};
pub use fix_tracker::{FixTracker, TickOutcome};
pub use limiter::{LimitReached, Limits, RunCounters, RuntimeLimiter};
