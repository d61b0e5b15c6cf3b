pub mod fix;
pub mod lifecycle_event;
pub mod position_record;

pub use fix::FixSnapshot;
pub use lifecycle_event::LifecycleEvent;
pub use position_record::PositionRecord;
