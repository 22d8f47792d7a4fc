pub mod clock;
pub mod config;
pub mod repositories;

pub use clock::{Clock, FixedClock, SystemClock};
pub use config::EngineConfig;
pub use repositories::MemoryScheduleRepository;
