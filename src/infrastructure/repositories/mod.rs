pub mod memory_schedule_repository;

pub use memory_schedule_repository::MemoryScheduleRepository;
