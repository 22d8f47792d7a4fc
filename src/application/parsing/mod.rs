pub mod date_parser;
pub mod recurrence_parser;
pub mod schedule_draft;
pub mod time_parser;

pub use date_parser::parse_date;
pub use recurrence_parser::parse_recurrence_kind;
pub use schedule_draft::ScheduleDraft;
pub use time_parser::parse_clock_time;
