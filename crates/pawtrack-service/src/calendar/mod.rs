pub mod aggregate;
pub mod item;

pub use aggregate::{CalendarAggregator, CalendarPage, CalendarQuery, CalendarStats};
pub use item::CalendarItem;
