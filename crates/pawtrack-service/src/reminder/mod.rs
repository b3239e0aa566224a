pub mod lifecycle;

pub use lifecycle::{BatchOutcome, NewReminder, ReminderLifecycle};
