//! Calendar normalization: instants, timezone-local dates, months, and clocks.
//!
//! Every conversion from an absolute instant to a calendar date goes through an
//! explicit `chrono_tz::Tz`. Nothing here reads the host's local timezone.

pub mod clock;
pub mod month;
pub mod timestamp;

pub use clock::{Clock, FixedClock, SystemClock};
pub use month::{MonthBounds, MonthKey};
pub use timestamp::{date_key, local_date, parse_date_key, parse_timestamp, parse_timezone};
