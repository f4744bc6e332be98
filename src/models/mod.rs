//! Domain models shared by the services and the HTTP layer.
//! Each file holds one concern; everything is re-exported here so callers can
//! `use crate::models::*`.

pub mod calendar;
pub mod lesson;
pub mod student;
pub mod time_of_day;
pub mod weekday;

pub use self::calendar::*;
pub use self::lesson::*;
pub use self::student::*;
pub use self::time_of_day::*;
pub use self::weekday::*;
