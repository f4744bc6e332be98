use chrono::{Datelike, Duration, Local, NaiveDate, NaiveDateTime, NaiveTime};

use crate::models::{TimeOfDay, Weekday};

/// Maps recurring weekly times onto one fixed calendar week so a date-based
/// calendar widget can display them.
///
/// The week is the Sunday-starting week containing `reference`. Unknown
/// weekday names passed to [`map_name`](Self::map_name) yield the current
/// local time instead of an error. That fallback is intentional: the event
/// lands outside the reference week and simply does not show up.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FixedWeekDateMapper {
    reference: NaiveDate,
}

impl Default for FixedWeekDateMapper {
    fn default() -> Self {
        Self {
            reference: NaiveDate::from_ymd_opt(2024, 3, 3).expect("2024-03-03 is a valid date"),
        }
    }
}

impl FixedWeekDateMapper {
    pub fn new(reference: NaiveDate) -> Self {
        Self { reference }
    }

    /// Sunday of the reference week.
    pub fn week_start(&self) -> NaiveDate {
        let back = self.reference.weekday().num_days_from_sunday();
        self.reference - Duration::days(back as i64)
    }

    pub fn map(&self, weekday: Weekday, time: TimeOfDay) -> NaiveDateTime {
        let offset = weekday.num_days_from_sunday() as i64
            - self.reference.weekday().num_days_from_sunday() as i64;
        let date = self.reference + Duration::days(offset);
        // TimeOfDay is always in range
        let time = NaiveTime::from_hms_opt(time.hour() as u32, time.minute() as u32, 0)
            .unwrap_or_default();
        date.and_time(time)
    }

    pub fn map_name(&self, weekday: &str, time: TimeOfDay) -> NaiveDateTime {
        match weekday.parse::<Weekday>() {
            Ok(day) => self.map(day, time),
            Err(_) => {
                tracing::warn!(
                    "Unknown weekday '{}' in reference week mapping; using current time",
                    weekday
                );
                Local::now().naive_local()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn at(h: u8, m: u8) -> TimeOfDay {
        TimeOfDay::new(h, m).unwrap()
    }

    #[test]
    fn maps_every_day_into_the_reference_week_in_order() {
        let mapper = FixedWeekDateMapper::default();
        let start = mapper.week_start();
        assert_eq!(start, NaiveDate::from_ymd_opt(2024, 3, 3).unwrap());

        let mapped: Vec<NaiveDateTime> = Weekday::ALL
            .iter()
            .map(|d| mapper.map(*d, at(10, 15)))
            .collect();

        for pair in mapped.windows(2) {
            assert!(pair[0] < pair[1]);
        }
        for (day, dt) in Weekday::ALL.iter().zip(&mapped) {
            assert_eq!(dt.date() - start, Duration::days(day.num_days_from_sunday() as i64));
            assert_eq!(dt.time(), NaiveTime::from_hms_opt(10, 15, 0).unwrap());
        }
    }

    #[test]
    fn monday_noon_is_march_fourth() {
        let mapper = FixedWeekDateMapper::default();
        let dt = mapper.map(Weekday::Monday, at(12, 0));
        assert_eq!(
            dt,
            NaiveDate::from_ymd_opt(2024, 3, 4)
                .unwrap()
                .and_hms_opt(12, 0, 0)
                .unwrap()
        );
    }

    #[test]
    fn mid_week_reference_still_anchors_on_its_sunday() {
        // Wednesday 2024-03-06 belongs to the same Sunday-starting week
        let mapper = FixedWeekDateMapper::new(NaiveDate::from_ymd_opt(2024, 3, 6).unwrap());
        assert_eq!(
            mapper.map(Weekday::Sunday, at(8, 0)).date(),
            NaiveDate::from_ymd_opt(2024, 3, 3).unwrap()
        );
        assert_eq!(
            mapper.map(Weekday::Saturday, at(8, 0)).date(),
            NaiveDate::from_ymd_opt(2024, 3, 9).unwrap()
        );
    }

    #[test]
    fn unknown_name_falls_back_to_now() {
        let mapper = FixedWeekDateMapper::default();
        let before = Local::now().naive_local();
        let dt = mapper.map_name("Caturday", at(9, 0));
        let after = Local::now().naive_local();
        assert!(dt >= before && dt <= after);
    }

    #[test]
    fn known_name_matches_typed_mapping() {
        let mapper = FixedWeekDateMapper::default();
        assert_eq!(
            mapper.map_name("Thursday", at(17, 30)),
            mapper.map(Weekday::Thursday, at(17, 30))
        );
    }
}
