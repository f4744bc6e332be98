use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Wall-clock time within a single day, minute granularity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TimeOfDay {
    hour: u8,
    minute: u8,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Invalid time of day: {0}")]
pub struct InvalidTime(pub String);

impl TimeOfDay {
    pub const NOON: TimeOfDay = TimeOfDay {
        hour: 12,
        minute: 0,
    };

    pub fn new(hour: u8, minute: u8) -> Result<Self, InvalidTime> {
        if hour > 23 || minute > 59 {
            return Err(InvalidTime(format!("{}:{:02}", hour, minute)));
        }
        Ok(Self { hour, minute })
    }

    /// Whole hour, used by the availability picker.
    pub fn at_hour(hour: u8) -> Result<Self, InvalidTime> {
        Self::new(hour, 0)
    }

    pub fn hour(self) -> u8 {
        self.hour
    }

    pub fn minute(self) -> u8 {
        self.minute
    }

    pub fn minutes_since_midnight(self) -> u32 {
        self.hour as u32 * 60 + self.minute as u32
    }
}

impl FromStr for TimeOfDay {
    type Err = InvalidTime;

    /// Accepts `H:MM` and `HH:MM`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || InvalidTime(s.to_string());

        let (h, m) = s.split_once(':').ok_or_else(invalid)?;
        let digits = |part: &str| !part.is_empty() && part.bytes().all(|b| b.is_ascii_digit());
        if !digits(h) || h.len() > 2 || !digits(m) || m.len() != 2 {
            return Err(invalid());
        }

        let hour: u8 = h.parse().map_err(|_| invalid())?;
        let minute: u8 = m.parse().map_err(|_| invalid())?;
        Self::new(hour, minute).map_err(|_| invalid())
    }
}

impl fmt::Display for TimeOfDay {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:02}:{:02}", self.hour, self.minute)
    }
}

impl Serialize for TimeOfDay {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for TimeOfDay {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_padded_and_unpadded_hours() {
        assert_eq!("08:30".parse::<TimeOfDay>(), TimeOfDay::new(8, 30));
        assert_eq!("8:00".parse::<TimeOfDay>(), TimeOfDay::new(8, 0));
        assert_eq!("21:45".parse::<TimeOfDay>().unwrap().to_string(), "21:45");
    }

    #[test]
    fn rejects_malformed_strings() {
        for raw in ["", "8", "8:0", "24:00", "12:60", "ab:cd", "-1:00", "12:00:00", " 9:00"] {
            assert!(raw.parse::<TimeOfDay>().is_err(), "accepted {:?}", raw);
        }
    }

    #[test]
    fn orders_by_clock() {
        let nine = TimeOfDay::at_hour(9).unwrap();
        let half_nine = TimeOfDay::new(9, 30).unwrap();
        assert!(nine < half_nine);
        assert_eq!(half_nine.minutes_since_midnight(), 570);
    }
}
