use std::collections::HashMap;

use crate::config::CalendarConfig;

/// Immutable instructor -> color table used when projecting events.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InstructorPalette {
    colors: HashMap<String, String>,
    fallback: String,
}

impl InstructorPalette {
    pub fn new<I, N, C>(entries: I, fallback: impl Into<String>) -> Self
    where
        I: IntoIterator<Item = (N, C)>,
        N: Into<String>,
        C: Into<String>,
    {
        Self {
            colors: entries
                .into_iter()
                .map(|(n, c)| (n.into(), c.into()))
                .collect(),
            fallback: fallback.into(),
        }
    }

    pub fn from_config(config: &CalendarConfig) -> Self {
        Self::new(
            config.instructor_colors.iter().cloned(),
            config.default_color.clone(),
        )
    }

    /// Exact, case-sensitive lookup.
    pub fn color_for(&self, instructor: &str) -> &str {
        self.colors
            .get(instructor)
            .map(String::as_str)
            .unwrap_or(&self.fallback)
    }

    /// Lessons without an instructor get the fallback color.
    pub fn color_for_lesson(&self, instructor: Option<&str>) -> &str {
        match instructor {
            Some(name) => self.color_for(name),
            None => &self.fallback,
        }
    }
}

impl Default for InstructorPalette {
    fn default() -> Self {
        Self::from_config(&crate::config::Config::default().calendar)
    }
}
