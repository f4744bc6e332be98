/*
User-visible message catalog.

This module provides:
- Embedded EN/HE translations (compile-time embedded JSON).
- `tr` to look up a key in a given language with optional params.
- `t` / `t_with` using the active language chosen at startup (`init_language`).

Usage:
    use crate::i18n;
    let msg = i18n::t("validation.incomplete_draft");
    let msg_with = i18n::t_with("validation.day_not_offered", &[("day", "Friday")]);

Notes:
- Placeholders use single-brace format: `{name}`.
- Default language is `en`. Missing keys fall back to the default language,
  then to the key itself.
*/

use std::collections::HashMap;
use std::sync::OnceLock;

pub const DEFAULT_LANG: &str = "en";

static TRANSLATIONS: OnceLock<HashMap<String, HashMap<String, String>>> = OnceLock::new();
static ACTIVE_LANG: OnceLock<String> = OnceLock::new();

const EN_JSON: &str = r#"
{
  "validation.incomplete_draft": "Please complete all fields.",
  "validation.end_before_start": "End time must be after start time.",
  "validation.no_pending_day": "Select a day before choosing a time.",
  "validation.day_not_offered": "Availability cannot be set for {day}.",
  "validation.window_overlaps": "The selected range overlaps an existing range on {day}.",
  "validation.invalid_time": "Invalid time: {time}",
  "validation.unknown_weekday": "Unknown weekday: {day}",
  "validation.unknown_swim_style": "Unknown swim style: {style}",
  "submission.failed": "Failed to submit student.",
  "submission.in_flight": "A submission is already in progress.",
  "schedule.no_unassigned": "No unassigned students.",
  "schedule.show_more": "Show More",
  "schedule.show_less": "Show Less",
  "schedule.no_instructor": "Unassigned",
  "app.name": "Swim Schedule"
}
"#;

const HE_JSON: &str = r#"
{
  "validation.incomplete_draft": "נא למלא את כל השדות.",
  "validation.end_before_start": "שעת הסיום חייבת להיות אחרי שעת ההתחלה.",
  "validation.no_pending_day": "יש לבחור יום לפני בחירת שעה.",
  "validation.day_not_offered": "לא ניתן להגדיר זמינות ליום {day}.",
  "validation.window_overlaps": "הטווח שנבחר חופף לטווח קיים ביום {day}.",
  "validation.invalid_time": "שעה לא תקינה: {time}",
  "validation.unknown_weekday": "יום לא מוכר: {day}",
  "validation.unknown_swim_style": "סגנון שחייה לא מוכר: {style}",
  "submission.failed": "שליחת התלמיד נכשלה.",
  "submission.in_flight": "שליחה כבר מתבצעת.",
  "schedule.no_unassigned": "אין תלמידים שלא שובצו.",
  "schedule.show_more": "הצג עוד",
  "schedule.show_less": "הצג פחות",
  "schedule.no_instructor": "ללא מדריך",
  "app.name": "מערכת שיעורי שחייה"
}
"#;

/// Initialize translations map (lazy).
fn build_translations() -> HashMap<String, HashMap<String, String>> {
    let mut out: HashMap<String, HashMap<String, String>> = HashMap::new();

    let en_map: HashMap<String, String> = serde_json::from_str(EN_JSON).unwrap_or_else(|e| {
        panic!("failed to parse EN_JSON in i18n module: {}", e);
    });
    out.insert("en".to_string(), en_map);

    let he_map: HashMap<String, String> = serde_json::from_str(HE_JSON).unwrap_or_else(|e| {
        panic!("failed to parse HE_JSON in i18n module: {}", e);
    });
    out.insert("he".to_string(), he_map);

    out
}

/// Returns the global translations map (lang -> (key -> message)).
fn translations() -> &'static HashMap<String, HashMap<String, String>> {
    TRANSLATIONS.get_or_init(build_translations)
}

/// Normalize a language tag into a short, lowercase code (e.g. "he-IL" -> "he").
pub fn normalize_language(lang: &str) -> String {
    lang.split('-').next().unwrap_or(lang).to_lowercase()
}

/// Returns true if the given language code has a catalog.
pub fn is_supported_language(lang: &str) -> bool {
    translations().contains_key(lang)
}

/// Choose the language used by `t` / `t_with`. Only the first call has an effect.
///
/// Returns the language actually in use.
pub fn init_language(lang: &str) -> &'static str {
    let normalized = normalize_language(lang);
    let chosen = if is_supported_language(&normalized) {
        normalized
    } else {
        tracing::warn!(
            "Unsupported UI language '{}', falling back to '{}'",
            lang,
            DEFAULT_LANG
        );
        DEFAULT_LANG.to_string()
    };
    ACTIVE_LANG.get_or_init(|| chosen).as_str()
}

fn active_language() -> &'static str {
    ACTIVE_LANG.get().map(String::as_str).unwrap_or(DEFAULT_LANG)
}

/// Translate a key using an explicit language (or default if None).
///
/// If no translation is found, returns the default language value or the key itself.
pub fn tr(lang: Option<&str>, key: &str, params: Option<&[(&str, &str)]>) -> String {
    let map = translations();

    let desired = lang.unwrap_or(DEFAULT_LANG);

    let val = map
        .get(desired)
        .and_then(|m| m.get(key))
        .cloned()
        .or_else(|| map.get(DEFAULT_LANG).and_then(|m| m.get(key)).cloned())
        .unwrap_or_else(|| key.to_string());

    if let Some(params) = params {
        let mut s = val;
        for (k, v) in params {
            s = s.replace(&format!("{{{}}}", k), v);
        }
        s
    } else {
        val
    }
}

/// Translate using the active language.
pub fn t(key: &str) -> String {
    tr(Some(active_language()), key, None)
}

/// Translate with params using the active language.
pub fn t_with(key: &str, params: &[(&str, &str)]) -> String {
    tr(Some(active_language()), key, Some(params))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tr_basic() {
        let s = tr(Some("en"), "validation.incomplete_draft", None);
        assert_eq!(s, "Please complete all fields.");
    }

    #[test]
    fn test_tr_with_params() {
        let s = tr(
            Some("en"),
            "validation.window_overlaps",
            Some(&[("day", "Monday")]),
        );
        assert!(s.ends_with("on Monday."));
    }

    #[test]
    fn test_fallback_to_default() {
        let s = tr(Some("fr"), "submission.failed", None);
        assert_eq!(s, "Failed to submit student.");
    }

    #[test]
    fn missing_key_returns_key() {
        let k = "non.existent.key";
        assert_eq!(tr(None, k, None), k.to_string());
    }

    #[test]
    fn catalogs_share_keys() {
        let map = translations();
        let en = &map["en"];
        let he = &map["he"];
        for key in en.keys() {
            assert!(he.contains_key(key), "missing he translation for {}", key);
        }
    }

    #[test]
    fn test_normalize_language() {
        assert_eq!(normalize_language("he-IL"), "he");
        assert_eq!(normalize_language("EN-us"), "en");
        assert!(is_supported_language("he"));
        assert!(!is_supported_language("ru"));
    }
}
