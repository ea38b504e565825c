use crate::error::CookmanError;
use crate::manager::SaveOutcome;
use crate::scope::ScopeLevel;
use fluent_templates::fluent_bundle::FluentValue;
use fluent_templates::{static_loader, Loader};
use std::collections::HashMap;
use unic_langid::LanguageIdentifier;

static_loader! {
    static LOCALES = {
        locales: "locales",
        fallback_language: "en-US",
    };
}

/// User-facing message for an error, in the environment's language.
pub fn localize_error(err: &CookmanError) -> String {
    let langid = resolve_language();
    match err {
        CookmanError::Validation(detail) => message_with_detail(&langid, "error-validation", detail),
        CookmanError::Store(detail) => message_with_detail(&langid, "error-store", detail),
        CookmanError::EditInProgress => LOCALES.lookup(&langid, "error-edit-in-progress"),
        CookmanError::TabLookup(detail) => message_with_detail(&langid, "error-tab-lookup", detail),
        CookmanError::InvalidUrl(detail) => {
            message_with_detail(&langid, "error-invalid-url", &detail.to_string())
        }
        CookmanError::Json(detail) => message_with_detail(&langid, "error-json", &detail.to_string()),
    }
}

/// Selector description for a scope level.
pub fn scope_description(level: ScopeLevel) -> String {
    let key = match level {
        ScopeLevel::Current => "scope-current",
        ScopeLevel::Parent => "scope-parent",
        ScopeLevel::Root => "scope-root",
    };
    LOCALES.lookup(&resolve_language(), key)
}

/// Inline message for the degraded scope selector.
pub fn scope_unavailable() -> String {
    LOCALES.lookup(&resolve_language(), "scope-unavailable")
}

/// Toast text after a successful save.
pub fn save_notification(outcome: SaveOutcome) -> String {
    let key = match outcome {
        SaveOutcome::Created => "notify-cookie-added",
        SaveOutcome::Updated => "notify-cookie-updated",
    };
    LOCALES.lookup(&resolve_language(), key)
}

/// Toast text after a delete.
pub fn delete_notification() -> String {
    LOCALES.lookup(&resolve_language(), "notify-cookie-deleted")
}

/// Toast text after a bulk clear of `count` cookies.
pub fn clear_notification(count: usize) -> String {
    let mut args = HashMap::new();
    args.insert("count", FluentValue::from(count));
    LOCALES.lookup_with_args(&resolve_language(), "notify-cleared", &args)
}

fn message_with_detail(langid: &LanguageIdentifier, key: &str, detail: &str) -> String {
    let mut args = HashMap::new();
    args.insert("detail", FluentValue::from(detail));
    LOCALES.lookup_with_args(langid, key, &args)
}

fn resolve_language() -> LanguageIdentifier {
    for key in ["LC_ALL", "LC_MESSAGES", "LANG"] {
        if let Ok(value) = std::env::var(key) {
            if let Some(lang) = normalize_lang(value) {
                if let Ok(langid) = lang.parse::<LanguageIdentifier>() {
                    return langid;
                }
            }
        }
    }
    "en-US".parse().expect("valid fallback language")
}

fn normalize_lang(value: String) -> Option<String> {
    let value = value.trim();
    if value.is_empty() {
        return None;
    }
    let value = value.split('.').next().unwrap_or(value);
    let value = value.replace('_', "-");
    Some(value)
}

#[cfg(test)]
mod tests {
    use super::{
        clear_notification, delete_notification, localize_error, normalize_lang,
        save_notification, scope_description, scope_unavailable,
    };
    use crate::error::CookmanError;
    use crate::manager::SaveOutcome;
    use crate::scope::ScopeLevel;

    #[test]
    fn normalize_lang_trims_and_normalizes() {
        assert_eq!(
            normalize_lang("zh_CN.UTF-8".to_string()),
            Some("zh-CN".to_string())
        );
        assert_eq!(normalize_lang("".to_string()), None);
    }

    #[test]
    fn localize_error_includes_detail() {
        let err = CookmanError::Validation("detail".to_string());
        let message = localize_error(&err);
        assert!(message.contains("detail"));
    }

    #[test]
    fn scope_descriptions_are_nonempty() {
        assert!(!scope_description(ScopeLevel::Current).is_empty());
        assert!(!scope_description(ScopeLevel::Parent).is_empty());
        assert!(!scope_description(ScopeLevel::Root).is_empty());
    }

    #[test]
    fn clear_notification_mentions_count() {
        assert!(clear_notification(7).contains('7'));
    }

    #[test]
    fn notifications_distinguish_created_from_updated() {
        let created = save_notification(SaveOutcome::Created);
        let updated = save_notification(SaveOutcome::Updated);
        assert!(!created.is_empty());
        assert_ne!(created, updated);
        assert!(!delete_notification().is_empty());
        assert!(!scope_unavailable().is_empty());
    }
}
