// ==========================================
// Internationalization (i18n)
// ==========================================
// rust-i18n, locales: en (default), zh-CN
// The rust_i18n::i18n! macro is initialized in lib.rs
// ==========================================

/// Locales shipped in `locales/`
pub const SUPPORTED_LOCALES: [&str; 2] = ["en", "zh-CN"];

pub fn current_locale() -> String {
    rust_i18n::locale().to_string()
}

/// Switch the process-wide locale
///
/// # Arguments
/// - locale: "en" or "zh-CN"; anything else falls back to "en"
pub fn set_locale(locale: &str) {
    if SUPPORTED_LOCALES.contains(&locale) {
        rust_i18n::set_locale(locale);
    } else {
        tracing::warn!(locale, "unsupported locale, using en");
        rust_i18n::set_locale("en");
    }
}

/// Translate a key
///
/// # Example
/// ```no_run
/// use ptm_upload_validator::i18n::t;
/// let title = t("report.errors");
/// ```
pub fn t(key: &str) -> String {
    rust_i18n::t!(key).to_string()
}

/// Translate a key and fill `%{name}` placeholders
///
/// # Example
/// ```no_run
/// use ptm_upload_validator::i18n::t_with_args;
/// let line = t_with_args("report.title", &[("file", "ptm.csv")]);
/// ```
pub fn t_with_args(key: &str, args: &[(&str, &str)]) -> String {
    let mut result = rust_i18n::t!(key).to_string();
    for (k, v) in args {
        let placeholder = format!("%{{{}}}", k);
        result = result.replace(&placeholder, v);
    }
    result
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use std::sync::Mutex;

    // the locale is process-wide and tests run in parallel
    pub(crate) static LOCALE_TEST_LOCK: Mutex<()> = Mutex::new(());

    #[test]
    fn test_set_locale() {
        let _guard = LOCALE_TEST_LOCK.lock().unwrap();
        set_locale("zh-CN");
        assert_eq!(current_locale(), "zh-CN");

        set_locale("fr");
        assert_eq!(current_locale(), "en");
    }

    #[test]
    fn test_translate_with_args() {
        let _guard = LOCALE_TEST_LOCK.lock().unwrap();
        set_locale("en");
        let msg = t_with_args("report.title", &[("file", "ptm.csv")]);
        assert!(msg.contains("ptm.csv"));
        assert!(msg.contains("Validation report"));

        set_locale("zh-CN");
        let msg = t_with_args("report.title", &[("file", "ptm.csv")]);
        assert!(msg.contains("ptm.csv"));
        assert!(msg.contains("校验报告"));

        set_locale("en");
    }
}
