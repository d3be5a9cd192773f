// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Propgate Contributors

//! Locale handling for page routes.
//!
//! Page paths are locale-prefixed (`/fr/dashboard`); API paths are not.
//! The set of supported locales is closed, with `en` as the default.

/// Supported UI locales.
pub const SUPPORTED_LOCALES: &[&str] = &["en", "fr", "de"];

/// Locale applied when the path carries no recognized prefix.
pub const DEFAULT_LOCALE: &str = "en";

/// Split a request path into its locale and the locale-stripped remainder.
///
/// `/fr/dashboard` → `("fr", "/dashboard")`; `/dashboard` →
/// `("en", "/dashboard")`; a bare `/fr` maps to the locale root `/`.
/// Unrecognized first segments are part of the path, not a locale.
pub fn split_locale(path: &str) -> (&'static str, &str) {
    let trimmed = path.strip_prefix('/').unwrap_or(path);
    let first = trimmed.split('/').next().unwrap_or("");

    for locale in SUPPORTED_LOCALES {
        if first == *locale {
            let stripped = &path[1 + locale.len()..];
            let stripped = if stripped.is_empty() { "/" } else { stripped };
            return (locale, stripped);
        }
    }

    (DEFAULT_LOCALE, path)
}

/// Locale-appropriate login page path.
pub fn login_path(locale: &str) -> String {
    format!("/{locale}/login")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn recognized_prefix_is_stripped() {
        assert_eq!(split_locale("/fr/dashboard"), ("fr", "/dashboard"));
        assert_eq!(split_locale("/de/dashboard/settings"), ("de", "/dashboard/settings"));
        assert_eq!(split_locale("/en/login"), ("en", "/login"));
    }

    #[test]
    fn bare_locale_maps_to_root() {
        assert_eq!(split_locale("/fr"), ("fr", "/"));
    }

    #[test]
    fn missing_prefix_uses_default_locale() {
        assert_eq!(split_locale("/dashboard"), ("en", "/dashboard"));
        assert_eq!(split_locale("/api/properties"), ("en", "/api/properties"));
    }

    #[test]
    fn lookalike_segments_are_not_locales() {
        assert_eq!(split_locale("/fran/dashboard"), ("en", "/fran/dashboard"));
        assert_eq!(split_locale("/es/dashboard"), ("en", "/es/dashboard"));
    }

    #[test]
    fn login_path_is_locale_prefixed() {
        assert_eq!(login_path("fr"), "/fr/login");
        assert_eq!(login_path(DEFAULT_LOCALE), "/en/login");
    }
}
