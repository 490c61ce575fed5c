//! Cookie-consent state
//!
//! Tracks which optional cookie categories a visitor has agreed to. The
//! `necessary` category can never be switched off. Consent is persisted
//! through a [`ConsentStorage`] under two keys: a `"true"` marker and the
//! JSON-encoded preferences.

mod storage;

use chrono::Duration;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

pub use storage::{ConsentStorage, FileStorage, MemoryStorage};

use crate::error::Result;

pub const CONSENT_KEY: &str = "perfecxion-cookie-consent";
pub const PREFERENCES_KEY: &str = "perfecxion-cookie-preferences";
pub const CONSENT_DURATION_DAYS: i64 = 365;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CookiePreferences {
    pub necessary: bool,
    pub analytics: bool,
    pub marketing: bool,
    pub functional: bool,
}

impl Default for CookiePreferences {
    fn default() -> Self {
        Self::only_necessary()
    }
}

impl CookiePreferences {
    pub fn all() -> Self {
        Self {
            necessary: true,
            analytics: true,
            marketing: true,
            functional: true,
        }
    }

    pub fn only_necessary() -> Self {
        Self {
            necessary: true,
            analytics: false,
            marketing: false,
            functional: false,
        }
    }

    pub fn allows(&self, category: CookieCategory) -> bool {
        match category {
            CookieCategory::Necessary => true,
            CookieCategory::Analytics => self.analytics,
            CookieCategory::Marketing => self.marketing,
            CookieCategory::Functional => self.functional,
        }
    }
}

/// Partial change to the current preferences
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PreferencesUpdate {
    pub necessary: Option<bool>,
    pub analytics: Option<bool>,
    pub marketing: Option<bool>,
    pub functional: Option<bool>,
}

impl PreferencesUpdate {
    pub fn set(mut self, category: CookieCategory, value: bool) -> Self {
        match category {
            CookieCategory::Necessary => self.necessary = Some(value),
            CookieCategory::Analytics => self.analytics = Some(value),
            CookieCategory::Marketing => self.marketing = Some(value),
            CookieCategory::Functional => self.functional = Some(value),
        }
        self
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CookieCategory {
    Necessary,
    Analytics,
    Marketing,
    Functional,
}

impl CookieCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            CookieCategory::Necessary => "necessary",
            CookieCategory::Analytics => "analytics",
            CookieCategory::Marketing => "marketing",
            CookieCategory::Functional => "functional",
        }
    }
}

impl fmt::Display for CookieCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for CookieCategory {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "necessary" => Ok(CookieCategory::Necessary),
            "analytics" => Ok(CookieCategory::Analytics),
            "marketing" => Ok(CookieCategory::Marketing),
            "functional" => Ok(CookieCategory::Functional),
            other => Err(format!("unknown cookie category: {}", other)),
        }
    }
}

/// Consent state for one visitor, backed by a storage
#[derive(Debug)]
pub struct ConsentManager<S: ConsentStorage> {
    storage: S,
    preferences: CookiePreferences,
    has_consented: bool,
    show_banner: bool,
}

impl<S: ConsentStorage> ConsentManager<S> {
    /// Restore state from storage. Missing or unreadable consent shows the banner.
    pub fn load(storage: S) -> Self {
        let mut manager = Self {
            storage,
            preferences: CookiePreferences::default(),
            has_consented: false,
            show_banner: false,
        };

        match manager.read_saved() {
            Ok(Some(preferences)) => {
                manager.preferences = preferences;
                manager.has_consented = true;
            }
            Ok(None) => manager.show_banner = true,
            Err(e) => {
                tracing::warn!("Error loading cookie consent: {}", e);
                manager.show_banner = true;
            }
        }

        manager
    }

    fn read_saved(&self) -> Result<Option<CookiePreferences>> {
        if self.storage.get(CONSENT_KEY)?.as_deref() != Some("true") {
            return Ok(None);
        }
        let mut preferences = match self.storage.get(PREFERENCES_KEY)? {
            Some(raw) => {
                let update: PreferencesUpdate = serde_json::from_str(&raw)?;
                apply(CookiePreferences::default(), update)
            }
            None => CookiePreferences::default(),
        };
        preferences.necessary = true;
        Ok(Some(preferences))
    }

    pub fn preferences(&self) -> CookiePreferences {
        self.preferences
    }

    pub fn has_consented(&self) -> bool {
        self.has_consented
    }

    pub fn show_banner(&self) -> bool {
        self.show_banner
    }

    pub fn storage(&self) -> &S {
        &self.storage
    }

    /// Change the in-memory preferences; nothing is stored until saved
    pub fn update_preferences(&mut self, update: PreferencesUpdate) {
        self.preferences = apply(self.preferences, update);
    }

    pub fn accept_all(&mut self) -> Result<()> {
        self.preferences = CookiePreferences::all();
        self.save_preferences()
    }

    pub fn reject_all(&mut self) -> Result<()> {
        self.preferences = CookiePreferences::only_necessary();
        self.save_preferences()
    }

    /// Persist the current preferences as given consent
    pub fn save_preferences(&mut self) -> Result<()> {
        let lifetime = Duration::days(CONSENT_DURATION_DAYS);
        let encoded = serde_json::to_string(&self.preferences)?;
        self.storage.set(CONSENT_KEY, "true", lifetime)?;
        self.storage.set(PREFERENCES_KEY, &encoded, lifetime)?;

        tracing::info!(
            analytics = self.preferences.analytics,
            marketing = self.preferences.marketing,
            functional = self.preferences.functional,
            "Cookie preferences updated"
        );

        self.has_consented = true;
        self.show_banner = false;
        Ok(())
    }

    pub fn show_preferences(&mut self) {
        self.show_banner = true;
    }

    /// Forget any stored consent
    pub fn reset(&mut self) -> Result<()> {
        self.storage.remove(CONSENT_KEY)?;
        self.storage.remove(PREFERENCES_KEY)?;
        self.preferences = CookiePreferences::default();
        self.has_consented = false;
        self.show_banner = true;
        tracing::info!("Cookie consent cleared");
        Ok(())
    }

    /// Whether stored preferences allow a category. `necessary` is always
    /// allowed, whatever storage holds; other categories need a stored `true`.
    pub fn is_allowed(&self, category: CookieCategory) -> bool {
        if category == CookieCategory::Necessary {
            return true;
        }
        let stored = match self.storage.get(PREFERENCES_KEY) {
            Ok(Some(raw)) => raw,
            Ok(None) => return false,
            Err(e) => {
                tracing::warn!("Error checking cookie permission: {}", e);
                return false;
            }
        };

        match serde_json::from_str::<serde_json::Value>(&stored) {
            Ok(value) => value.get(category.as_str()) == Some(&serde_json::Value::Bool(true)),
            Err(e) => {
                tracing::warn!("Error checking cookie permission: {}", e);
                false
            }
        }
    }
}

fn apply(mut preferences: CookiePreferences, update: PreferencesUpdate) -> CookiePreferences {
    if let Some(analytics) = update.analytics {
        preferences.analytics = analytics;
    }
    if let Some(marketing) = update.marketing {
        preferences.marketing = marketing;
    }
    if let Some(functional) = update.functional {
        preferences.functional = functional;
    }
    preferences.necessary = true;
    preferences
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fresh_storage_shows_banner() {
        let manager = ConsentManager::load(MemoryStorage::new());
        assert!(manager.show_banner());
        assert!(!manager.has_consented());
        assert_eq!(manager.preferences(), CookiePreferences::only_necessary());
        assert!(manager.is_allowed(CookieCategory::Necessary));
        assert!(!manager.is_allowed(CookieCategory::Analytics));
    }

    #[test]
    fn test_necessary_cannot_be_disabled() {
        let mut manager = ConsentManager::load(MemoryStorage::new());
        manager.update_preferences(PreferencesUpdate {
            necessary: Some(false),
            analytics: Some(true),
            ..Default::default()
        });
        let prefs = manager.preferences();
        assert!(prefs.necessary);
        assert!(prefs.analytics);
        assert!(!prefs.marketing);
    }

    #[test]
    fn test_update_is_not_persisted_until_saved() {
        let mut manager = ConsentManager::load(MemoryStorage::new());
        manager.update_preferences(PreferencesUpdate::default().set(CookieCategory::Marketing, true));
        assert!(!manager.has_consented());
        assert!(!manager.is_allowed(CookieCategory::Marketing));

        manager.save_preferences().unwrap();
        assert!(manager.has_consented());
        assert!(!manager.show_banner());
        assert!(manager.is_allowed(CookieCategory::Marketing));
        assert!(!manager.is_allowed(CookieCategory::Analytics));
    }

    #[test]
    fn test_accept_all_then_reload() {
        let mut manager = ConsentManager::load(MemoryStorage::new());
        manager.accept_all().unwrap();
        assert_eq!(
            manager.storage().get(CONSENT_KEY).unwrap().as_deref(),
            Some("true")
        );

        let reloaded = ConsentManager::load(manager.storage);
        assert!(reloaded.has_consented());
        assert!(!reloaded.show_banner());
        assert_eq!(reloaded.preferences(), CookiePreferences::all());
    }

    #[test]
    fn test_reject_all() {
        let mut manager = ConsentManager::load(MemoryStorage::new());
        manager.accept_all().unwrap();
        manager.reject_all().unwrap();
        assert_eq!(manager.preferences(), CookiePreferences::only_necessary());
        assert!(manager.is_allowed(CookieCategory::Necessary));
        assert!(!manager.is_allowed(CookieCategory::Functional));
    }

    #[test]
    fn test_stored_partial_preferences_merge_with_defaults() {
        let mut storage = MemoryStorage::new();
        let lifetime = Duration::days(1);
        storage.set(CONSENT_KEY, "true", lifetime).unwrap();
        storage
            .set(PREFERENCES_KEY, r#"{"analytics":true,"necessary":false}"#, lifetime)
            .unwrap();

        let manager = ConsentManager::load(storage);
        let prefs = manager.preferences();
        assert!(prefs.necessary);
        assert!(prefs.analytics);
        assert!(!prefs.functional);
    }

    #[test]
    fn test_necessary_allowed_even_when_stored_false() {
        let mut storage = MemoryStorage::new();
        let lifetime = Duration::days(1);
        storage.set(CONSENT_KEY, "true", lifetime).unwrap();
        storage
            .set(PREFERENCES_KEY, r#"{"necessary":false,"analytics":true}"#, lifetime)
            .unwrap();

        let manager = ConsentManager::load(storage);
        assert!(manager.is_allowed(CookieCategory::Necessary));
        assert!(manager.is_allowed(CookieCategory::Analytics));
        assert!(!manager.is_allowed(CookieCategory::Marketing));
    }

    #[test]
    fn test_unreadable_preferences_show_banner() {
        let mut storage = MemoryStorage::new();
        let lifetime = Duration::days(1);
        storage.set(CONSENT_KEY, "true", lifetime).unwrap();
        storage.set(PREFERENCES_KEY, "{broken", lifetime).unwrap();

        let manager = ConsentManager::load(storage);
        assert!(manager.show_banner());
        assert!(!manager.has_consented());
        assert!(!manager.is_allowed(CookieCategory::Analytics));
        assert!(manager.is_allowed(CookieCategory::Necessary));
    }

    #[test]
    fn test_show_preferences_and_reset() {
        let mut manager = ConsentManager::load(MemoryStorage::new());
        manager.accept_all().unwrap();
        manager.show_preferences();
        assert!(manager.show_banner());
        assert!(manager.has_consented());

        manager.reset().unwrap();
        assert!(!manager.has_consented());
        assert_eq!(manager.storage().get(PREFERENCES_KEY).unwrap(), None);
    }

    #[test]
    fn test_category_from_str() {
        assert_eq!("Analytics".parse::<CookieCategory>(), Ok(CookieCategory::Analytics));
        assert!("tracking".parse::<CookieCategory>().is_err());
    }
}
