//! Inspect and change the stored cookie consent

use anyhow::{Context, Result};
use std::path::PathBuf;

use crate::consent::{ConsentManager, CookieCategory, FileStorage, PreferencesUpdate};
use crate::Site;

pub const CONSENT_FILE: &str = ".consent.json";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConsentAction {
    Show,
    AcceptAll,
    RejectAll,
    /// `category=bool` assignments
    Set(Vec<String>),
    Reset,
}

/// Parse one `category=bool` assignment
pub fn parse_assignment(raw: &str) -> Result<(CookieCategory, bool)> {
    let (key, value) = raw
        .split_once('=')
        .with_context(|| format!("Expected category=true|false, got {:?}", raw))?;
    let category: CookieCategory = key.parse().map_err(anyhow::Error::msg)?;
    let value: bool = value
        .trim()
        .parse()
        .with_context(|| format!("Invalid value for {}: {:?}", category, value))?;
    Ok((category, value))
}

pub fn storage_path(site: &Site) -> PathBuf {
    site.base_dir.join(CONSENT_FILE)
}

/// Apply an action to the consent stored for the site
pub fn apply(
    manager: &mut ConsentManager<FileStorage>,
    action: &ConsentAction,
) -> Result<()> {
    match action {
        ConsentAction::Show => {}
        ConsentAction::AcceptAll => manager.accept_all()?,
        ConsentAction::RejectAll => manager.reject_all()?,
        ConsentAction::Set(assignments) => {
            let mut update = PreferencesUpdate::default();
            for raw in assignments {
                let (category, value) = parse_assignment(raw)?;
                if category == CookieCategory::Necessary && !value {
                    tracing::warn!("Necessary cookies cannot be disabled");
                }
                update = update.set(category, value);
            }
            manager.update_preferences(update);
            manager.save_preferences()?;
        }
        ConsentAction::Reset => manager.reset()?,
    }
    Ok(())
}

pub fn run(site: &Site, action: &ConsentAction) -> Result<()> {
    let storage = FileStorage::open(storage_path(site))?;
    let mut manager = ConsentManager::load(storage);
    apply(&mut manager, action)?;

    let prefs = manager.preferences();
    println!("Consent given: {}", manager.has_consented());
    for category in [
        CookieCategory::Necessary,
        CookieCategory::Analytics,
        CookieCategory::Marketing,
        CookieCategory::Functional,
    ] {
        println!(
            "  {:<10} {}",
            category,
            if prefs.allows(category) { "allowed" } else { "denied" }
        );
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn manager(site: &Site) -> ConsentManager<FileStorage> {
        ConsentManager::load(FileStorage::open(storage_path(site)).unwrap())
    }

    #[test]
    fn test_parse_assignment() {
        assert_eq!(
            parse_assignment("analytics=true").unwrap(),
            (CookieCategory::Analytics, true)
        );
        assert!(parse_assignment("analytics").is_err());
        assert!(parse_assignment("analytics=maybe").is_err());
        assert!(parse_assignment("ads=true").is_err());
    }

    #[test]
    fn test_set_persists_across_runs() {
        let tmp = TempDir::new().unwrap();
        let site = Site::with_config(tmp.path(), Default::default());

        let action = ConsentAction::Set(vec![
            "marketing=true".to_string(),
            "necessary=false".to_string(),
        ]);
        run(&site, &action).unwrap();

        let reloaded = manager(&site);
        assert!(reloaded.has_consented());
        assert!(reloaded.preferences().marketing);
        assert!(reloaded.preferences().necessary);
        assert!(!reloaded.preferences().analytics);
    }

    #[test]
    fn test_accept_then_reset() {
        let tmp = TempDir::new().unwrap();
        let site = Site::with_config(tmp.path(), Default::default());

        run(&site, &ConsentAction::AcceptAll).unwrap();
        assert!(manager(&site).is_allowed(CookieCategory::Analytics));

        run(&site, &ConsentAction::Reset).unwrap();
        let reloaded = manager(&site);
        assert!(!reloaded.has_consented());
        assert!(reloaded.show_banner());
        assert!(!reloaded.is_allowed(CookieCategory::Analytics));
    }
}
