//! Scenario 5: Studio Link
//!
//! Opens the thread under review in the external studio, first from the
//! bundled session config, then from a config with no deployment URL, which
//! yields a single user-facing warning instead of a link.

use url::Url;

use inbox_contracts::{error::InboxResult, notice::UserWarning};
use inbox_studio::{PanelVisibility, StudioConfig, StudioLinker};

use crate::service::CollectingWarnings;

const STUDIO_CONFIG: &str = include_str!("../../config/studio.toml");

/// Session config bundled with the reference runtime.
pub fn bundled_config() -> InboxResult<StudioConfig> {
    StudioConfig::from_toml_str(STUDIO_CONFIG)
}

/// Resolve the link for the bundled config and for an unconfigured one.
pub fn execute() -> InboxResult<(Option<Url>, Vec<UserWarning>)> {
    let config = bundled_config()?;
    let warnings = CollectingWarnings::new();
    let linked = StudioLinker::from_config(&config).open(&config, &warnings);

    let unconfigured = StudioConfig {
        deployment_url: None,
        ..config
    };
    StudioLinker::from_config(&unconfigured).open(&unconfigured, &warnings);

    Ok((linked, warnings.warnings()))
}

/// Run Scenario 5: Studio Link.
pub fn run_scenario() -> InboxResult<()> {
    println!("=== Scenario 5: Studio Link ===");
    println!();

    let config = bundled_config()?;
    println!(
        "  Deployment:     {}",
        config.deployment_url().unwrap_or("(unset)")
    );
    println!(
        "  Thread:         {}",
        config
            .thread_id()
            .map(|t| t.to_string())
            .unwrap_or_else(|| "(none)".to_string())
    );

    let warnings = CollectingWarnings::new();
    match StudioLinker::from_config(&config).open(&config, &warnings) {
        Some(url) => println!("  Studio link:    {}", url),
        None => println!("  Studio link:    UNAVAILABLE"),
    }
    println!();

    println!("  [Clearing the deployment URL...]");
    let unconfigured = StudioConfig {
        deployment_url: None,
        ..config
    };
    if StudioLinker::from_config(&unconfigured)
        .open(&unconfigured, &warnings)
        .is_none()
    {
        println!("  Studio link:    UNAVAILABLE");
    }
    for warning in warnings.warnings() {
        println!("  Warning:        {}: {}", warning.title, warning.message);
    }
    println!();

    let mut panels = PanelVisibility::default();
    panels.toggle_state();
    panels.toggle_description();
    println!(
        "  Panels:         state={} description={}",
        panels.show_state, panels.show_description
    );

    println!();
    println!("  Scenario 5 complete.");
    println!();
    Ok(())
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bundled_config_links_to_thread() {
        let (url, warnings) = execute().unwrap();
        let url = url.expect("bundled config should produce a link");

        assert_eq!(url.host_str(), Some("smith.langchain.com"));
        assert_eq!(
            url.path(),
            "/studio/thread/3c5a9e1e-6f4b-4d8e-9a51-0d2b7c9f1a64"
        );
        let base = url
            .query_pairs()
            .find(|(k, _)| k == "baseUrl")
            .map(|(_, v)| v.into_owned());
        assert_eq!(base.as_deref(), Some("https://inbox-demo-agent.example.com"));

        // Only the unconfigured attempt warns.
        assert_eq!(warnings, vec![UserWarning::missing_deployment_url()]);
    }

    #[test]
    fn test_bundled_config_parses() {
        let config = bundled_config().unwrap();
        assert!(config.deployment_url().is_some());
        assert!(config.thread_id().is_some());
    }
}
