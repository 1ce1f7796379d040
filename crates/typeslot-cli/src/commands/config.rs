//! Config command implementation.
//!
//! Manages CLI configuration.

use anyhow::Result;
use typeslot_ops::{Config, CONFIG_KEYS};

/// Show current configuration.
pub fn show(config: &Config) -> Result<()> {
    println!("typeslot Configuration");
    println!("{:-<40}", "");

    println!("Predictor:           {}", config.predictor);
    println!("Infer URL:           {}", config.effective_infer_url());
    println!("Telemetry URL:       {}", config.effective_telemetry_url());
    println!(
        "Fixture Path:        {}",
        config
            .fixture_path
            .as_ref()
            .map(|p| p.display().to_string())
            .unwrap_or_else(|| "(not set)".to_string())
    );
    println!("Dev Mode:            {}", config.dev_mode);
    println!("Filter Predictions:  {}", config.filter_predictions);
    println!("Share Accepted:      {}", config.share_accepted_predictions);
    println!("Auto Infer:          {}", config.auto_infer);
    println!("Max Source Size:     {} KB", config.max_source_kb);
    println!("Bind Address:        {}", config.bind);
    println!("Activation ID:       {}", config.activation_id);

    if let Some(config_path) = Config::config_file_path() {
        println!("\nConfig file: {}", config_path.display());
    }

    Ok(())
}

/// Set a configuration value.
pub fn set(config: &mut Config, key: &str, value: &str) -> Result<()> {
    config.set(key, value)?;
    config.save()?;
    println!("✅ Set {} to: {}", key, value);
    Ok(())
}

/// Get a configuration value.
pub fn get(config: &Config, key: &str) -> Result<()> {
    if !CONFIG_KEYS.contains(&key) {
        anyhow::bail!(
            "Unknown config key: {}. Valid keys: {}",
            key,
            CONFIG_KEYS.join(", ")
        );
    }

    let value = config.get(key).unwrap_or_else(|| "(not set)".to_string());
    println!("{}", value);
    Ok(())
}

/// Reset configuration to defaults, keeping the activation id.
pub fn reset(config: &Config) -> Result<()> {
    config.reset().save()?;
    println!("Configuration reset to defaults");
    Ok(())
}
