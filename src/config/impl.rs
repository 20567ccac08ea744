use std::sync::{Arc, OnceLock};

use arc_swap::ArcSwap;

use super::StaticConfig;
use crate::errors::{EdgelinkError, Result};

static CONFIG: OnceLock<ArcSwap<StaticConfig>> = OnceLock::new();

/// Get the global configuration instance
///
/// Returns an Arc pointer to the configuration, which is cheap to clone
/// and doesn't hold any locks.
pub fn get_config() -> Arc<StaticConfig> {
    CONFIG
        .get()
        .expect("Config not initialized. Call init_config_from() first.")
        .load_full()
}

/// Load the configuration and install it globally
///
/// A file that cannot be read or a field that does not parse is an error;
/// startup must not continue on defaults. The first successful call wins.
///
/// # Examples
/// ```no_run
/// use edgelink::config::init_config_from;
/// init_config_from(Some("/etc/edgelink/config.toml")).unwrap();
/// ```
pub fn init_config_from(path: Option<&str>) -> Result<()> {
    let config = StaticConfig::try_load(path).map_err(|e| {
        EdgelinkError::configuration(format!("Failed to load configuration: {}", e))
    })?;
    let _ = CONFIG.set(ArcSwap::from_pointee(config));
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_init_rejects_unparsable_field() {
        let mut file = tempfile::Builder::new()
            .suffix(".toml")
            .tempfile()
            .expect("temp file");
        writeln!(
            file,
            "[server]\nport = \"not-a-port\"\nenvironment = \"production\"\n\n[storage]\nbackend = \"redis\""
        )
        .expect("write");

        let path = file.path().to_str().expect("utf-8 path").to_string();
        let err = init_config_from(Some(&path)).expect_err("bad port must not load");
        assert!(matches!(err, EdgelinkError::Configuration(_)));
        assert!(err.message().contains("Failed to load configuration"));
    }
}
