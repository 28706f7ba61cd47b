// src/config.rs
use anyhow::{anyhow, Context, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

const ENV_PATH: &str = "WXWATCH_CONFIG_PATH";

/// Supported warning regions. Each maps to the state-wide severe weather
/// warning file published on the feed server.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum State {
    Queensland,
    #[serde(rename = "New South Wales")]
    NewSouthWales,
    Victoria,
    #[serde(rename = "South Australia")]
    SouthAustralia,
    #[serde(rename = "Western Australia")]
    WesternAustralia,
    Tasmania,
    #[serde(rename = "Northern Territory")]
    NorthernTerritory,
    #[serde(rename = "Australian Capital Territory")]
    AustralianCapitalTerritory,
}

impl State {
    /// Default warning file for the state.
    /// ACT warnings are published in the NSW file.
    pub fn default_feed_file(&self) -> &'static str {
        match self {
            State::Queensland => "IDQ21037.xml",
            State::NewSouthWales => "IDN21037.xml",
            State::Victoria => "IDV21033.xml",
            State::SouthAustralia => "IDS21037.xml",
            State::WesternAustralia => "IDW21037.xml",
            State::Tasmania => "IDT21037.xml",
            State::NorthernTerritory => "IDD21037.xml",
            State::AustralianCapitalTerritory => "IDN21037.xml",
        }
    }
}

impl fmt::Display for State {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            State::Queensland => "Queensland",
            State::NewSouthWales => "New South Wales",
            State::Victoria => "Victoria",
            State::SouthAustralia => "South Australia",
            State::WesternAustralia => "Western Australia",
            State::Tasmania => "Tasmania",
            State::NorthernTerritory => "Northern Territory",
            State::AustralianCapitalTerritory => "Australian Capital Territory",
        };
        f.write_str(name)
    }
}

/// Monitored location. Loaded once at startup and never mutated; first-run
/// setup that produces the file lives outside this crate.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LocationConfig {
    pub state: State,
    pub town: String,
    /// Explicit warning file override; defaults to the state-wide file.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub warning_file: Option<String>,
}

impl LocationConfig {
    /// The feed file to poll for this location.
    pub fn feed_file(&self) -> &str {
        self.warning_file
            .as_deref()
            .unwrap_or_else(|| self.state.default_feed_file())
    }

    fn validate(self) -> Result<Self> {
        if self.town.trim().is_empty() {
            return Err(anyhow!("location config: town must not be blank"));
        }
        Ok(Self {
            town: self.town.trim().to_string(),
            ..self
        })
    }
}

/// Load location config from an explicit path. Supports TOML or JSON formats.
pub fn load_from(path: &Path) -> Result<LocationConfig> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("reading location config from {}", path.display()))?;
    let ext = path
        .extension()
        .and_then(|s| s.to_str())
        .unwrap_or_default()
        .to_ascii_lowercase();
    parse_config(&content, ext.as_str())
        .with_context(|| format!("parsing location config {}", path.display()))
}

/// Load location config using env var + fallbacks:
/// 1) $WXWATCH_CONFIG_PATH
/// 2) config/location.toml
/// 3) config/location.json
pub fn load_default() -> Result<LocationConfig> {
    if let Ok(p) = std::env::var(ENV_PATH) {
        let pb = PathBuf::from(p);
        if pb.exists() {
            return load_from(&pb);
        } else {
            return Err(anyhow!("WXWATCH_CONFIG_PATH points to non-existent path"));
        }
    }
    let toml_p = PathBuf::from("config/location.toml");
    if toml_p.exists() {
        return load_from(&toml_p);
    }
    let json_p = PathBuf::from("config/location.json");
    if json_p.exists() {
        return load_from(&json_p);
    }
    Err(anyhow!(
        "no location config found (set WXWATCH_CONFIG_PATH or create config/location.toml)"
    ))
}

fn parse_config(s: &str, hint_ext: &str) -> Result<LocationConfig> {
    let cfg: LocationConfig = if hint_ext == "json" {
        serde_json::from_str(s)?
    } else {
        toml::from_str(s)?
    };
    cfg.validate()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::{env, fs};

    #[test]
    fn toml_and_json_formats_parse() {
        let toml = r#"
state = "Queensland"
town = "Ipswich"
"#;
        let cfg = parse_config(toml, "toml").unwrap();
        assert_eq!(cfg.state, State::Queensland);
        assert_eq!(cfg.feed_file(), "IDQ21037.xml");

        let json = r#"{"state": "New South Wales", "town": " Dubbo ", "warning_file": "IDN99999.xml"}"#;
        let cfg = parse_config(json, "json").unwrap();
        assert_eq!(cfg.state, State::NewSouthWales);
        assert_eq!(cfg.town, "Dubbo"); // trimmed
        assert_eq!(cfg.feed_file(), "IDN99999.xml");
    }

    #[test]
    fn blank_town_is_rejected() {
        let toml = r#"
state = "Victoria"
town = "   "
"#;
        assert!(parse_config(toml, "toml").is_err());
    }

    #[test]
    fn act_shares_the_nsw_file() {
        let toml = r#"
state = "Australian Capital Territory"
town = "Canberra"
"#;
        let cfg = parse_config(toml, "toml").unwrap();
        assert_eq!(cfg.feed_file(), "IDN21037.xml");
    }

    #[serial_test::serial]
    #[test]
    fn default_uses_env_then_fallbacks() {
        // Isolate CWD in a temp dir so a real config/ in the repo can't interfere
        let old = env::current_dir().unwrap();
        let tmp = tempfile::tempdir().unwrap();
        env::set_current_dir(tmp.path()).unwrap();

        env::remove_var(ENV_PATH);

        // No files in temp CWD -> error
        assert!(load_default().is_err());

        // Env var takes precedence
        let p_json = tmp.path().join("location.json");
        fs::write(&p_json, r#"{"state": "Tasmania", "town": "Hobart"}"#).unwrap();
        env::set_var(ENV_PATH, p_json.display().to_string());
        let cfg = load_default().unwrap();
        assert_eq!(cfg.state, State::Tasmania);
        env::remove_var(ENV_PATH);

        // Restore CWD
        env::set_current_dir(&old).unwrap();
    }
}
