use std::{
    fs,
    path::{Path, PathBuf},
    time::Duration,
};

use serde::Deserialize;
use tracing::warn;

pub const CONFIG_FILE: &str = "storycircle.toml";
pub const DEFAULT_SERVER_URL: &str = "https://storycircleserver.onrender.com";
pub const DEFAULT_LOGIN_REDIRECT_SECS: u64 = 3;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientSettings {
    pub server_url: String,
    pub session_path: PathBuf,
    pub login_redirect_delay_secs: u64,
}

impl Default for ClientSettings {
    fn default() -> Self {
        Self {
            server_url: DEFAULT_SERVER_URL.into(),
            session_path: default_session_path(),
            login_redirect_delay_secs: DEFAULT_LOGIN_REDIRECT_SECS,
        }
    }
}

impl ClientSettings {
    pub fn login_redirect_delay(&self) -> Duration {
        Duration::from_secs(self.login_redirect_delay_secs)
    }
}

#[derive(Debug, Default, Deserialize)]
struct FileSettings {
    server_url: Option<String>,
    session_path: Option<PathBuf>,
    login_redirect_delay_secs: Option<u64>,
}

pub fn default_session_path() -> PathBuf {
    dirs::data_local_dir()
        .unwrap_or_else(|| PathBuf::from("./data"))
        .join("storycircle")
        .join("session.json")
}

pub fn load_settings() -> ClientSettings {
    load_settings_from(Path::new(CONFIG_FILE), |name| std::env::var(name).ok())
}

/// Defaults, then the TOML file if readable, then environment overrides.
pub fn load_settings_from(
    config_path: &Path,
    env: impl Fn(&str) -> Option<String>,
) -> ClientSettings {
    let mut settings = ClientSettings::default();

    if let Ok(raw) = fs::read_to_string(config_path) {
        match toml::from_str::<FileSettings>(&raw) {
            Ok(file_cfg) => {
                if let Some(v) = file_cfg.server_url {
                    settings.server_url = v;
                }
                if let Some(v) = file_cfg.session_path {
                    settings.session_path = v;
                }
                if let Some(v) = file_cfg.login_redirect_delay_secs {
                    settings.login_redirect_delay_secs = v;
                }
            }
            Err(err) => warn!(
                path = %config_path.display(),
                "ignoring unreadable settings file: {err}"
            ),
        }
    }

    let non_empty = |name: &str| env(name).filter(|v| !v.trim().is_empty());

    if let Some(v) = non_empty("STORYCIRCLE_SERVER_URL") {
        settings.server_url = v;
    }
    if let Some(v) = non_empty("APP__SERVER_URL") {
        settings.server_url = v;
    }

    if let Some(v) = non_empty("STORYCIRCLE_SESSION_PATH") {
        settings.session_path = PathBuf::from(v);
    }
    if let Some(v) = non_empty("APP__SESSION_PATH") {
        settings.session_path = PathBuf::from(v);
    }

    for name in ["STORYCIRCLE_LOGIN_REDIRECT_SECS", "APP__LOGIN_REDIRECT_SECS"] {
        if let Some(v) = non_empty(name) {
            match v.trim().parse::<u64>() {
                Ok(parsed) => settings.login_redirect_delay_secs = parsed,
                Err(err) => {
                    warn!(var = name, value = %v, "ignoring invalid login redirect delay: {err}")
                }
            }
        }
    }

    settings
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn env_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |name| map.get(name).cloned()
    }

    #[test]
    fn falls_back_to_defaults_without_file_or_env() {
        let dir = tempfile::tempdir().expect("tempdir");
        let settings = load_settings_from(&dir.path().join("missing.toml"), env_from(&[]));
        assert_eq!(settings.server_url, DEFAULT_SERVER_URL);
        assert_eq!(settings.login_redirect_delay(), Duration::from_secs(3));
        assert!(settings.session_path.ends_with("storycircle/session.json"));
    }

    #[test]
    fn file_values_are_overridden_by_env() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join(CONFIG_FILE);
        fs::write(
            &path,
            "server_url = \"http://file.example\"\nsession_path = \"/tmp/s.json\"\nlogin_redirect_delay_secs = 5\n",
        )
        .expect("write config");

        let from_file = load_settings_from(&path, env_from(&[]));
        assert_eq!(from_file.server_url, "http://file.example");
        assert_eq!(from_file.session_path, PathBuf::from("/tmp/s.json"));
        assert_eq!(from_file.login_redirect_delay_secs, 5);

        let overridden = load_settings_from(
            &path,
            env_from(&[
                ("STORYCIRCLE_SERVER_URL", "http://env.example"),
                ("APP__SESSION_PATH", "/var/tmp/session.json"),
                ("STORYCIRCLE_LOGIN_REDIRECT_SECS", "1"),
            ]),
        );
        assert_eq!(overridden.server_url, "http://env.example");
        assert_eq!(overridden.session_path, PathBuf::from("/var/tmp/session.json"));
        assert_eq!(overridden.login_redirect_delay_secs, 1);
    }

    #[test]
    fn app_prefixed_delay_overrides_file_and_storycircle_var() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join(CONFIG_FILE);
        fs::write(&path, "login_redirect_delay_secs = 5\n").expect("write config");

        let settings = load_settings_from(
            &path,
            env_from(&[
                ("STORYCIRCLE_LOGIN_REDIRECT_SECS", "2"),
                ("APP__LOGIN_REDIRECT_SECS", "7"),
            ]),
        );
        assert_eq!(settings.login_redirect_delay(), Duration::from_secs(7));

        let only_app = load_settings_from(&path, env_from(&[("APP__LOGIN_REDIRECT_SECS", "0")]));
        assert_eq!(only_app.login_redirect_delay_secs, 0);
    }

    #[test]
    fn ignores_malformed_file_and_bad_delay() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join(CONFIG_FILE);
        fs::write(&path, "server_url = [not toml").expect("write config");

        let settings = load_settings_from(
            &path,
            env_from(&[("STORYCIRCLE_LOGIN_REDIRECT_SECS", "soon")]),
        );
        assert_eq!(settings.server_url, DEFAULT_SERVER_URL);
        assert_eq!(settings.login_redirect_delay_secs, DEFAULT_LOGIN_REDIRECT_SECS);
    }
}
