use crate::errors::{AppError, AppResult};
use crate::store::DEFAULT_COMMENT_USER;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

pub const CONFIG_ENV: &str = "PERMIT_DESK_CONFIG";
pub const USER_ENV: &str = "PERMIT_DESK_USER";
pub const LOG_LEVEL_ENV: &str = "PERMIT_DESK_LOG_LEVEL";
pub const LOG_DIR_ENV: &str = "PERMIT_DESK_LOG_DIR";
pub const NO_COLOR_ENV: &str = "NO_COLOR";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default, deny_unknown_fields)]
pub struct DeskSettings {
    pub current_user: String,
    pub log_level: String,
    pub log_dir: Option<PathBuf>,
    pub color: bool,
}

impl Default for DeskSettings {
    fn default() -> Self {
        Self {
            current_user: DEFAULT_COMMENT_USER.to_string(),
            log_level: "info".to_string(),
            log_dir: None,
            color: true,
        }
    }
}

impl DeskSettings {
    pub fn load(explicit: Option<&Path>) -> AppResult<Self> {
        let lookup = |key: &str| std::env::var(key).ok();
        Self::load_with(explicit, lookup)
    }

    pub fn load_with<F>(explicit: Option<&Path>, lookup: F) -> AppResult<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let path = explicit
            .map(Path::to_path_buf)
            .or_else(|| lookup(CONFIG_ENV).filter(|value| !value.is_empty()).map(PathBuf::from));

        let mut settings = match path {
            Some(path) => Self::from_file(&path)?,
            None => Self::default(),
        };
        settings.apply_env(lookup);
        settings.validate()?;
        Ok(settings)
    }

    pub fn from_file(path: &Path) -> AppResult<Self> {
        let raw = std::fs::read_to_string(path)
            .map_err(|err| AppError::Io(format!("{}: {}", path.display(), err)))?;
        if raw.trim().is_empty() {
            return Ok(Self::default());
        }
        Ok(serde_yaml::from_str(&raw)?)
    }

    fn apply_env<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(user) = lookup(USER_ENV) {
            self.current_user = user;
        }
        if let Some(level) = lookup(LOG_LEVEL_ENV).filter(|value| !value.trim().is_empty()) {
            self.log_level = level;
        }
        if let Some(dir) = lookup(LOG_DIR_ENV).filter(|value| !value.trim().is_empty()) {
            self.log_dir = Some(PathBuf::from(dir));
        }
        if lookup(NO_COLOR_ENV).is_some_and(|value| !value.is_empty()) {
            self.color = false;
        }
    }

    fn validate(&self) -> AppResult<()> {
        if self.current_user.trim().is_empty() {
            return Err(AppError::Config("currentUser must not be empty".to_string()));
        }
        Ok(())
    }

    pub fn resolved_log_dir(&self) -> PathBuf {
        self.log_dir
            .clone()
            .unwrap_or_else(|| std::env::temp_dir().join("permit-desk").join("logs"))
    }
}

#[cfg(test)]
mod tests {
    use super::{DeskSettings, CONFIG_ENV, LOG_DIR_ENV, LOG_LEVEL_ENV, NO_COLOR_ENV, USER_ENV};
    use std::path::PathBuf;
    use std::collections::HashMap;
    use std::io::Write;

    fn env(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map = pairs
            .iter()
            .map(|(key, value)| (key.to_string(), value.to_string()))
            .collect::<HashMap<_, _>>();
        move |key: &str| map.get(key).cloned()
    }

    #[test]
    fn defaults_apply_without_file_or_env() {
        let settings = DeskSettings::load_with(None, env(&[])).expect("settings");
        assert_eq!(settings, DeskSettings::default());
        assert_eq!(settings.current_user, "現在のユーザー");
    }

    #[test]
    fn yaml_file_is_read_and_env_overrides_it() {
        let mut file = tempfile::NamedTempFile::new().expect("tempfile");
        writeln!(file, "currentUser: 佐藤\nlogLevel: debug\ncolor: true").expect("write");

        let settings = DeskSettings::load_with(Some(file.path()), env(&[(LOG_LEVEL_ENV, "warn"), (NO_COLOR_ENV, "1")]))
            .expect("settings");
        assert_eq!(settings.current_user, "佐藤");
        assert_eq!(settings.log_level, "warn");
        assert!(!settings.color);
    }

    #[test]
    fn unknown_keys_are_rejected() {
        let mut file = tempfile::NamedTempFile::new().expect("tempfile");
        writeln!(file, "theme: orange").expect("write");
        let err = DeskSettings::load_with(Some(file.path()), env(&[])).expect_err("unknown key");
        assert!(err.to_string().starts_with("CONFIG_INVALID"));
    }

    #[test]
    fn blank_user_is_rejected() {
        let err = DeskSettings::load_with(None, env(&[(USER_ENV, "  ")])).expect_err("blank user");
        assert!(err.to_string().contains("currentUser"));
    }

    #[test]
    fn missing_file_is_an_io_failure() {
        let dir = tempfile::tempdir().expect("tempdir");
        let err = DeskSettings::load_with(Some(dir.path().join("absent.yaml").as_path()), env(&[])).expect_err("missing");
        assert!(err.to_string().starts_with("IO_FAILURE"));
    }

    #[test]
    fn config_path_and_log_dir_come_from_env() {
        let mut file = tempfile::NamedTempFile::new().expect("tempfile");
        writeln!(file, "currentUser: 高橋").expect("write");
        let path = file.path().to_string_lossy().to_string();

        let settings = DeskSettings::load_with(None, env(&[(CONFIG_ENV, path.as_str()), (LOG_DIR_ENV, "/var/tmp/desk-logs")]))
            .expect("settings");
        assert_eq!(settings.current_user, "高橋");
        assert_eq!(settings.resolved_log_dir(), PathBuf::from("/var/tmp/desk-logs"));
    }
}
