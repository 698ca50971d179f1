use std::{env, path::PathBuf};

pub const DEFAULT_DATA_PATH: &str = "data/tracker.json";
pub const DEFAULT_PORT: u16 = 8080;

#[derive(Debug, Clone)]
pub struct Config {
    pub data_path: PathBuf,
    pub port: u16,
}

impl Config {
    pub fn from_env() -> Self {
        Self {
            data_path: resolve_data_path(env::var("APP_DATA_PATH").ok()),
            port: resolve_port(env::var("PORT").ok()),
        }
    }
}

pub fn resolve_data_path(value: Option<String>) -> PathBuf {
    value
        .filter(|path| !path.trim().is_empty())
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from(DEFAULT_DATA_PATH))
}

pub fn resolve_port(value: Option<String>) -> u16 {
    value
        .and_then(|value| value.trim().parse::<u16>().ok())
        .unwrap_or(DEFAULT_PORT)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn data_path_falls_back_to_default() {
        assert_eq!(resolve_data_path(None), PathBuf::from(DEFAULT_DATA_PATH));
        assert_eq!(resolve_data_path(Some("  ".into())), PathBuf::from(DEFAULT_DATA_PATH));
        assert_eq!(
            resolve_data_path(Some("/tmp/habits.json".into())),
            PathBuf::from("/tmp/habits.json")
        );
    }

    #[test]
    fn port_ignores_garbage() {
        assert_eq!(resolve_port(None), DEFAULT_PORT);
        assert_eq!(resolve_port(Some("http".into())), DEFAULT_PORT);
        assert_eq!(resolve_port(Some("3000".into())), 3000);
    }
}
