use std::env;
use std::path::PathBuf;

pub fn user_home() -> Option<PathBuf> { home::home_dir() }

pub fn user_config() -> Option<PathBuf> {
    #[cfg(target_os = "windows")]
    {
        env::var_os("APPDATA").map(PathBuf::from)
    }
    #[cfg(target_os = "macos")]
    {
        user_home().map(|p| p.join("Library/Application Support"))
    }
    #[cfg(not(any(target_os = "windows", target_os = "macos")))]
    {
        env::var_os("XDG_CONFIG_HOME")
            .map(PathBuf::from)
            .or_else(|| user_home().map(|p| p.join(".config")))
    }
}

pub fn user_data() -> Option<PathBuf> {
    #[cfg(target_os = "windows")]
    {
        env::var_os("LOCALAPPDATA").map(PathBuf::from)
    }
    #[cfg(target_os = "macos")]
    {
        user_home().map(|p| p.join("Library/Application Support"))
    }
    #[cfg(not(any(target_os = "windows", target_os = "macos")))]
    {
        env::var_os("XDG_DATA_HOME")
            .map(PathBuf::from)
            .or_else(|| user_home().map(|p| p.join(".local/share")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[cfg(not(any(target_os = "windows", target_os = "macos")))]
    #[test]
    fn test_user_data_is_xdg_or_local_share() {
        if let Some(data) = user_data() {
            let xdg = env::var_os("XDG_DATA_HOME").map(PathBuf::from);
            assert!(Some(&data) == xdg.as_ref() || data.ends_with(".local/share"));
        }
    }

    #[test]
    fn test_user_config_is_absolute_when_known() {
        if let Some(config) = user_config() {
            assert!(config.to_string_lossy().len() > 0);
        }
    }
}
