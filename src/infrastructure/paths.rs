//! Paths inside the Zellij plugin sandbox, where the host filesystem is
//! mounted under `/host`.

use std::path::PathBuf;

/// Sandbox root that maps to the host directory Zellij was started from.
const HOST_ROOT: &str = "/host";

/// File holding the persisted search snapshot.
pub const SNAPSHOT_FILE_NAME: &str = "session.json";

/// Directory holding the snapshot store and the trace file.
///
/// `/host` is the cwd of the last focused terminal, or the folder Zellij was
/// started in, so this usually resolves to `~/.local/share/zellij/zgallery`.
///
/// ```
/// use zgallery::infrastructure::get_data_dir;
///
/// assert_eq!(get_data_dir().to_str(), Some("/host/.local/share/zellij/zgallery"));
/// ```
#[must_use]
pub fn get_data_dir() -> PathBuf {
    PathBuf::from(HOST_ROOT).join(".local/share/zellij/zgallery")
}

#[must_use]
pub fn snapshot_path() -> PathBuf {
    get_data_dir().join(SNAPSHOT_FILE_NAME)
}

/// Maps `~` to the sandbox host root, for user-supplied paths such as
/// `theme_file`.
///
/// ```
/// use zgallery::infrastructure::expand_tilde;
///
/// assert_eq!(expand_tilde("~/themes/dark.toml"), "/host/themes/dark.toml");
/// assert_eq!(expand_tilde("~"), "/host");
/// assert_eq!(expand_tilde("/etc/theme.toml"), "/etc/theme.toml");
/// assert_eq!(expand_tilde("~user/theme.toml"), "~user/theme.toml");
/// ```
#[must_use]
pub fn expand_tilde(path: &str) -> String {
    match path.strip_prefix('~') {
        Some("") => HOST_ROOT.to_string(),
        Some(rest) if rest.starts_with('/') => format!("{HOST_ROOT}{rest}"),
        _ => path.to_string(),
    }
}
