use std::ffi::OsString;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::GravityErrors;

/// Where gravity model files (`<model>.egm` and `<model>.egm.cof`) are found.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct GravityConfig {
    pub data_dir: PathBuf,
}

impl GravityConfig {
    /// Directory holding the model files, takes precedence over everything else.
    pub const GRAVITY_PATH_VAR: &'static str = "GEOGRAPHICLIB_GRAVITY_PATH";
    /// Root of a GeographicLib data install, models are in its `gravity` subdirectory.
    pub const DATA_VAR: &'static str = "GEOGRAPHICLIB_DATA";
    pub const DEFAULT_DIR: &'static str = "/usr/local/share/GeographicLib/gravity";

    pub fn new(data_dir: impl Into<PathBuf>) -> Self {
        Self {
            data_dir: data_dir.into(),
        }
    }

    /// Resolves the data directory from the environment.
    ///
    /// Order: `GEOGRAPHICLIB_GRAVITY_PATH`, then `GEOGRAPHICLIB_DATA/gravity`,
    /// then `GeographicLib/gravity` under the user's data directory if it exists,
    /// then [`GravityConfig::DEFAULT_DIR`].
    pub fn from_env() -> Self {
        let user_dir = dirs::data_dir()
            .map(|dir| dir.join("GeographicLib").join("gravity"))
            .filter(|dir| dir.is_dir());
        Self::new(resolve_data_dir(
            std::env::var_os(Self::GRAVITY_PATH_VAR),
            std::env::var_os(Self::DATA_VAR),
            user_dir,
        ))
    }

    /// Loads the config from a RON file, e.g. `(data_dir: "/opt/gravity")`.
    pub fn from_file(path: &Path) -> Result<Self, GravityErrors> {
        let contents = std::fs::read_to_string(path).map_err(|source| GravityErrors::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_ron(&contents)
    }

    pub fn from_ron(contents: &str) -> Result<Self, GravityErrors> {
        Ok(ron::from_str(contents)?)
    }

    pub fn model_path(&self, model: &str) -> PathBuf {
        self.data_dir.join(format!("{}.egm", model))
    }

    pub fn coefficient_path(&self, model: &str) -> PathBuf {
        self.data_dir.join(format!("{}.egm.cof", model))
    }
}

fn resolve_data_dir(
    gravity_path: Option<OsString>,
    data_path: Option<OsString>,
    user_dir: Option<PathBuf>,
) -> PathBuf {
    let non_empty = |value: Option<OsString>| value.filter(|v| !v.is_empty());

    if let Some(dir) = non_empty(gravity_path) {
        return PathBuf::from(dir);
    }
    if let Some(dir) = non_empty(data_path) {
        return PathBuf::from(dir).join("gravity");
    }
    user_dir.unwrap_or_else(|| PathBuf::from(GravityConfig::DEFAULT_DIR))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_gravity_path_wins() {
        let dir = resolve_data_dir(
            Some("/a/gravity".into()),
            Some("/b".into()),
            Some("/c".into()),
        );
        assert_eq!(dir, PathBuf::from("/a/gravity"));
    }

    #[test]
    fn test_data_path_appends_gravity() {
        let dir = resolve_data_dir(Some("".into()), Some("/b".into()), None);
        assert_eq!(dir, PathBuf::from("/b/gravity"));
    }

    #[test]
    fn test_fallbacks() {
        assert_eq!(
            resolve_data_dir(None, None, Some("/c".into())),
            PathBuf::from("/c")
        );
        assert_eq!(
            resolve_data_dir(None, None, None),
            PathBuf::from(GravityConfig::DEFAULT_DIR)
        );
    }

    #[test]
    fn test_model_paths() {
        let config = GravityConfig::new("/data/gravity");
        assert_eq!(
            config.model_path("egm2008"),
            PathBuf::from("/data/gravity/egm2008.egm")
        );
        assert_eq!(
            config.coefficient_path("egm2008"),
            PathBuf::from("/data/gravity/egm2008.egm.cof")
        );
    }

    #[test]
    fn test_from_ron() {
        let config = GravityConfig::from_ron("(data_dir: \"/opt/gravity\")").unwrap();
        assert_eq!(config, GravityConfig::new("/opt/gravity"));
        assert!(matches!(
            GravityConfig::from_ron("(data_directory: 1)"),
            Err(GravityErrors::Config(_))
        ));
    }

    #[test]
    fn test_from_file_missing() {
        let path = Path::new("/definitely/not/here/gravity.ron");
        assert!(matches!(
            GravityConfig::from_file(path),
            Err(GravityErrors::Io { .. })
        ));
    }
}
