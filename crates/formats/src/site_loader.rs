use std::fs;
use std::path::{Path, PathBuf};

use viewport::Site;

use crate::site_collection::{SiteCollectionError, sites_from_geojson_str};

#[derive(Debug)]
pub enum SiteLoadError {
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    Parse {
        path: PathBuf,
        source: SiteCollectionError,
    },
}

impl std::fmt::Display for SiteLoadError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SiteLoadError::Io { path, source } => {
                write!(f, "failed to read sites {}: {source}", path.display())
            }
            SiteLoadError::Parse { path, source } => {
                write!(f, "failed to parse sites {}: {source}", path.display())
            }
        }
    }
}

impl std::error::Error for SiteLoadError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            SiteLoadError::Io { source, .. } => Some(source),
            SiteLoadError::Parse { source, .. } => Some(source),
        }
    }
}

pub fn load_sites_from_path(path: impl AsRef<Path>) -> Result<Vec<Site>, SiteLoadError> {
    let path = path.as_ref();
    let payload = fs::read_to_string(path).map_err(|e| SiteLoadError::Io {
        path: path.to_path_buf(),
        source: e,
    })?;
    sites_from_geojson_str(&payload).map_err(|e| SiteLoadError::Parse {
        path: path.to_path_buf(),
        source: e,
    })
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::{SiteLoadError, load_sites_from_path};

    #[test]
    fn loads_sites_from_file() {
        let mut file = tempfile::NamedTempFile::new().expect("tempfile");
        write!(
            file,
            r#"{{"type":"FeatureCollection","features":[
                {{"type":"Feature","properties":{{"id":"vienna","name":"Vienna"}},
                  "geometry":{{"type":"Point","coordinates":[16.37,48.21]}}}}
            ]}}"#
        )
        .expect("write");
        let sites = load_sites_from_path(file.path()).expect("load");
        assert_eq!(sites.len(), 1);
        assert_eq!(sites[0].name(), Some("Vienna"));
    }

    #[test]
    fn reports_missing_file() {
        let err = load_sites_from_path("/definitely/not/here.geojson").unwrap_err();
        assert!(matches!(err, SiteLoadError::Io { .. }));
        assert!(err.to_string().contains("not/here.geojson"));
    }

    #[test]
    fn reports_parse_errors_with_path() {
        let mut file = tempfile::NamedTempFile::new().expect("tempfile");
        write!(file, r#"{{"type":"FeatureCollection"}}"#).expect("write");
        let err = load_sites_from_path(file.path()).unwrap_err();
        assert!(matches!(err, SiteLoadError::Parse { .. }), "{err}");
    }
}
