use std::fs;
use std::io;
use std::path::Path;
use std::path::PathBuf;

use indexmap::IndexMap;

use crate::error::ImportError;

/// A materialized schema source: its canonical key plus its raw SDL text.
///
/// For filesystem sources the key is the absolute real path (symlinks
/// resolved); for logical in-memory sources it is the name as given.
/// Canonical keys are what the traversal memoization is keyed on.
#[derive(Debug)]
pub(crate) struct ResolvedSource {
    pub(crate) key: String,
    pub(crate) sdl: String,
}

pub(crate) fn is_graphql_path(name: &str) -> bool {
    name.ends_with(".graphql")
}

/// Materializes the root input of a bundling run.
///
/// A `.graphql` argument is read from disk. Otherwise the argument is a
/// logical name looked up in `sources`, and failing that, it is taken to
/// be literal SDL (keyed by its own text).
pub(crate) fn read_root(
    schema: &str,
    sources: &IndexMap<String, String>,
) -> Result<ResolvedSource, ImportError> {
    if is_graphql_path(schema) {
        let path = fs::canonicalize(schema).map_err(|error| ImportError::SourceRead {
            path: schema.to_owned(),
            source: error,
        })?;
        let sdl = read_file(&path)?;
        Ok(ResolvedSource {
            key: path.to_string_lossy().into_owned(),
            sdl,
        })
    } else if let Some(sdl) = sources.get(schema) {
        Ok(ResolvedSource {
            key: schema.to_owned(),
            sdl: sdl.clone(),
        })
    } else {
        Ok(ResolvedSource {
            key: schema.to_owned(),
            sdl: schema.to_owned(),
        })
    }
}

/// Resolves one import edge from the source identified by `current_key`.
///
/// When both sides are `.graphql` paths the target is interpreted
/// relative to the importing file's directory and canonicalized; if the
/// relative path does not exist, a package-style lookup is attempted.
/// Otherwise the target is a logical name served from `sources`.
pub(crate) fn resolve_import(
    current_key: &str,
    from: &str,
    sources: &IndexMap<String, String>,
) -> Result<ResolvedSource, ImportError> {
    if is_graphql_path(current_key) && is_graphql_path(from) {
        let dir = Path::new(current_key)
            .parent()
            .map(Path::to_path_buf)
            .unwrap_or_default();
        let path = match fs::canonicalize(dir.join(from)) {
            Ok(path) => path,
            Err(error) if error.kind() == io::ErrorKind::NotFound => {
                locate_package_resource(&dir, from)?
            }
            Err(error) => {
                return Err(ImportError::SourceRead {
                    path: dir.join(from).display().to_string(),
                    source: error,
                });
            }
        };
        let sdl = read_file(&path)?;
        Ok(ResolvedSource {
            key: path.to_string_lossy().into_owned(),
            sdl,
        })
    } else {
        match sources.get(from) {
            Some(sdl) => Ok(ResolvedSource {
                key: from.to_owned(),
                sdl: sdl.clone(),
            }),
            None => Err(ImportError::SchemaNotFound {
                name: from.to_owned(),
            }),
        }
    }
}

/// Package-style module lookup: probes `<ancestor>/node_modules/<target>`
/// for every ancestor of the importing file's directory and returns the
/// first hit's real path.
fn locate_package_resource(start: &Path, target: &str) -> Result<PathBuf, ImportError> {
    for ancestor in start.ancestors() {
        if let Ok(path) = fs::canonicalize(ancestor.join("node_modules").join(target)) {
            return Ok(path);
        }
    }
    Err(ImportError::SourceRead {
        path: target.to_owned(),
        source: io::Error::new(
            io::ErrorKind::NotFound,
            "not found relative to the importing file nor in any package directory",
        ),
    })
}

fn read_file(path: &Path) -> Result<String, ImportError> {
    fs::read_to_string(path).map_err(|error| ImportError::SourceRead {
        path: path.display().to_string(),
        source: error,
    })
}
