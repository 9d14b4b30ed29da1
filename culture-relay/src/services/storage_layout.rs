//! Per-session directory layout
//!
//! Known categories get `<root>/<category>/<session_id>/{input,output}`.
//! Unclassified uploads all share `<root>` for both input and output.

use std::io;
use std::path::{Component, Path, PathBuf};

use crate::models::ContentCategory;

/// Input/output directory pair for one upload
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionDirs {
    pub input: PathBuf,
    pub output: PathBuf,
}

/// Maps (session, category) onto directories under a fixed root
#[derive(Debug, Clone)]
pub struct StorageLayout {
    root: PathBuf,
}

impl StorageLayout {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Directory pair for an upload, without touching the filesystem
    pub fn resolve(&self, session_id: &str, category: ContentCategory) -> io::Result<SessionDirs> {
        match category.dir_name() {
            Some(category_dir) => {
                let session_dir = confined_path(&self.root.join(category_dir), session_id)?;
                Ok(SessionDirs {
                    input: session_dir.join("input"),
                    output: session_dir.join("output"),
                })
            }
            None => Ok(SessionDirs {
                input: self.root.clone(),
                output: self.root.clone(),
            }),
        }
    }

    /// Resolve and create the directory pair; existing directories are fine
    pub async fn prepare(&self, session_id: &str, category: ContentCategory) -> io::Result<SessionDirs> {
        let dirs = self.resolve(session_id, category)?;
        tokio::fs::create_dir_all(&dirs.input).await?;
        tokio::fs::create_dir_all(&dirs.output).await?;

        tracing::debug!(
            session_id = %session_id,
            input = %dirs.input.display(),
            output = %dirs.output.display(),
            "Session directories prepared"
        );

        Ok(dirs)
    }
}

/// True if `name` is exactly one normal path segment
///
/// Rejects empty names, `.`/`..`, either slash flavor, NUL and anything a
/// platform would read as a root or prefix.
pub fn is_safe_file_name(name: &str) -> bool {
    if name.is_empty() || name.contains(&['/', '\\', '\0'][..]) {
        return false;
    }
    let mut components = Path::new(name).components();
    matches!(
        (components.next(), components.next()),
        (Some(Component::Normal(_)), None)
    )
}

/// Join a single file name onto `dir`, refusing anything that could escape it
pub fn confined_path(dir: &Path, name: &str) -> io::Result<PathBuf> {
    if is_safe_file_name(name) {
        Ok(dir.join(name))
    } else {
        Err(io::Error::new(
            io::ErrorKind::InvalidInput,
            format!("unsafe file name: {:?}", name),
        ))
    }
}
