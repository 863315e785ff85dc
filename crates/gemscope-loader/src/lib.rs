//! # Gemscope Loader
//!
//! Model loading for the Gemscope CAD analyzer.
//!
//! ## Features
//! - [`ModelLoader`] trait: byte buffer in, populated scene graph out
//! - Progress reporting as a loaded/total byte ratio
//! - Extension-based dispatch with sync and async file helpers
//! - Built-in JSON scene format ([`JsonSceneLoader`])

pub mod json;

pub use json::JsonSceneLoader;

use std::path::Path;

use gemscope_core::SceneGraph;
use thiserror::Error;
use tokio::io::AsyncReadExt;

/// Loader errors
#[derive(Error, Debug)]
pub enum LoaderError {
    #[error("unsupported model format: {0}")]
    UnsupportedFormat(String),

    #[error("parse error: {0}")]
    Parse(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for loader operations
pub type LoaderResult<T> = Result<T, LoaderError>;

/// Byte-level load progress
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LoadProgress {
    /// Bytes read so far
    pub loaded: u64,
    /// Total bytes, if known
    pub total: u64,
}

impl LoadProgress {
    /// Loaded/total ratio clamped to 0..=1; 0 when the total is unknown
    ///
    /// The total comes from file metadata taken before the read, so a file
    /// growing mid-read can report more loaded bytes than the total.
    pub fn ratio(&self) -> f32 {
        if self.total == 0 {
            0.0
        } else {
            ((self.loaded as f64 / self.total as f64) as f32).min(1.0)
        }
    }
}

/// A fully parsed model ready for measurement and display
#[derive(Debug)]
pub struct LoadedModel {
    /// Scene graph with world transforms already applied
    pub scene: SceneGraph,
}

/// Parser for one model format
pub trait ModelLoader: Send + Sync {
    /// File extensions this loader accepts, lowercase, without the dot
    fn extensions(&self) -> &[&str];

    /// Parse a complete byte buffer into a loaded model
    fn load(&self, bytes: &[u8]) -> LoaderResult<LoadedModel>;
}

/// Find a loader for the given path by extension
pub fn loader_for(path: &Path) -> LoaderResult<Box<dyn ModelLoader>> {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .map(str::to_lowercase)
        .unwrap_or_default();

    let json = JsonSceneLoader::new();
    if json.extensions().contains(&ext.as_str()) {
        return Ok(Box::new(json));
    }

    Err(LoaderError::UnsupportedFormat(ext))
}

/// Load a model file synchronously
pub fn load_file(path: impl AsRef<Path>) -> LoaderResult<LoadedModel> {
    let path = path.as_ref();
    let loader = loader_for(path)?;
    let bytes = std::fs::read(path)?;
    log::info!("loading {} ({} bytes)", path.display(), bytes.len());
    loader.load(&bytes)
}

/// Load a model file asynchronously, reporting byte progress
pub async fn load_file_async(
    path: impl AsRef<Path>,
    mut on_progress: impl FnMut(LoadProgress),
) -> LoaderResult<LoadedModel> {
    let path = path.as_ref();
    let loader = loader_for(path)?;

    let mut file = tokio::fs::File::open(path).await?;
    let total = file.metadata().await?.len();
    let mut bytes = Vec::with_capacity(total as usize);
    let mut chunk = [0u8; 64 * 1024];

    loop {
        let read = file.read(&mut chunk).await?;
        if read == 0 {
            break;
        }
        bytes.extend_from_slice(&chunk[..read]);
        on_progress(LoadProgress {
            loaded: bytes.len() as u64,
            total,
        });
    }

    log::info!("loading {} ({} bytes)", path.display(), bytes.len());
    loader.load(&bytes)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_progress_ratio() {
        let progress = LoadProgress {
            loaded: 25,
            total: 100,
        };
        assert!((progress.ratio() - 0.25).abs() < 0.001);

        let unknown = LoadProgress {
            loaded: 25,
            total: 0,
        };
        assert_eq!(unknown.ratio(), 0.0);
    }

    #[test]
    fn test_progress_ratio_clamped() {
        // File grew after its size was taken
        let progress = LoadProgress {
            loaded: 150,
            total: 100,
        };
        assert_eq!(progress.ratio(), 1.0);
    }

    #[test]
    fn test_loader_dispatch() {
        assert!(loader_for(Path::new("model.json")).is_ok());
        assert!(loader_for(Path::new("model.GSCENE")).is_ok());
        assert!(matches!(
            loader_for(Path::new("model.3dm")),
            Err(LoaderError::UnsupportedFormat(_))
        ));
        assert!(loader_for(Path::new("model")).is_err());
    }
}
