//! The hand-off from an acquired file to whatever reads its format.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use crate::LoaderOptions;

/// Turns a local dataset file into an in-memory dataset.
///
/// Options come straight from the catalog entry; their meaning belongs to the
/// implementation.
pub trait Loader {
    type Dataset;
    type Error: std::error::Error + Send + Sync + 'static;

    fn load(&self, path: &Path, options: &LoaderOptions) -> Result<Self::Dataset, Self::Error>;
}

impl<L: Loader + ?Sized> Loader for &L {
    type Dataset = L::Dataset;
    type Error = L::Error;

    fn load(&self, path: &Path, options: &LoaderOptions) -> Result<Self::Dataset, Self::Error> {
        (**self).load(path, options)
    }
}

/// A verified dataset file together with the options meant for its reader.
#[derive(Debug, Clone, PartialEq)]
pub struct LoadedDataset {
    pub path:    PathBuf,
    pub size:    u64,
    pub options: LoaderOptions,
}

/// Pass-through loader that leaves parsing to the caller.
#[derive(Debug, Clone, Copy, Default)]
pub struct PathLoader;

impl Loader for PathLoader {
    type Dataset = LoadedDataset;
    type Error = io::Error;

    fn load(&self, path: &Path, options: &LoaderOptions) -> io::Result<LoadedDataset> {
        let size = fs::metadata(path)?.len();
        Ok(LoadedDataset {
            path: path.to_path_buf(),
            size,
            options: options.clone(),
        })
    }
}
