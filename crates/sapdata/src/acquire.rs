//! Resolving a dataset name to a verified local file, then to a dataset.

use std::collections::BTreeMap;
use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use sapdata_fetch::{BarReporter, FetchOptions, Fetcher, NoopReporter, Reporter, SchemeTransport, Transport};
use sapdata_fs::{CopyOptions, copy_local};
use sapdata_verify::{HashAlgorithm, digest_of, verify_file};
use url::Url;

use crate::catalog::{Catalog, DatasetEntry};
use crate::loader::{LoadedDataset, Loader, PathLoader};
use crate::{Error, Result};

/// Where an acquisition currently is.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Start,
    LocalCopy,
    Download,
    Verify,
    Load,
    Done,
    Failed,
}

impl Stage {
    pub fn as_str(&self) -> &'static str {
        match self {
            Stage::Start => "start",
            Stage::LocalCopy => "local-copy",
            Stage::Download => "download",
            Stage::Verify => "verify",
            Stage::Load => "load",
            Stage::Done => "done",
            Stage::Failed => "failed",
        }
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result { f.write_str(self.as_str()) }
}

/// How a source locator is satisfied.
#[derive(Debug, Clone, PartialEq, Eq)]
enum Source {
    Local(PathBuf),
    Remote(String),
}

impl Source {
    /// Local when the expanded locator names an existing file, remote otherwise.
    fn classify(locator: String) -> Self {
        let path = Path::new(&locator);
        if path.is_file() {
            Source::Local(path.to_path_buf())
        } else {
            Source::Remote(locator)
        }
    }
}

/// Result of re-checking an acquired file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Verification {
    /// The declared digest matched.
    Verified { digest: String },
    /// No digest is declared; the MD5 of the file is given for reference.
    Unchecked { md5: String },
}

/// Acquires catalog datasets into `dest_dir` and hands them to a loader.
///
/// # Examples
///
/// ```no_run
/// use sapdata::{Catalog, Orchestrator};
/// use sapdata_fetch::SchemeTransport;
///
/// let transport = SchemeTransport::new(None)?;
/// let mut orchestrator = Orchestrator::new(Catalog::builtin()?, "/tmp/sapdata", transport);
/// let dataset = orchestrator.get_sample_data("astro-fits")?;
/// println!("{} bytes at {}", dataset.size, dataset.path.display());
/// # Ok::<(), sapdata::Error>(())
/// ```
pub struct Orchestrator<T: Transport, L: Loader = PathLoader> {
    catalog:      Arc<Catalog>,
    dest_dir:     PathBuf,
    locator_vars: BTreeMap<String, String>,
    fetcher:      Fetcher<T>,
    loader:       L,
    reporter:     Box<dyn Reporter>,
}

impl<T: Transport> Orchestrator<T, PathLoader> {
    pub fn new(catalog: Arc<Catalog>, dest_dir: impl Into<PathBuf>, transport: T) -> Self {
        Self {
            catalog,
            dest_dir: dest_dir.into(),
            locator_vars: BTreeMap::new(),
            fetcher: Fetcher::new(transport),
            loader: PathLoader,
            reporter: Box::new(NoopReporter),
        }
    }
}

impl<T: Transport, L: Loader> Orchestrator<T, L> {
    #[must_use]
    pub fn with_loader<M: Loader>(self, loader: M) -> Orchestrator<T, M> {
        Orchestrator {
            catalog: self.catalog,
            dest_dir: self.dest_dir,
            locator_vars: self.locator_vars,
            fetcher: self.fetcher,
            loader,
            reporter: self.reporter,
        }
    }

    #[must_use]
    pub fn with_options(mut self, options: FetchOptions) -> Self {
        self.fetcher = self.fetcher.with_options(options);
        self
    }

    #[must_use]
    pub fn with_reporter(mut self, reporter: impl Reporter + 'static) -> Self {
        self.reporter = Box::new(reporter);
        self
    }

    #[must_use]
    pub fn with_locator_vars(mut self, vars: BTreeMap<String, String>) -> Self {
        self.locator_vars = vars;
        self
    }

    pub fn catalog(&self) -> &Catalog { &self.catalog }

    pub fn dest_dir(&self) -> &Path { &self.dest_dir }

    pub fn options(&self) -> &FetchOptions { self.fetcher.options() }

    pub fn transport(&self) -> &T { self.fetcher.transport() }

    pub fn loader(&self) -> &L { &self.loader }

    /// Acquire `name` into the data directory and return its verified path.
    ///
    /// A digest mismatch fails with [`Error::IntegrityMismatch`] and leaves the
    /// file where it is.
    pub fn acquire(&mut self, name: &str) -> Result<PathBuf> {
        let catalog = Arc::clone(&self.catalog);
        let entry = catalog.get(name)?;
        self.acquire_entry(entry).inspect_err(|e| failed(name, e))
    }

    /// Acquire `name` and load it with the configured loader.
    pub fn get_sample_data(&mut self, name: &str) -> Result<L::Dataset> {
        let catalog = Arc::clone(&self.catalog);
        let entry = catalog.get(name)?;
        self.acquire_entry(entry)
            .and_then(|path| {
                stage(name, Stage::Load);
                let dataset = self
                    .loader
                    .load(&path, &entry.options)
                    .map_err(|e| Error::Load {
                        path,
                        source: Box::new(e),
                    })?;
                stage(name, Stage::Done);
                Ok(dataset)
            })
            .inspect_err(|e| failed(name, e))
    }

    /// Re-check the already acquired file of `name`.
    pub fn verify(&self, name: &str) -> Result<Verification> {
        let entry = self.catalog.get(name)?;
        let path = self.local_path(entry)?;
        match &entry.digest {
            Some(expected) => {
                let digest = verify_file(&path, expected).inspect_err(|e| {
                    tracing::warn!(dataset = name, error = %e, "verification failed");
                })?;
                Ok(Verification::Verified { digest })
            }
            None => Ok(Verification::Unchecked {
                md5: digest_of(&path, HashAlgorithm::Md5)?,
            }),
        }
    }

    /// Path the dataset occupies, or will occupy, in the data directory.
    pub fn local_path(&self, entry: &DatasetEntry) -> Result<PathBuf> {
        let name = match Source::classify(entry.resolve_source(&self.locator_vars)?) {
            Source::Local(path) => path
                .file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .ok_or(sapdata_fs::Error::NoFileName(path.clone()))?,
            Source::Remote(url) => {
                let parsed = Url::parse(&url).map_err(|e| sapdata_fetch::FetchError::InvalidUrl {
                    url:    url.clone(),
                    reason: e.to_string(),
                })?;
                sapdata_fetch::file_name_of(&parsed)?
            }
        };
        Ok(self.dest_dir.join(name))
    }

    fn acquire_entry(&mut self, entry: &DatasetEntry) -> Result<PathBuf> {
        let name = entry.name.as_str();
        stage(name, Stage::Start);

        let overwrite = self.fetcher.options().overwrite;
        let path = match Source::classify(entry.resolve_source(&self.locator_vars)?) {
            Source::Local(src) => {
                stage(name, Stage::LocalCopy);
                copy_local(&src, &self.dest_dir, CopyOptions::new().overwrite(overwrite))?
            }
            Source::Remote(url) => {
                stage(name, Stage::Download);
                self.fetcher
                    .fetch(&url, &self.dest_dir, &mut *self.reporter)?
            }
        };

        if let Some(expected) = &entry.digest {
            stage(name, Stage::Verify);
            verify_file(&path, expected)?;
            tracing::debug!(dataset = name, digest = %expected, "checksum verified");
        }
        Ok(path)
    }
}

fn stage(name: &str, stage: Stage) { tracing::debug!(dataset = name, %stage, "acquisition"); }

fn failed(name: &str, error: &Error) {
    tracing::warn!(dataset = name, stage = %Stage::Failed, %error, "acquisition");
}

/// Fetch `name` from the builtin catalog into `dest_dir` and return it.
///
/// Uses the HTTP/FTP transports without a timeout, resuming partial
/// downloads and drawing a progress bar on standard output.
pub fn get_sample_data(name: &str, dest_dir: impl Into<PathBuf>) -> Result<LoadedDataset> {
    let transport = SchemeTransport::new(None)?;
    Orchestrator::new(Catalog::builtin()?, dest_dir, transport)
        .with_reporter(BarReporter::stdout())
        .get_sample_data(name)
}
