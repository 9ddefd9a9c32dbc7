//! The dataset catalog: named sources with optional digests and loader options.

use std::collections::BTreeMap;
use std::sync::Arc;

use once_cell::sync::Lazy;
use sapdata_verify::Checksum;
use serde::{Deserialize, Serialize};

use crate::{Error, LoaderOptions, OptionValue, Result};

const CEA_FTP: &str = "ftp://ftp.cea.fr/pub/unati/nsap/pysap/datasets";

/// One named sample dataset.
#[derive(Debug, Clone, PartialEq)]
pub struct DatasetEntry {
    /// Exact-match, case-sensitive key.
    pub name:    String,
    /// URL or filesystem path, possibly containing `{KEY}` placeholders.
    pub source:  String,
    /// `None` trusts whatever the first acquisition produced.
    pub digest:  Option<Checksum>,
    pub options: LoaderOptions,
}

impl DatasetEntry {
    pub fn new(name: impl Into<String>, source: impl Into<String>) -> Self {
        Self {
            name:    name.into(),
            source:  source.into(),
            digest:  None,
            options: LoaderOptions::new(),
        }
    }

    #[must_use]
    pub fn digest(mut self, digest: Checksum) -> Self {
        self.digest = Some(digest);
        self
    }

    #[must_use]
    pub fn option(mut self, key: impl Into<String>, value: impl Into<OptionValue>) -> Self {
        self.options.insert(key, value);
        self
    }

    /// The source with every `{KEY}` placeholder replaced from `vars`.
    ///
    /// Braces that do not enclose an identifier are kept literally. An
    /// identifier with no value in `vars` is an error.
    pub fn resolve_source(&self, vars: &BTreeMap<String, String>) -> Result<String> {
        expand(&self.source, vars).map_err(|key| {
            Error::Catalog(format!(
                "unknown locator variable '{{{key}}}' in source of '{}'",
                self.name
            ))
        })
    }
}

fn expand(template: &str, vars: &BTreeMap<String, String>) -> std::result::Result<String, String> {
    let mut out = String::with_capacity(template.len());
    let mut rest = template;
    while let Some(open) = rest.find('{') {
        out.push_str(&rest[..open]);
        let after = &rest[open + 1..];
        let Some(close) = after.find('}') else {
            out.push_str(&rest[open..]);
            return Ok(out);
        };
        let key = &after[..close];
        if key.is_empty() || !key.chars().all(|c| c.is_ascii_alphanumeric() || c == '_') {
            out.push('{');
            rest = after;
            continue;
        }
        match vars.get(key) {
            Some(value) => out.push_str(value),
            None => return Err(key.to_string()),
        }
        rest = &after[close + 1..];
    }
    out.push_str(rest);
    Ok(out)
}

/// A dataset declared in a configuration file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct DatasetSpec {
    pub source:  String,
    #[serde(default)]
    pub digest:  Option<String>,
    #[serde(default)]
    pub options: LoaderOptions,
}

impl DatasetSpec {
    pub fn into_entry(self, name: impl Into<String>) -> Result<DatasetEntry> {
        let name = name.into();
        let digest = self
            .digest
            .map(|d| d.parse::<Checksum>())
            .transpose()
            .map_err(|e| Error::Catalog(format!("dataset '{name}': {e}")))?;
        Ok(DatasetEntry {
            name,
            source: self.source,
            digest,
            options: self.options,
        })
    }
}

/// Immutable set of uniquely named datasets, in declaration order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Catalog {
    entries: Vec<DatasetEntry>,
}

impl Catalog {
    /// Build a catalog, rejecting duplicate names.
    pub fn new(entries: impl IntoIterator<Item = DatasetEntry>) -> Result<Self> {
        let mut catalog = Catalog::default();
        for entry in entries {
            catalog.push(entry)?;
        }
        Ok(catalog)
    }

    /// The shipped sample datasets.
    pub fn builtin() -> Result<Arc<Catalog>> {
        BUILTIN
            .clone()
            .ok_or_else(|| Error::Catalog("builtin catalog is malformed".to_string()))
    }

    fn push(&mut self, entry: DatasetEntry) -> Result<()> {
        if self.contains(&entry.name) {
            return Err(Error::Catalog(format!("duplicate dataset name '{}'", entry.name)));
        }
        self.entries.push(entry);
        Ok(())
    }

    /// A copy of this catalog extended with `extra`; names must stay unique.
    pub fn merged(&self, extra: impl IntoIterator<Item = DatasetEntry>) -> Result<Catalog> {
        let mut catalog = self.clone();
        for entry in extra {
            catalog.push(entry)?;
        }
        Ok(catalog)
    }

    /// Look up `name`, failing with every valid name when it is unknown.
    pub fn get(&self, name: &str) -> Result<&DatasetEntry> {
        self.entries
            .iter()
            .find(|e| e.name == name)
            .ok_or_else(|| Error::NotFound {
                name:      name.to_string(),
                available: self.names().map(str::to_string).collect(),
            })
    }

    pub fn contains(&self, name: &str) -> bool { self.entries.iter().any(|e| e.name == name) }

    pub fn names(&self) -> impl Iterator<Item = &str> { self.entries.iter().map(|e| e.name.as_str()) }

    pub fn entries(&self) -> &[DatasetEntry] { &self.entries }

    pub fn len(&self) -> usize { self.entries.len() }

    pub fn is_empty(&self) -> bool { self.entries.is_empty() }
}

static BUILTIN: Lazy<Option<Arc<Catalog>>> = Lazy::new(|| {
    let cea = |file: &str| format!("{CEA_FTP}/{file}");
    let md5 = |hex: &str| Checksum::md5(hex).ok();

    let entries = vec![
        DatasetEntry::new("dict-learn-dataset", cea("training_database.npy"))
            .digest(md5("4fa7669901cfeef410429be8640b594a")?),
        DatasetEntry::new("3d-pmri", cea("orange_phantom_3d_pmri_images.npy"))
            .digest(md5("e4ac268fde0226c6fdcf2e9b62b240f0")?)
            .option("dtype", "complex"),
        DatasetEntry::new("2d-pmri", cea("orange_phantom_pmri_images.npy"))
            .digest(md5("b5cbfe5bb46a050ccc66cab244bf478e")?)
            .option("dtype", "complex"),
        DatasetEntry::new("mri-radial-3d-samples", cea("samples_3D_radial_spi_N256_nc1997x3073.mat"))
            .digest(md5("0324b15ed8368e20fe7315281f31b6e6")?)
            .option("image_field", "samples"),
        DatasetEntry::new("mri-radial-samples", cea("samples_radial_GA_nc64_512.npy"))
            .digest(md5("07b006ef003b825086880a663dfcdb6d")?),
        DatasetEntry::new("mri-nifti", cea("t1_localizer.nii.gz"))
            .digest(md5("9617b36e5510a4783038c63241da21d4")?),
        DatasetEntry::new("mri-slice-nifti", cea("BrainPhantom512.nii.gz"))
            .digest(md5("19983e6003ae94487d03131f4bacae2e")?),
        DatasetEntry::new("mri-mask", cea("mask_BrainPhantom512.nii.gz"))
            .digest(md5("078760d89e737e69b5578d47e368c42f")?),
        DatasetEntry::new("astro-fits", cea("M31_128.fits")),
        DatasetEntry::new("astro-mask", cea("mask25_sig40.fits"))
            .digest(md5("8d7fd9b4d7c2aaf407fa1331860a130f")?),
        DatasetEntry::new("astro-galaxy", cea("example_galaxy_image.npy")),
        DatasetEntry::new("astro-psf", cea("example_psf_image.npy")),
        DatasetEntry::new(
            "astro-ngc2997",
            "https://github.com/CEA-COSMIC/pysap-data/blob/master/pysap-data/ngc2997.fits",
        ),
    ];

    Catalog::new(entries).ok().map(Arc::new)
});
