use std::io::IsTerminal;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use sapdata::{Orchestrator, Settings, Verification};
use sapdata_fetch::{BarReporter, FetchOptions, FetchOutcome, Fetcher, Reporter, SchemeTransport, TrackerReporter};
use sapdata_verify::{HashAlgorithm, digest_of};
use tabled::Tabled;

use super::table::Formatter;

#[derive(Clone, Debug, Parser)]
#[command(name = "sapdata", version = env!("CARGO_PKG_VERSION"), about, long_about = None, propagate_version = true)]
pub struct App {
    #[command(subcommand)]
    pub cmd: Commands,
}

#[derive(Clone, Debug, Subcommand)]
pub enum Commands {
    #[command(alias = "ls", name = "list", about = "List the known sample datasets")]
    List(ListArg),
    #[command(alias = "g", name = "get", about = "Acquire, verify and locate a sample dataset")]
    Get(GetArg),
    #[command(name = "verify", about = "Re-check an acquired dataset against its digest")]
    Verify(VerifyArg),
    #[command(name = "digest", about = "Print the digest of a local file")]
    Digest(DigestArg),
    #[command(name = "fetch", about = "Download a URL into the data directory")]
    Fetch(FetchArg),
}

impl App {
    pub fn run(self) -> Result<()> {
        let settings = Settings::load().context("failed to load settings")?;
        match self.cmd {
            Commands::List(arg) => arg.run(&settings),
            Commands::Get(arg) => arg.run(settings),
            Commands::Verify(arg) => arg.run(settings),
            Commands::Digest(arg) => arg.run(),
            Commands::Fetch(arg) => arg.run(settings),
        }
    }
}

#[derive(Clone, Debug, Args)]
pub struct TransferArgs {
    /// Directory holding acquired datasets
    #[arg(long, short = 'd', value_name = "DIR")]
    data_dir:  Option<PathBuf>,
    /// Replace existing files instead of reusing them
    #[arg(long)]
    overwrite: bool,
    /// Restart partial downloads instead of resuming them
    #[arg(long)]
    no_resume: bool,
    /// Network timeout in seconds
    #[arg(long, value_name = "SECS")]
    timeout:   Option<u64>,
}

impl TransferArgs {
    fn settings(&self, mut settings: Settings) -> Settings {
        if let Some(dir) = &self.data_dir {
            settings.data_dir = dir.clone();
        }
        if self.no_resume {
            settings.resume = false;
        }
        if self.timeout.is_some() {
            settings.timeout_secs = self.timeout;
        }
        settings
    }

    fn options(&self, settings: &Settings) -> FetchOptions { settings.fetch_options().overwrite(self.overwrite) }
}

fn reporter() -> Box<dyn Reporter> {
    if std::io::stdout().is_terminal() {
        Box::new(TrackerReporter::new())
    } else {
        Box::new(BarReporter::stdout())
    }
}

#[derive(Clone, Debug, Args)]
pub struct ListArg {}

#[derive(Tabled)]
struct DatasetRow {
    name:    String,
    digest:  String,
    options: String,
    source:  String,
}

impl ListArg {
    fn run(self, settings: &Settings) -> Result<()> {
        let catalog = settings.catalog()?;
        let rows = catalog.entries().iter().map(|entry| DatasetRow {
            name:    entry.name.clone(),
            digest:  entry
                .digest
                .as_ref()
                .map_or_else(|| "-".to_string(), |d| d.algorithm().to_string()),
            options: entry.options.to_string(),
            source:  entry.source.clone(),
        });

        let table = Formatter {
            footer: Some(format!("{} datasets, stored in {}", catalog.len(), settings.data_dir.display())),
        }
        .build(rows);
        println!("{table}");
        Ok(())
    }
}

#[derive(Clone, Debug, Args)]
pub struct GetArg {
    /// Dataset name, see `sapdata list`
    name:     String,
    #[command(flatten)]
    transfer: TransferArgs,
}

impl GetArg {
    fn run(self, settings: Settings) -> Result<()> {
        let settings = self.transfer.settings(settings);
        let options = self.transfer.options(&settings);
        let transport = SchemeTransport::new(options.timeout)?;

        let mut orchestrator = Orchestrator::new(settings.catalog()?, settings.data_dir.clone(), transport)
            .with_options(options)
            .with_locator_vars(settings.locator_vars.clone())
            .with_reporter(reporter());
        let dataset = orchestrator
            .get_sample_data(&self.name)
            .with_context(|| format!("failed to get sample data '{}'", self.name))?;

        tracing::info!(dataset = %self.name, bytes = dataset.size, "ready");
        println!("{}", dataset.path.display());
        Ok(())
    }
}

#[derive(Clone, Debug, Args)]
pub struct VerifyArg {
    /// Dataset name, see `sapdata list`
    name:     String,
    /// Directory holding acquired datasets
    #[arg(long, short = 'd', value_name = "DIR")]
    data_dir: Option<PathBuf>,
}

impl VerifyArg {
    fn run(self, settings: Settings) -> Result<()> {
        let data_dir = self.data_dir.unwrap_or_else(|| settings.data_dir.clone());
        let orchestrator = Orchestrator::new(settings.catalog()?, data_dir, SchemeTransport::new(None)?)
            .with_locator_vars(settings.locator_vars.clone());

        match orchestrator
            .verify(&self.name)
            .with_context(|| format!("failed to verify '{}'", self.name))?
        {
            Verification::Verified { digest } => println!("{}: OK ({digest})", self.name),
            Verification::Unchecked { md5 } => println!("{}: no digest declared (md5 {md5})", self.name),
        }
        Ok(())
    }
}

#[derive(Clone, Debug, Args)]
pub struct DigestArg {
    /// File to hash
    path:      PathBuf,
    #[arg(long, short = 'a', default_value = "md5", value_name = "ALGORITHM")]
    algorithm: HashAlgorithm,
}

impl DigestArg {
    fn run(self) -> Result<()> {
        let digest = digest_of(&self.path, self.algorithm)?;
        println!("{digest}  {}", self.path.display());
        Ok(())
    }
}

#[derive(Clone, Debug, Args)]
pub struct FetchArg {
    /// HTTP, HTTPS or FTP URL
    url:      String,
    #[command(flatten)]
    transfer: TransferArgs,
}

impl FetchArg {
    fn run(self, settings: Settings) -> Result<()> {
        let settings = self.transfer.settings(settings);
        let options = self.transfer.options(&settings);
        let fetcher = Fetcher::new(SchemeTransport::new(options.timeout)?).with_options(options);

        let report = fetcher.fetch_with_report(&self.url, &settings.data_dir, &mut reporter())?;
        match report.outcome {
            FetchOutcome::AlreadyPresent => tracing::info!("already downloaded"),
            FetchOutcome::Restarted => tracing::warn!("server refused to resume, downloaded from scratch"),
            _ => {}
        }
        println!("{}", report.path.display());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_is_well_formed() { App::command().debug_assert(); }

    #[test]
    fn test_parse_get() {
        let app = App::try_parse_from(["sapdata", "get", "mri-mask", "--no-resume", "--timeout", "30", "-d", "/tmp/x"])
            .unwrap();
        let Commands::Get(arg) = app.cmd else { panic!("expected get") };
        assert_eq!(arg.name, "mri-mask");

        let settings = arg.transfer.settings(Settings::default());
        assert_eq!(settings.data_dir, PathBuf::from("/tmp/x"));
        let options = arg.transfer.options(&settings);
        assert!(!options.resume);
        assert!(!options.overwrite);
        assert_eq!(options.timeout, Some(std::time::Duration::from_secs(30)));
    }

    #[test]
    fn test_parse_digest_algorithm() {
        let app = App::try_parse_from(["sapdata", "digest", "a.npy", "--algorithm", "sha256"]).unwrap();
        let Commands::Digest(arg) = app.cmd else { panic!("expected digest") };
        assert_eq!(arg.algorithm, HashAlgorithm::Sha256);

        assert!(App::try_parse_from(["sapdata", "digest", "a.npy", "-a", "crc32"]).is_err());
    }

    #[test]
    fn test_list_alias() {
        let app = App::try_parse_from(["sapdata", "ls"]).unwrap();
        assert!(matches!(app.cmd, Commands::List(_)));
    }
}
