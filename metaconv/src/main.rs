use std::path::PathBuf;

use anyhow::{Result, bail};
use clap::Parser;
use metaconv::core::{
    Convention, DEFAULT_EXTENSION, DEFAULT_SOURCE_MARKER, DEFAULT_TARGET_MARKER, UnbalancedPolicy,
};
use metaconv::runner::{self, ErrorPolicy, FileOutcome, RunOptions, RunReport};
use metaconv::storage::FsDocumentStore;
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
#[command(
    name = "metaconv",
    about = "Rewrite `---` front matter blocks into `+++` assignment blocks, in place",
    version
)]
struct Cli {
    /// Files or directories to convert. Directories are searched recursively.
    #[arg(default_value = ".")]
    roots: Vec<PathBuf>,
    /// Document suffix to look for, without the leading dot.
    #[arg(long, default_value = DEFAULT_EXTENSION)]
    extension: String,
    /// Line that opens and closes a block in the input.
    #[arg(long, default_value = DEFAULT_SOURCE_MARKER, allow_hyphen_values = true)]
    from_marker: String,
    /// Line written in place of every input marker.
    #[arg(long, default_value = DEFAULT_TARGET_MARKER, allow_hyphen_values = true)]
    to_marker: String,
    /// Convert documents whose last block is never closed instead of failing them.
    #[arg(long)]
    allow_unbalanced: bool,
    /// Keep converting the remaining documents after one fails.
    #[arg(long)]
    keep_going: bool,
    /// Report what would change without writing anything.
    #[arg(long)]
    dry_run: bool,
    /// Emit the run report as JSON.
    #[arg(long)]
    json: bool,
    /// Do not print a line per processed document.
    #[arg(long)]
    quiet: bool,
    /// Enable verbose logging for debugging.
    #[arg(long)]
    verbose: bool,
}

impl Cli {
    fn run_options(&self) -> Result<RunOptions> {
        let convention = Convention::new(
            self.from_marker.clone(),
            self.to_marker.clone(),
            self.extension.clone(),
        )?;
        Ok(RunOptions {
            convention,
            unbalanced: if self.allow_unbalanced {
                UnbalancedPolicy::Warn
            } else {
                UnbalancedPolicy::Reject
            },
            on_error: if self.keep_going {
                ErrorPolicy::Continue
            } else {
                ErrorPolicy::Abort
            },
            dry_run: self.dry_run,
        })
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let options = cli.run_options()?;
    let show_progress = !(cli.quiet || cli.json);
    let report = runner::run(&FsDocumentStore, &cli.roots, &options, |path| {
        if show_progress {
            println!("processing {}", path.display());
        }
    })?;

    if report.is_empty() {
        eprintln!(
            "No .{} files found in the provided inputs.",
            options.convention.extension
        );
    }

    if cli.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        print_summary(&report, cli.dry_run);
    }

    let failures = report.failures();
    if failures > 0 {
        bail!(
            "{} of {} documents failed to convert",
            failures,
            report.files.len()
        );
    }
    Ok(())
}

fn init_logging(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}

fn print_summary(report: &RunReport, dry_run: bool) {
    for outcome in report.files.values() {
        if let FileOutcome::Failed { error } = outcome {
            eprintln!("error: {error}");
        }
    }
    if dry_run {
        for path in report.changed() {
            println!("would rewrite {}", path.display());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;
    use std::ffi::OsString;
    use std::fs;

    #[test]
    fn cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn defaults_match_yaml_to_toml_conversion() {
        let cli = Cli::try_parse_from(["metaconv"]).expect("parse");
        assert_eq!(cli.roots, vec![PathBuf::from(".")]);

        let options = cli.run_options().expect("options");
        assert_eq!(options, RunOptions::default());
    }

    #[test]
    fn flags_map_onto_run_options() {
        let cli = Cli::try_parse_from([
            "metaconv",
            "--from-marker",
            "~~~",
            "--to-marker",
            "===",
            "--extension",
            "md",
            "--allow-unbalanced",
            "--keep-going",
            "--dry-run",
            "content",
            "drafts",
        ])
        .expect("parse");

        let options = cli.run_options().expect("options");
        assert_eq!(options.convention.source_marker, "~~~");
        assert_eq!(options.convention.target_marker, "===");
        assert_eq!(options.convention.extension, "md");
        assert_eq!(options.unbalanced, UnbalancedPolicy::Warn);
        assert_eq!(options.on_error, ErrorPolicy::Continue);
        assert!(options.dry_run);
        assert_eq!(
            cli.roots,
            vec![PathBuf::from("content"), PathBuf::from("drafts")]
        );
    }

    #[test]
    fn markers_starting_with_hyphens_are_accepted_as_values() {
        let cli = Cli::try_parse_from(["metaconv", "--from-marker", "---", "--to-marker", "+++"])
            .expect("parse");
        assert_eq!(cli.from_marker, "---");
    }

    #[test]
    fn invalid_extension_is_reported() {
        let cli = Cli::try_parse_from(["metaconv", "--extension", ".md"]).expect("parse");
        let err = cli.run_options().unwrap_err();
        assert!(err.to_string().contains("without a leading dot"));
    }

    #[test]
    fn cli_options_drive_a_full_run() {
        let tmp = tempfile::tempdir().expect("tempdir");
        let post = tmp.path().join("post.markdown");
        fs::write(&post, "---\ntitle: Hi\n---\nBody\n").expect("write post");

        let cli = Cli::try_parse_from([
            OsString::from("metaconv"),
            OsString::from("--quiet"),
            tmp.path().as_os_str().to_owned(),
        ])
        .expect("parse");
        let options = cli.run_options().expect("options");
        let report = runner::run(&FsDocumentStore, &cli.roots, &options, |_| {}).expect("run");

        assert_eq!(report.files.len(), 1);
        assert_eq!(
            fs::read_to_string(&post).expect("read post"),
            "+++\ntitle = \"Hi\"\n+++\nBody"
        );
    }
}
