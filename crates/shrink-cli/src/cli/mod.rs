//! CLI for the shrink batch compressor.

mod commands;
mod format;

use anyhow::Result;
use clap::{Parser, Subcommand};
use shrink_core::config::{self, OutputMode, ShrinkConfig};
use std::path::PathBuf;

use commands::{run_batch, run_scan};

/// Top-level CLI for shrink.
#[derive(Debug, Parser)]
#[command(name = "shrink")]
#[command(about = "shrink: compress batches of files concurrently with zstd", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: CliCommand,
}

#[derive(Debug, Subcommand)]
pub enum CliCommand {
    /// Queue files (and directory contents) and compress them, showing live progress.
    Run {
        /// Files or directories to compress.
        #[arg(required = true, value_name = "PATH")]
        paths: Vec<PathBuf>,
        /// Descend into subdirectories.
        #[arg(short, long)]
        recursive: bool,
        /// Only pick up files with this extension (repeatable). Overrides the config list.
        #[arg(long = "ext", value_name = "EXT")]
        extensions: Vec<String>,
        /// Number of concurrent workers (default from config).
        #[arg(short, long, value_name = "N")]
        jobs: Option<usize>,
        /// zstd compression level (default from config).
        #[arg(long, value_name = "LEVEL", allow_hyphen_values = true)]
        level: Option<i32>,
        /// Write compressed files into this directory instead of next to the source.
        #[arg(long, value_name = "DIR")]
        output_dir: Option<PathBuf>,
        /// Delete each source file once its compressed copy is in place.
        #[arg(long)]
        replace: bool,
    },

    /// List the files `run` would queue, without compressing anything.
    Scan {
        /// Files or directories to scan.
        #[arg(required = true, value_name = "PATH")]
        paths: Vec<PathBuf>,
        /// Descend into subdirectories.
        #[arg(short, long)]
        recursive: bool,
        /// Only list files with this extension (repeatable).
        #[arg(long = "ext", value_name = "EXT")]
        extensions: Vec<String>,
    },
}

/// Command-line values that take precedence over the config file.
#[derive(Debug, Default)]
pub struct Overrides {
    pub recursive: bool,
    pub extensions: Vec<String>,
    pub jobs: Option<usize>,
    pub level: Option<i32>,
    pub output_dir: Option<PathBuf>,
    pub replace: bool,
}

impl Overrides {
    pub fn apply(self, cfg: &mut ShrinkConfig) {
        if self.recursive {
            cfg.recursive = true;
        }
        if !self.extensions.is_empty() {
            cfg.extensions = self.extensions;
        }
        if let Some(jobs) = self.jobs {
            cfg.workers = jobs.max(1);
        }
        if let Some(level) = self.level {
            cfg.level = level;
        }
        if self.output_dir.is_some() {
            cfg.output_dir = self.output_dir;
        }
        if self.replace {
            cfg.output_mode = OutputMode::Replace;
        }
    }
}

impl CliCommand {
    pub async fn run_from_args() -> Result<()> {
        let cli = Cli::parse();
        let mut cfg = config::load_or_init()?;
        tracing::debug!("loaded config: {:?}", cfg);

        match cli.command {
            CliCommand::Run {
                paths,
                recursive,
                extensions,
                jobs,
                level,
                output_dir,
                replace,
            } => {
                Overrides {
                    recursive,
                    extensions,
                    jobs,
                    level,
                    output_dir,
                    replace,
                }
                .apply(&mut cfg);
                run_batch(&cfg, &paths).await?;
            }
            CliCommand::Scan {
                paths,
                recursive,
                extensions,
            } => {
                Overrides {
                    recursive,
                    extensions,
                    ..Default::default()
                }
                .apply(&mut cfg);
                run_scan(&cfg, &paths)?;
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests;
