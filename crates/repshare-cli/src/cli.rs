use std::path::PathBuf;

use clap::{ArgGroup, Parser, ValueEnum};
use repshare_scan::{CategorySelection, InconsistencyPolicy};

/// At least one of --data/--prop/--both must be given; clap enforces this
/// (with usage text and a non-zero exit) before any store access.
#[derive(Debug, Parser)]
#[command(
    name = "repshare",
    about = "Prints reference count statistics for shared representations in a revlog store",
    version,
    group(ArgGroup::new("category").required(true).multiple(true)),
)]
pub struct Cli {
    /// Store to analyze (opened read-only)
    pub store_path: PathBuf,

    /// Display data reps stats
    #[arg(long, group = "category")]
    pub data: bool,

    /// Display prop reps stats
    #[arg(long, group = "category")]
    pub prop: bool,

    /// Display combined (data+prop) reps stats
    #[arg(long, group = "category")]
    pub both: bool,

    /// No progress (only errors) to stderr
    #[arg(short, long)]
    pub quiet: bool,

    /// Reaction to two references disagreeing on a representation's digest
    #[arg(long, value_enum, default_value = "fatal")]
    pub on_inconsistency: OnInconsistency,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum OnInconsistency {
    /// Abort the run (the store's content-addressing is broken)
    Fatal,
    /// Warn, keep the first digest, and keep counting
    Warn,
}

impl Cli {
    /// `--both` implies both kinds are tracked; the merged tally follows
    /// from tracking both.
    pub fn selection(&self) -> CategorySelection {
        CategorySelection {
            data: self.data || self.both,
            prop: self.prop || self.both,
        }
    }

    pub fn policy(&self) -> InconsistencyPolicy {
        match self.on_inconsistency {
            OnInconsistency::Fatal => InconsistencyPolicy::Fatal,
            OnInconsistency::Warn => InconsistencyPolicy::Warn,
        }
    }
}
