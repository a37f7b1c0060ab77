//! Cleaning files and directories on disk.

use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

use ignore::WalkBuilder;
use rayon::prelude::*;

use crate::encoding::decode_svg;
use crate::error::ScrubError;
use crate::{Options, clean_with_options};

/// Where cleaned files go.
#[derive(Debug, Clone, Default)]
pub struct BatchOptions {
    /// Output file, for a single input file
    pub output: Option<PathBuf>,
    /// Output directory. Takes precedence over `output`.
    pub out_dir: Option<PathBuf>,
    /// Descend into subdirectories of a directory input
    pub recursive: bool,
}

/// One file to clean.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Job {
    pub src: PathBuf,
    pub dst: PathBuf,
}

/// The files an invocation will process.
#[derive(Debug, Clone)]
pub enum Plan {
    Single(Job),
    Directory { out_dir: PathBuf, jobs: Vec<Job> },
}

/// What a finished run did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Summary {
    Wrote(PathBuf),
    Processed {
        count: usize,
        failed: usize,
        out_dir: PathBuf,
    },
}

impl Summary {
    pub fn failed(&self) -> usize {
        match self {
            Summary::Wrote(_) => 0,
            Summary::Processed { failed, .. } => *failed,
        }
    }
}

impl fmt::Display for Summary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Summary::Wrote(path) => write!(f, "Wrote {}", path.display()),
            Summary::Processed {
                count,
                failed,
                out_dir,
            } => {
                write!(f, "Processed {} file(s) into {}", count, out_dir.display())?;
                if *failed > 0 {
                    write!(f, " ({} failed)", failed)?;
                }
                Ok(())
            }
        }
    }
}

/// Work out the source and destination of every file to clean.
pub fn plan(input: &Path, batch: &BatchOptions) -> Result<Plan, ScrubError> {
    if !input.exists() {
        return Err(ScrubError::InputNotFound(input.to_path_buf()));
    }

    if !input.is_dir() {
        let dst = if let Some(out_dir) = &batch.out_dir {
            out_dir.join(input.file_name().unwrap_or(input.as_os_str()))
        } else if let Some(output) = &batch.output {
            output.clone()
        } else {
            input.with_extension("clean.svg")
        };
        return Ok(Plan::Single(Job {
            src: input.to_path_buf(),
            dst,
        }));
    }

    if batch.output.is_some() {
        log::warn!("--output only applies to a single input file, ignoring it");
    }
    let out_dir = match &batch.out_dir {
        Some(dir) => dir.clone(),
        None => default_out_dir(input)?,
    };

    let mut jobs = Vec::new();
    for src in find_svgs(input, batch.recursive)? {
        let rel = if batch.recursive {
            src.strip_prefix(input).unwrap_or(&src).to_path_buf()
        } else {
            PathBuf::from(src.file_name().unwrap_or(src.as_os_str()))
        };
        jobs.push(Job {
            dst: out_dir.join(rel),
            src,
        });
    }

    Ok(Plan::Directory { out_dir, jobs })
}

/// `path/to/icons` -> `path/to/icons_cleaned`
fn default_out_dir(input: &Path) -> Result<PathBuf, ScrubError> {
    let input = match input.file_name() {
        Some(_) => input.to_path_buf(),
        None => input.canonicalize()?,
    };
    let name = input
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    Ok(input.with_file_name(format!("{}_cleaned", name)))
}

/// `.svg` files directly in `dir`, or anywhere below it when `recursive`.
fn find_svgs(dir: &Path, recursive: bool) -> Result<Vec<PathBuf>, ScrubError> {
    let walker = WalkBuilder::new(dir)
        .standard_filters(false)
        .max_depth(if recursive { None } else { Some(1) })
        .sort_by_file_name(|a, b| a.cmp(b))
        .build();

    let mut found = Vec::new();
    for entry in walker {
        let path = entry?.into_path();
        if path.is_file() && path.extension().is_some_and(|e| e == "svg") {
            found.push(path);
        }
    }
    Ok(found)
}

/// Clean one file and write the result, creating parent directories.
pub fn clean_file(job: &Job, options: &Options) -> Result<(), ScrubError> {
    let bytes = fs::read(&job.src)?;
    let text = decode_svg(&bytes)?;

    let cleaned = clean_with_options(&text, options)?;

    if let Some(parent) = job.dst.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }
    fs::write(&job.dst, cleaned)?;

    log::debug!("{} -> {}", job.src.display(), job.dst.display());
    Ok(())
}

/// Clean everything `plan` finds for `input`.
///
/// Files in a directory are cleaned in parallel. A file that fails is logged
/// and counted; it does not stop the others. A single input file that fails is
/// an error.
pub fn run(input: &Path, batch: &BatchOptions, options: &Options) -> Result<Summary, ScrubError> {
    match plan(input, batch)? {
        Plan::Single(job) => {
            clean_file(&job, options)?;
            Ok(Summary::Wrote(job.dst))
        }
        Plan::Directory { out_dir, jobs } => {
            let failed = jobs
                .par_iter()
                .filter(|job| match clean_file(job, options) {
                    Ok(()) => false,
                    Err(e) => {
                        log::warn!("failed to clean {}: {}", job.src.display(), e);
                        true
                    }
                })
                .count();

            Ok(Summary::Processed {
                count: jobs.len() - failed,
                failed,
                out_dir,
            })
        }
    }
}
