//! Batch conversion driver
//!
//! Resolves the inputs of a `single`, `multi` or `dir` invocation into
//! [`ConvertJob`]s and runs them. Jobs are independent, so batches run on the
//! rayon pool.

use crate::error::ConvertError;
use crate::mesh::{self, DecodeOutcome, Rejection, mesh_name};
use rayon::prelude::*;
use std::fs;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// Extension of converted files
pub const OBJ_EXT: &str = "obj";

/// One input file and the OBJ path it converts to
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConvertJob {
    pub input: PathBuf,
    pub output: PathBuf,
}

/// What happens to a batch when a file fails hard (unknown type, truncation, I/O)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FailurePolicy {
    /// Log the failure and keep converting the remaining files
    #[default]
    Continue,
    /// Stop at the first failure and return it
    Abort,
}

/// Result of converting one file
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FileOutcome {
    Converted { name: String, output: PathBuf },
    Skipped(Rejection),
}

/// Per-batch counts
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BatchSummary {
    pub converted: usize,
    pub skipped: usize,
    pub failed: usize,
}

impl BatchSummary {
    /// True when no file failed hard
    pub fn is_clean(&self) -> bool {
        self.failed == 0
    }

    fn record(&mut self, outcome: &FileOutcome) {
        match outcome {
            FileOutcome::Converted { .. } => self.converted += 1,
            FileOutcome::Skipped(_) => self.skipped += 1,
        }
    }
}

/// Default output path: `<output_dir>/<input stem>.obj`
pub fn default_output(input: &Path, output_dir: &Path) -> PathBuf {
    let file_name = input
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_default();
    output_dir.join(format!("{}.{OBJ_EXT}", mesh_name(&file_name)))
}

fn ensure_exists(path: &Path) -> Result<(), ConvertError> {
    if path.exists() {
        Ok(())
    } else {
        Err(ConvertError::MissingPath(path.to_path_buf()))
    }
}

/// Plan a single conversion; without an explicit output the OBJ lands in the
/// current directory
pub fn plan_single(input: &Path, output: Option<&Path>) -> Result<ConvertJob, ConvertError> {
    ensure_exists(input)?;
    let output = output
        .map(Path::to_path_buf)
        .unwrap_or_else(|| default_output(input, Path::new("")));
    Ok(ConvertJob {
        input: input.to_path_buf(),
        output,
    })
}

/// Plan one conversion per input, writing into the current directory.
///
/// Every input is checked before any job is returned.
pub fn plan_multi(inputs: &[PathBuf]) -> Result<Vec<ConvertJob>, ConvertError> {
    inputs
        .iter()
        .map(|input| plan_single(input, None))
        .collect()
}

/// Plan one conversion per regular file directly inside `input_dir`
pub fn plan_dir(input_dir: &Path, output_dir: &Path) -> Result<Vec<ConvertJob>, ConvertError> {
    ensure_exists(input_dir)?;

    let mut jobs = Vec::new();
    for entry in WalkDir::new(input_dir)
        .min_depth(1)
        .max_depth(1)
        .sort_by_file_name()
    {
        let entry = entry.map_err(|source| ConvertError::ListDir {
            path: input_dir.to_path_buf(),
            source,
        })?;
        if !entry.file_type().is_file() {
            continue;
        }
        jobs.push(ConvertJob {
            output: default_output(entry.path(), output_dir),
            input: entry.into_path(),
        });
    }

    Ok(jobs)
}

/// Decode one file and, if it is convertible, write its OBJ
///
/// Rejections are logged as warnings and reported as [`FileOutcome::Skipped`];
/// no output file is created for them.
pub fn convert_file(job: &ConvertJob) -> Result<FileOutcome, ConvertError> {
    let mesh = match mesh::decode_rpo_file(&job.input)? {
        DecodeOutcome::Mesh(mesh) => mesh,
        DecodeOutcome::Rejected(rejection) => {
            tracing::warn!("{}", rejection);
            return Ok(FileOutcome::Skipped(rejection));
        }
    };

    let out_of_range = mesh.out_of_range_indices();
    if out_of_range > 0 {
        tracing::warn!(
            "'{}' has {} of {} indices past its {} vertices; the OBJ may not load",
            mesh.name,
            out_of_range,
            mesh.indices.len(),
            mesh.vertex_count
        );
    }

    if let Some(parent) = job.output.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(|source| ConvertError::Write {
            path: job.output.clone(),
            source,
        })?;
    }

    mesh::save_obj(&mesh, &job.output)?;
    tracing::info!("Successfully converted {}", mesh.name);

    Ok(FileOutcome::Converted {
        name: mesh.name,
        output: job.output.clone(),
    })
}

/// Convert every job.
///
/// With [`FailurePolicy::Continue`] hard failures are logged and counted; with
/// [`FailurePolicy::Abort`] the first one is returned. Jobs already running on
/// other threads finish either way.
pub fn convert_batch(
    jobs: &[ConvertJob],
    policy: FailurePolicy,
) -> Result<BatchSummary, ConvertError> {
    let mut summary = BatchSummary::default();

    match policy {
        FailurePolicy::Abort => {
            let outcomes: Vec<FileOutcome> = jobs
                .par_iter()
                .map(convert_file)
                .collect::<Result<_, _>>()?;
            for outcome in &outcomes {
                summary.record(outcome);
            }
        }
        FailurePolicy::Continue => {
            let results: Vec<Result<FileOutcome, ConvertError>> =
                jobs.par_iter().map(convert_file).collect();
            for result in results {
                match result {
                    Ok(outcome) => summary.record(&outcome),
                    Err(err) => {
                        tracing::error!("{:#}", anyhow::Error::new(err));
                        summary.failed += 1;
                    }
                }
            }
        }
    }

    tracing::info!(
        "{} converted, {} skipped, {} failed",
        summary.converted,
        summary.skipped,
        summary.failed
    );

    Ok(summary)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_default_output_strips_extension() {
        assert_eq!(
            default_output(Path::new("assets/barn.rpo"), Path::new("out")),
            PathBuf::from("out/barn.obj")
        );
        assert_eq!(
            default_output(Path::new("barn.lod0.rpo"), Path::new("")),
            PathBuf::from("barn.lod0.obj")
        );
    }

    #[test]
    fn test_plan_single_missing_input() {
        let dir = tempdir().unwrap();
        let missing = dir.path().join("missing.rpo");

        match plan_single(&missing, None) {
            Err(ConvertError::MissingPath(path)) => assert_eq!(path, missing),
            other => panic!("expected missing path, got {other:?}"),
        }
    }

    #[test]
    fn test_plan_single_explicit_output() {
        let dir = tempdir().unwrap();
        let input = dir.path().join("a.rpo");
        fs::write(&input, b"RPO1").unwrap();
        let output = dir.path().join("nested/out.obj");

        let job = plan_single(&input, Some(&output)).unwrap();
        assert_eq!(job.output, output);

        let job = plan_single(&input, None).unwrap();
        assert_eq!(job.output, PathBuf::from("a.obj"));
    }

    #[test]
    fn test_plan_multi_checks_every_input() {
        let dir = tempdir().unwrap();
        let present = dir.path().join("present.rpo");
        fs::write(&present, b"").unwrap();
        let missing = dir.path().join("missing.rpo");

        let result = plan_multi(&[present, missing.clone()]);
        assert!(matches!(result, Err(ConvertError::MissingPath(path)) if path == missing));
    }

    #[test]
    fn test_plan_dir_lists_files_only() {
        let dir = tempdir().unwrap();
        fs::write(dir.path().join("b.rpo"), b"").unwrap();
        fs::write(dir.path().join("a.rpo"), b"").unwrap();
        fs::create_dir(dir.path().join("nested")).unwrap();
        fs::write(dir.path().join("nested/c.rpo"), b"").unwrap();

        let jobs = plan_dir(dir.path(), Path::new("out")).unwrap();
        let outputs: Vec<_> = jobs.iter().map(|job| job.output.clone()).collect();
        assert_eq!(
            outputs,
            vec![PathBuf::from("out/a.obj"), PathBuf::from("out/b.obj")]
        );
    }

    #[test]
    fn test_convert_batch_counts() {
        let dir = tempdir().unwrap();
        let not_rpo = dir.path().join("readme.txt");
        fs::write(&not_rpo, b"hello").unwrap();

        // Known but undecodable variant
        let mut unsupported = b"RPO1".to_vec();
        unsupported.extend_from_slice(&[0, 0, 0, 0, 0, 0, 0, 0]);
        unsupported.extend_from_slice(&17u32.to_le_bytes());
        let unsupported_path = dir.path().join("uv.rpo");
        fs::write(&unsupported_path, unsupported).unwrap();

        // Unknown type tag
        let mut unknown = b"RPO1".to_vec();
        unknown.extend_from_slice(&[0; 12]);
        let unknown_path = dir.path().join("zero.rpo");
        fs::write(&unknown_path, unknown).unwrap();

        let jobs = plan_multi(&[not_rpo, unsupported_path, unknown_path]).unwrap();
        let jobs: Vec<_> = jobs
            .into_iter()
            .map(|job| ConvertJob {
                output: default_output(&job.input, dir.path()),
                ..job
            })
            .collect();

        let summary = convert_batch(&jobs, FailurePolicy::Continue).unwrap();
        assert_eq!(
            summary,
            BatchSummary {
                converted: 0,
                skipped: 2,
                failed: 1
            }
        );
        assert!(!summary.is_clean());

        let err = convert_batch(&jobs, FailurePolicy::Abort).unwrap_err();
        assert!(matches!(err, ConvertError::Decode { .. }));

        for job in &jobs {
            assert!(!job.output.exists(), "{:?} should not be written", job.output);
        }
    }
}
