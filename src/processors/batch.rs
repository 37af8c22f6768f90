// pixtone/src/processors/batch.rs
use crate::core::{AdjustmentSet, Error, ExportReport, ImageProcessor, ProcessConfig, Result};
use crate::utils::{is_supported_format, numbered_output_path};
use indicatif::{ProgressBar, ProgressStyle};
use rayon::prelude::*;
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use walkdir::WalkDir;

/// Result of exporting one image in a batch.
#[derive(Debug)]
pub struct ImageOutcome {
    pub input: PathBuf,
    pub result: Result<ExportReport>,
}

impl ImageOutcome {
    pub fn is_success(&self) -> bool {
        self.result.is_ok()
    }
}

/// Per-image outcomes, in input order.
#[derive(Debug, Default)]
pub struct BatchReport {
    pub outcomes: Vec<ImageOutcome>,
}

impl BatchReport {
    pub fn succeeded(&self) -> impl Iterator<Item = (&Path, &ExportReport)> {
        self.outcomes
            .iter()
            .filter_map(|o| o.result.as_ref().ok().map(|r| (o.input.as_path(), r)))
    }

    pub fn failed(&self) -> impl Iterator<Item = (&Path, &Error)> {
        self.outcomes
            .iter()
            .filter_map(|o| o.result.as_ref().err().map(|e| (o.input.as_path(), e)))
    }

    pub fn success_count(&self) -> usize {
        self.succeeded().count()
    }

    pub fn failure_count(&self) -> usize {
        self.failed().count()
    }

    pub fn is_complete_success(&self) -> bool {
        self.outcomes.iter().all(ImageOutcome::is_success)
    }

    pub fn total_size_before(&self) -> u64 {
        self.succeeded().map(|(_, r)| r.size_before).sum()
    }

    pub fn total_size_after(&self) -> u64 {
        self.succeeded().map(|(_, r)| r.size_after).sum()
    }
}

pub struct BatchProcessor {
    processor: ImageProcessor,
    thread_pool: Option<rayon::ThreadPool>,
    show_progress: bool,
}

impl BatchProcessor {
    pub fn new(config: ProcessConfig) -> Result<Self> {
        let threads = config.threads;
        let processor = ImageProcessor::new(config)?;

        let thread_pool = if threads > 1 {
            let pool = rayon::ThreadPoolBuilder::new()
                .num_threads(threads)
                .build()
                .map_err(|e| Error::InvalidParameter(format!("Failed to create thread pool: {}", e)))?;
            Some(pool)
        } else {
            None
        };

        Ok(Self {
            processor,
            thread_pool,
            show_progress: false,
        })
    }

    pub fn with_progress(mut self, show: bool) -> Self {
        self.show_progress = show;
        self
    }

    pub fn export_all(&self, inputs: &[PathBuf], set: &AdjustmentSet, output_dir: &Path) -> Result<BatchReport> {
        let never = AtomicBool::new(false);
        self.export_all_with_cancel(inputs, set, output_dir, &never)
    }

    /// Exports every input independently.
    ///
    /// Inputs that would land on the same output name (`a.png` and `a.bmp`,
    /// or same-named files in different folders) are numbered in input
    /// order: `a_edited.jpg`, `a_edited_2.jpg`, ...
    ///
    /// `cancel` is checked before each image starts; images not yet started
    /// when it is set are reported as [`Error::Cancelled`].
    pub fn export_all_with_cancel(
        &self,
        inputs: &[PathBuf],
        set: &AdjustmentSet,
        output_dir: &Path,
        cancel: &AtomicBool,
    ) -> Result<BatchReport> {
        if output_dir.exists() && !output_dir.is_dir() {
            return Err(Error::InvalidParameter(format!(
                "Output path exists but is not a directory: {}",
                output_dir.display()
            )));
        }
        std::fs::create_dir_all(output_dir)?;

        log::info!(
            "Exporting {} images to {} with {}",
            inputs.len(),
            output_dir.display(),
            set
        );

        let jobs: Vec<(&PathBuf, PathBuf)> = inputs
            .iter()
            .zip(self.plan_outputs(inputs, output_dir))
            .collect();

        let pb = self.create_progress_bar(inputs.len());
        let run_one = |(input, output): &(&PathBuf, PathBuf)| {
            let outcome = self.export_one(input, set, output.clone(), cancel);
            pb.inc(1);
            outcome
        };

        let outcomes: Vec<ImageOutcome> = match (&self.thread_pool, self.processor.config().threads) {
            (Some(pool), _) => pool.install(|| jobs.par_iter().map(run_one).collect()),
            (None, 0) => jobs.par_iter().map(run_one).collect(),
            (None, _) => jobs.iter().map(run_one).collect(),
        };

        let report = BatchReport { outcomes };
        pb.finish_with_message(format!(
            "{} exported, {} failed",
            report.success_count(),
            report.failure_count()
        ));
        log::info!(
            "Batch finished: {} exported, {} failed",
            report.success_count(),
            report.failure_count()
        );

        Ok(report)
    }

    pub fn process_directory(
        &self,
        input_dir: &Path,
        output_dir: &Path,
        set: &AdjustmentSet,
        recursive: bool,
    ) -> Result<BatchReport> {
        self.validate_paths(input_dir, output_dir)?;

        let image_paths = collect_image_paths(input_dir, recursive);
        if image_paths.is_empty() {
            log::warn!("No image files found in {}", input_dir.display());
            return Ok(BatchReport::default());
        }

        self.export_all(&image_paths, set, output_dir)
    }

    /// One output path per input, unique within the batch. Names are compared
    /// case-insensitively so `A.png` and `a.png` do not clash on such filesystems.
    fn plan_outputs(&self, inputs: &[PathBuf], output_dir: &Path) -> Vec<PathBuf> {
        let mut taken = HashSet::new();
        inputs
            .iter()
            .map(|input| {
                let base = self.processor.output_path_for(input, output_dir);
                let mut candidate = base.clone();
                let mut n = 2;
                while !taken.insert(candidate.to_string_lossy().to_lowercase()) {
                    candidate = numbered_output_path(&base, n);
                    n += 1;
                }
                if candidate != base {
                    log::warn!(
                        "{}: output name already used in this batch, writing {}",
                        input.display(),
                        candidate.display()
                    );
                }
                candidate
            })
            .collect()
    }

    fn export_one(&self, input: &Path, set: &AdjustmentSet, output: PathBuf, cancel: &AtomicBool) -> ImageOutcome {
        let result = if cancel.load(Ordering::SeqCst) {
            Err(Error::Cancelled)
        } else {
            self.processor.export_to(input, set, output)
        };

        if let Err(e) = &result {
            log::warn!("{}: {}", input.display(), e);
        }

        ImageOutcome {
            input: input.to_path_buf(),
            result,
        }
    }

    fn create_progress_bar(&self, total: usize) -> ProgressBar {
        if !self.show_progress {
            return ProgressBar::hidden();
        }

        let pb = ProgressBar::new(total as u64);
        if let Ok(style) = ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} ({eta}) {msg}")
        {
            pb.set_style(style.progress_chars("#>-"));
        }
        pb
    }

    pub fn validate_paths(&self, input_dir: &Path, output_dir: &Path) -> Result<()> {
        if !input_dir.is_dir() {
            return Err(Error::InvalidParameter(format!(
                "Input path is not a directory: {}",
                input_dir.display()
            )));
        }

        if output_dir.exists() && !output_dir.is_dir() {
            return Err(Error::InvalidParameter(format!(
                "Output path exists but is not a directory: {}",
                output_dir.display()
            )));
        }

        Ok(())
    }
}

/// Supported image files under `input_dir`, sorted by path.
pub fn collect_image_paths(input_dir: &Path, recursive: bool) -> Vec<PathBuf> {
    let walker = if recursive {
        WalkDir::new(input_dir)
    } else {
        WalkDir::new(input_dir).max_depth(1)
    };

    walker
        .sort_by_file_name()
        .into_iter()
        .filter_map(|entry| entry.ok())
        .filter(|entry| entry.file_type().is_file())
        .filter(|entry| is_supported_format(entry.path()))
        .map(|entry| entry.into_path())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{AdjustmentInput, Knob};
    use assert_fs::prelude::*;
    use assert_fs::TempDir;

    fn write_png(dir: &TempDir, name: &str) -> PathBuf {
        let file = dir.child(name);
        image::RgbImage::from_pixel(6, 6, image::Rgb([120, 80, 60]))
            .save(file.path())
            .unwrap();
        file.path().to_path_buf()
    }

    fn adjustments() -> AdjustmentSet {
        AdjustmentInput::new()
            .set(Knob::Exposure, 25.0)
            .set(Knob::Saturation, -40.0)
            .validate()
            .unwrap()
    }

    #[test]
    fn collects_supported_files_in_order() {
        let temp = TempDir::new().unwrap();
        write_png(&temp, "b.png");
        write_png(&temp, "a.png");
        temp.child("notes.txt").write_str("hi").unwrap();
        temp.child("sub").create_dir_all().unwrap();
        write_png(&temp, "sub/c.png");

        let flat = collect_image_paths(temp.path(), false);
        let names: Vec<String> = flat
            .iter()
            .map(|p| p.file_name().unwrap().to_string_lossy().into_owned())
            .collect();
        assert_eq!(names, vec!["a.png", "b.png"]);
        assert_eq!(collect_image_paths(temp.path(), true).len(), 3);
    }

    #[test]
    fn cancellation_skips_remaining_images() {
        let temp = TempDir::new().unwrap();
        let inputs = vec![write_png(&temp, "one.png"), write_png(&temp, "two.png")];
        let cancel = AtomicBool::new(true);

        let batch = BatchProcessor::new(ProcessConfig::default()).unwrap();
        let report = batch
            .export_all_with_cancel(&inputs, &adjustments(), &temp.path().join("out"), &cancel)
            .unwrap();

        assert_eq!(report.failure_count(), 2);
        assert!(report.failed().all(|(_, e)| matches!(e, Error::Cancelled)));
        assert!(!temp.path().join("out").join("one_edited.jpg").exists());
    }

    #[test]
    fn parallel_pool_keeps_input_order() {
        let temp = TempDir::new().unwrap();
        let inputs: Vec<PathBuf> = (0..6)
            .map(|i| write_png(&temp, &format!("img{}.png", i)))
            .collect();
        let config = ProcessConfig {
            threads: 3,
            ..Default::default()
        };

        let batch = BatchProcessor::new(config).unwrap();
        let report = batch
            .export_all(&inputs, &adjustments(), &temp.path().join("out"))
            .unwrap();

        assert!(report.is_complete_success());
        let order: Vec<_> = report.outcomes.iter().map(|o| o.input.clone()).collect();
        assert_eq!(order, inputs);
    }

    #[test]
    fn output_path_that_is_a_file_fails_the_batch() {
        let temp = TempDir::new().unwrap();
        let input = write_png(&temp, "x.png");
        let blocker = temp.child("blocker");
        blocker.write_str("file").unwrap();

        let batch = BatchProcessor::new(ProcessConfig::default()).unwrap();
        let result = batch.export_all(&[input], &adjustments(), blocker.path());
        assert!(matches!(result, Err(Error::InvalidParameter(_))));
    }

    fn output_names(report: &BatchReport) -> Vec<String> {
        report
            .succeeded()
            .map(|(_, r)| r.output_path.file_name().unwrap().to_string_lossy().into_owned())
            .collect()
    }

    #[test]
    fn same_stem_inputs_get_distinct_outputs() {
        let temp = TempDir::new().unwrap();
        let inputs = vec![write_png(&temp, "a.png"), write_png(&temp, "a.bmp")];
        let out = temp.path().join("out");

        let batch = BatchProcessor::new(ProcessConfig::default()).unwrap();
        let report = batch.export_all(&inputs, &adjustments(), &out).unwrap();

        assert!(report.is_complete_success());
        assert_eq!(output_names(&report), vec!["a_edited.jpg", "a_edited_2.jpg"]);
        assert_eq!(std::fs::read_dir(&out).unwrap().count(), 2);
    }

    #[test]
    fn recursive_duplicates_are_numbered_under_a_pool() {
        let temp = TempDir::new().unwrap();
        temp.child("x").create_dir_all().unwrap();
        temp.child("y").create_dir_all().unwrap();
        write_png(&temp, "x/shot.png");
        write_png(&temp, "y/shot.png");
        write_png(&temp, "shot.png");
        let out = temp.path().join("out");
        let config = ProcessConfig {
            threads: 3,
            ..Default::default()
        };

        let batch = BatchProcessor::new(config).unwrap();
        let report = batch
            .process_directory(temp.path(), &out, &adjustments(), true)
            .unwrap();

        assert_eq!(report.success_count(), 3);
        assert_eq!(
            output_names(&report),
            vec!["shot_edited.jpg", "shot_edited_2.jpg", "shot_edited_3.jpg"]
        );
        assert_eq!(std::fs::read_dir(&out).unwrap().count(), 3);
    }

    #[test]
    fn numbered_name_does_not_shadow_a_later_input() {
        let temp = TempDir::new().unwrap();
        // With suffix "2", the second "a" would be numbered a_2_2.jpg, which
        // is also the plain name for the input "a_2".
        let inputs = vec![
            write_png(&temp, "a.png"),
            write_png(&temp, "a.bmp"),
            write_png(&temp, "a_2.png"),
        ];
        let config = ProcessConfig {
            suffix: "2".to_string(),
            ..Default::default()
        };

        let batch = BatchProcessor::new(config).unwrap();
        let planned = batch.plan_outputs(&inputs, Path::new("/out"));
        assert_eq!(
            planned,
            vec![
                PathBuf::from("/out/a_2.jpg"),
                PathBuf::from("/out/a_2_2.jpg"),
                PathBuf::from("/out/a_2_2_2.jpg"),
            ]
        );
    }
}
