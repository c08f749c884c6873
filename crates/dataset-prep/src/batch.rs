//! Parallel batch preparation over an image/label directory pair
//!
//! Each annotation file is independent: the fan-out shares no mutable
//! state, and a failed file is that file's outcome, never the batch's.

use std::ffi::OsStr;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Instant;

use face_align::{FaceAligner, FaceAlignment, FaceLandmarker};
use serde::Serialize;
use tokio::sync::Semaphore;
use tokio::task::JoinSet;
use tracing::{info, warn};

use crate::label::{format_labels, parse_labels};
use crate::reproject::reproject_labels;
use crate::PrepError;

/// Outcome of one image/label pair
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FileOutcome {
    /// Crop and re-projected label file written
    Created,
    /// Crop written, but no boxes survived re-projection
    EmptyLabels,
    /// No face located; the file is skipped
    NoFace,
    /// Per-file failure; the batch continues
    Error(String),
}

/// Aggregate counts and timing for one batch run
#[derive(Debug, Clone, Default, Serialize)]
pub struct BatchReport {
    pub total: usize,
    pub created: usize,
    pub empty_labels: usize,
    pub no_face: usize,
    pub errors: usize,
    /// Summed per-file processing time over processed files
    pub total_ms: u64,
}

impl BatchReport {
    fn record(&mut self, outcome: FileOutcome, elapsed_ms: u64) {
        match outcome {
            FileOutcome::Created => {
                self.created += 1;
                self.total_ms += elapsed_ms;
            }
            FileOutcome::EmptyLabels => {
                self.empty_labels += 1;
                self.total_ms += elapsed_ms;
            }
            FileOutcome::NoFace => self.no_face += 1,
            FileOutcome::Error(_) => self.errors += 1,
        }
    }

    /// Files that produced a crop
    pub fn processed(&self) -> usize {
        self.created + self.empty_labels
    }

    /// Mean per-file processing time over processed files
    pub fn mean_ms(&self) -> f64 {
        if self.processed() == 0 {
            return 0.0;
        }
        self.total_ms as f64 / self.processed() as f64
    }

    /// Fraction of the batch that produced a crop
    pub fn completion_rate(&self) -> f64 {
        if self.total == 0 {
            return 0.0;
        }
        self.processed() as f64 / self.total as f64
    }
}

/// Directory layout for one batch run
#[derive(Debug, Clone)]
pub struct BatchDirs {
    pub images: PathBuf,
    pub labels: PathBuf,
    pub out_images: PathBuf,
    pub out_labels: PathBuf,
}

/// Worker-pool runner for the offline re-projection path
pub struct BatchRunner {
    aligner: Arc<FaceAligner>,
    landmarker: Arc<dyn FaceLandmarker>,
    workers: usize,
}

impl BatchRunner {
    pub fn new(aligner: FaceAligner, landmarker: Arc<dyn FaceLandmarker>) -> Self {
        let workers = std::thread::available_parallelism()
            .map(|n| n.get())
            .unwrap_or(4);
        Self {
            aligner: Arc::new(aligner),
            landmarker,
            workers,
        }
    }

    pub fn with_workers(mut self, workers: usize) -> Self {
        self.workers = workers.max(1);
        self
    }

    /// Process every image in `dirs.images`, writing aligned crops and
    /// re-projected labels to the output directories.
    pub async fn run(&self, dirs: &BatchDirs) -> Result<BatchReport, PrepError> {
        std::fs::create_dir_all(&dirs.out_images)?;
        std::fs::create_dir_all(&dirs.out_labels)?;

        let images = list_images(&dirs.images)?;
        let mut report = BatchReport {
            total: images.len(),
            ..Default::default()
        };
        info!(total = report.total, workers = self.workers, "starting batch preparation");

        let semaphore = Arc::new(Semaphore::new(self.workers));
        let mut tasks = JoinSet::new();

        for image_path in images {
            let permit = semaphore
                .clone()
                .acquire_owned()
                .await
                .map_err(|e| PrepError::Worker(e.to_string()))?;
            let aligner = self.aligner.clone();
            let landmarker = self.landmarker.clone();
            let dirs = dirs.clone();

            tasks.spawn_blocking(move || {
                let _permit = permit;
                process_file(&aligner, landmarker.as_ref(), &image_path, &dirs)
            });
        }

        while let Some(joined) = tasks.join_next().await {
            match joined {
                Ok((path, outcome, elapsed_ms)) => {
                    if let FileOutcome::Error(ref reason) = outcome {
                        warn!(path = %path.display(), reason, "file failed");
                    }
                    report.record(outcome, elapsed_ms);
                }
                Err(e) => {
                    warn!("worker task failed: {e}");
                    report.errors += 1;
                }
            }
        }

        info!(
            created = report.created,
            empty_labels = report.empty_labels,
            no_face = report.no_face,
            errors = report.errors,
            mean_ms = report.mean_ms(),
            "batch preparation finished"
        );
        Ok(report)
    }
}

/// Process one image/label pair; errors become the file's outcome
fn process_file(
    aligner: &FaceAligner,
    landmarker: &dyn FaceLandmarker,
    image_path: &Path,
    dirs: &BatchDirs,
) -> (PathBuf, FileOutcome, u64) {
    let start = Instant::now();
    let outcome = match prepare_one(aligner, landmarker, image_path, dirs) {
        Ok(outcome) => outcome,
        Err(e) => FileOutcome::Error(e.to_string()),
    };
    (
        image_path.to_path_buf(),
        outcome,
        start.elapsed().as_millis() as u64,
    )
}

fn prepare_one(
    aligner: &FaceAligner,
    landmarker: &dyn FaceLandmarker,
    image_path: &Path,
    dirs: &BatchDirs,
) -> Result<FileOutcome, PrepError> {
    let stem = image_path
        .file_stem()
        .and_then(OsStr::to_str)
        .ok_or_else(|| PrepError::InvalidPath(image_path.display().to_string()))?;

    let frame = image::open(image_path)?.to_rgb8();

    // A missing sibling label file means no ground-truth boxes
    let label_path = dirs.labels.join(format!("{stem}.txt"));
    let boxes = match std::fs::read_to_string(&label_path) {
        Ok(text) => parse_labels(&text),
        Err(_) => Vec::new(),
    };

    let aligned = match aligner.align(landmarker, &frame)? {
        FaceAlignment::NoFace => return Ok(FileOutcome::NoFace),
        FaceAlignment::Aligned(result) => result,
    };

    let (w, h) = frame.dimensions();
    let reprojected = reproject_labels(&boxes, &aligned.transform, &aligned.roi, w, h);

    aligned.crop.save(dirs.out_images.join(format!("{stem}.jpg")))?;

    if reprojected.is_empty() {
        return Ok(FileOutcome::EmptyLabels);
    }

    std::fs::write(
        dirs.out_labels.join(format!("{stem}.txt")),
        format_labels(&reprojected),
    )?;
    Ok(FileOutcome::Created)
}

fn list_images(dir: &Path) -> Result<Vec<PathBuf>, PrepError> {
    let mut images = Vec::new();
    for entry in std::fs::read_dir(dir)? {
        let path = entry?.path();
        let is_image = path
            .extension()
            .and_then(OsStr::to_str)
            .map(|ext| matches!(ext.to_ascii_lowercase().as_str(), "jpg" | "jpeg" | "png"))
            .unwrap_or(false);
        if is_image {
            images.push(path);
        }
    }
    images.sort();
    Ok(images)
}

#[cfg(test)]
mod tests {
    use super::*;
    use face_align::{AlignError, Landmark, LandmarkSet};
    use image::RgbImage;

    struct FakeLandmarker {
        landmarks: Option<LandmarkSet>,
    }

    impl FaceLandmarker for FakeLandmarker {
        fn detect(&self, _frame: &RgbImage) -> Result<Option<LandmarkSet>, AlignError> {
            Ok(self.landmarks.clone())
        }
    }

    /// Upright face spanning the middle of the frame, eyes level
    fn upright_face() -> LandmarkSet {
        let mut points = vec![Landmark::new(0.5, 0.5); 468];
        points[10] = Landmark::new(0.5, 0.2);
        points[1] = Landmark::new(0.5, 0.4);
        points[152] = Landmark::new(0.5, 0.8);
        points[33] = Landmark::new(0.3, 0.3);
        points[263] = Landmark::new(0.7, 0.3);
        LandmarkSet::new(points)
    }

    fn scratch_dirs(tag: &str) -> BatchDirs {
        let root = std::env::temp_dir()
            .join("dataset-prep-tests")
            .join(format!("{tag}-{}", std::process::id()));
        let dirs = BatchDirs {
            images: root.join("images"),
            labels: root.join("labels"),
            out_images: root.join("out/images"),
            out_labels: root.join("out/labels"),
        };
        let _ = std::fs::remove_dir_all(&root);
        std::fs::create_dir_all(&dirs.images).unwrap();
        std::fs::create_dir_all(&dirs.labels).unwrap();
        dirs
    }

    fn write_sample(dirs: &BatchDirs, stem: &str, label: Option<&str>) {
        let frame = RgbImage::from_pixel(100, 100, image::Rgb([128, 128, 128]));
        frame.save(dirs.images.join(format!("{stem}.jpg"))).unwrap();
        if let Some(text) = label {
            std::fs::write(dirs.labels.join(format!("{stem}.txt")), text).unwrap();
        }
    }

    #[tokio::test]
    async fn test_batch_writes_crops_and_labels() {
        let dirs = scratch_dirs("created");
        // Box over the face center survives re-projection
        write_sample(&dirs, "a", Some("1 0.5 0.5 0.2 0.2"));

        let runner = BatchRunner::new(
            FaceAligner::default(),
            Arc::new(FakeLandmarker {
                landmarks: Some(upright_face()),
            }),
        )
        .with_workers(2);

        let report = runner.run(&dirs).await.unwrap();

        assert_eq!(report.total, 1);
        assert_eq!(report.created, 1);
        assert!((report.completion_rate() - 1.0).abs() < 1e-9);
        assert!(dirs.out_images.join("a.jpg").exists());

        let written = std::fs::read_to_string(dirs.out_labels.join("a.txt")).unwrap();
        let boxes = parse_labels(&written);
        assert_eq!(boxes.len(), 1);
        assert_eq!(boxes[0].class_id, 1);
    }

    #[tokio::test]
    async fn test_no_face_counted_without_outputs() {
        let dirs = scratch_dirs("noface");
        write_sample(&dirs, "b", Some("1 0.5 0.5 0.2 0.2"));

        let runner = BatchRunner::new(
            FaceAligner::default(),
            Arc::new(FakeLandmarker { landmarks: None }),
        );

        let report = runner.run(&dirs).await.unwrap();

        assert_eq!(report.no_face, 1);
        assert_eq!(report.processed(), 0);
        assert!(!dirs.out_images.join("b.jpg").exists());
    }

    #[tokio::test]
    async fn test_missing_label_file_yields_empty_labels() {
        let dirs = scratch_dirs("missing-label");
        write_sample(&dirs, "c", None);

        let runner = BatchRunner::new(
            FaceAligner::default(),
            Arc::new(FakeLandmarker {
                landmarks: Some(upright_face()),
            }),
        );

        let report = runner.run(&dirs).await.unwrap();

        assert_eq!(report.empty_labels, 1);
        assert!(dirs.out_images.join("c.jpg").exists());
        assert!(!dirs.out_labels.join("c.txt").exists());
    }

    #[tokio::test]
    async fn test_corrupt_image_is_isolated() {
        let dirs = scratch_dirs("corrupt");
        write_sample(&dirs, "good", Some("1 0.5 0.5 0.2 0.2"));
        std::fs::write(dirs.images.join("bad.jpg"), b"not an image").unwrap();

        let runner = BatchRunner::new(
            FaceAligner::default(),
            Arc::new(FakeLandmarker {
                landmarks: Some(upright_face()),
            }),
        );

        let report = runner.run(&dirs).await.unwrap();

        assert_eq!(report.total, 2);
        assert_eq!(report.errors, 1);
        assert_eq!(report.created, 1);
    }

    #[test]
    fn test_report_mean_over_processed_only() {
        let mut report = BatchReport { total: 3, ..Default::default() };
        report.record(FileOutcome::Created, 10);
        report.record(FileOutcome::EmptyLabels, 20);
        report.record(FileOutcome::NoFace, 500);

        assert_eq!(report.total_ms, 30);
        assert!((report.mean_ms() - 15.0).abs() < 1e-9);
    }
}
