//! Cattle counting summaries
//!
//! The object detector runs outside this crate. It hands over its detections
//! per frame (or a per-frame metrics file); this module counts cows and
//! aggregates the run into the `cattle_detection` section.

use std::io::Read;

use serde::{Deserialize, Serialize};

use crate::context::CattleDetectionSection;
use crate::error::{Error, Result};
use crate::roi::round_to;

/// Detector class counted as a cow
pub const COW_CLASS: &str = "cow";

/// Detections below this confidence are ignored
pub const MIN_CONFIDENCE: f64 = 0.5;

/// One object found by the detector
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Detection {
    pub class_name: String,
    pub confidence: f64,
}

impl Detection {
    pub fn is_cow(&self) -> bool {
        self.confidence >= MIN_CONFIDENCE && self.class_name.eq_ignore_ascii_case(COW_CLASS)
    }
}

/// Counting result for one video frame
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FrameMetrics {
    pub frame: usize,
    pub inference_secs: f64,
    /// 1 / inference time, 0 when the time is 0
    pub fps: f64,
    pub cow_count: usize,
}

impl FrameMetrics {
    pub fn new(frame: usize, inference_secs: f64, cow_count: usize) -> Self {
        let fps = if inference_secs > 0.0 {
            round_to(1.0 / inference_secs, 2)
        } else {
            0.0
        };
        Self {
            frame,
            inference_secs,
            fps,
            cow_count,
        }
    }

    /// Count the cows among a frame's detections
    pub fn from_detections(frame: usize, detections: &[Detection], inference_secs: f64) -> Self {
        let cows = detections.iter().filter(|d| d.is_cow()).count();
        Self::new(frame, inference_secs, cows)
    }
}

impl CattleDetectionSection {
    /// Aggregate a run over `filename`
    pub fn from_frames(frames: &[FrameMetrics], filename: &str) -> Result<Self> {
        if frames.is_empty() {
            return Err(Error::InvalidData(format!(
                "No frames were processed for {}",
                filename
            )));
        }

        let n = frames.len() as f64;
        let total_cows: usize = frames.iter().map(|f| f.cow_count).sum();
        let max_count = frames.iter().map(|f| f.cow_count).max().unwrap_or(0);
        let mean_fps = frames.iter().map(|f| f.fps).sum::<f64>() / n;

        Ok(Self {
            frames_processed: frames.len(),
            mean_count: total_cows as f64 / n,
            max_count,
            mean_fps,
            filename: filename.to_string(),
        })
    }
}

/// Row of a per-frame metrics file (`frame,inference_secs,cows`)
#[derive(Debug, Deserialize)]
struct MetricsRow {
    frame: usize,
    inference_secs: f64,
    cows: usize,
}

/// Read per-frame metrics exported by the detector
pub fn read_frame_metrics<R: Read>(reader: R) -> Result<Vec<FrameMetrics>> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(reader);

    let mut frames = Vec::new();
    for row in csv_reader.deserialize() {
        let row: MetricsRow = row?;
        if row.inference_secs < 0.0 {
            return Err(Error::InvalidData(format!(
                "Frame {}: negative inference time",
                row.frame
            )));
        }
        frames.push(FrameMetrics::new(row.frame, row.inference_secs, row.cows));
    }

    Ok(frames)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn detection(class_name: &str, confidence: f64) -> Detection {
        Detection {
            class_name: class_name.to_string(),
            confidence,
        }
    }

    #[test]
    fn test_only_confident_cows_counted() {
        let detections = vec![
            detection("cow", 0.91),
            detection("Cow", 0.5),
            detection("cow", 0.49),
            detection("horse", 0.99),
            detection("person", 0.8),
        ];

        let metrics = FrameMetrics::from_detections(0, &detections, 0.05);
        assert_eq!(metrics.cow_count, 2);
        assert_eq!(metrics.fps, 20.0);
    }

    #[test]
    fn test_zero_inference_time_has_zero_fps() {
        let metrics = FrameMetrics::from_detections(3, &[], 0.0);
        assert_eq!(metrics.fps, 0.0);
        assert_eq!(metrics.cow_count, 0);
    }

    #[test]
    fn test_from_frames_aggregates() {
        let frames = vec![
            FrameMetrics::new(0, 0.1, 2),
            FrameMetrics::new(1, 0.05, 5),
            FrameMetrics::new(2, 0.0, 2),
        ];

        let section = CattleDetectionSection::from_frames(&frames, "pasture.mp4").unwrap();
        assert_eq!(section.frames_processed, 3);
        assert_eq!(section.max_count, 5);
        assert_eq!(section.mean_count, 3.0);
        assert_eq!(section.mean_fps, 10.0);
        assert_eq!(section.filename, "pasture.mp4");
    }

    #[test]
    fn test_from_frames_rejects_empty_run() {
        let result = CattleDetectionSection::from_frames(&[], "empty.mp4");
        assert!(matches!(result, Err(Error::InvalidData(msg)) if msg.contains("empty.mp4")));
    }

    #[test]
    fn test_read_frame_metrics() {
        let data = "frame,inference_secs,cows\n0,0.04,3\n1, 0.05 ,4\n";
        let frames = read_frame_metrics(data.as_bytes()).unwrap();

        assert_eq!(frames.len(), 2);
        assert_eq!(frames[0].fps, 25.0);
        assert_eq!(frames[1].cow_count, 4);
    }

    #[test]
    fn test_read_frame_metrics_rejects_bad_rows() {
        assert!(matches!(
            read_frame_metrics("frame,inference_secs,cows\n0,fast,3\n".as_bytes()),
            Err(Error::Csv(_))
        ));
        assert!(matches!(
            read_frame_metrics("frame,inference_secs,cows\n0,-0.1,3\n".as_bytes()),
            Err(Error::InvalidData(_))
        ));
    }
}
