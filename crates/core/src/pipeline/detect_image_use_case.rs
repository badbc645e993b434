use std::path::Path;
use std::time::Instant;

use crate::annotation::domain::frame_annotator::FrameAnnotator;
use crate::detection::domain::face_detector::FaceDetector;
use crate::pipeline::detection_report::DetectionReport;
use crate::pipeline::pipeline_logger::PipelineLogger;
use crate::video::domain::frame_reader::FrameReader;
use crate::video::domain::image_writer::ImageWriter;

/// Single-image pipeline: read → detect → annotate → write.
///
/// The annotated copy is written only when an output path is given.
pub struct DetectImageUseCase {
    reader: Box<dyn FrameReader>,
    detector: Box<dyn FaceDetector>,
    annotator: Box<dyn FrameAnnotator>,
    image_writer: Box<dyn ImageWriter>,
    logger: Box<dyn PipelineLogger>,
}

impl DetectImageUseCase {
    pub fn new(
        reader: Box<dyn FrameReader>,
        detector: Box<dyn FaceDetector>,
        annotator: Box<dyn FrameAnnotator>,
        image_writer: Box<dyn ImageWriter>,
        logger: Box<dyn PipelineLogger>,
    ) -> Self {
        Self {
            reader,
            detector,
            annotator,
            image_writer,
            logger,
        }
    }

    pub fn execute(
        &mut self,
        input_path: &Path,
        output_path: Option<&Path>,
    ) -> Result<DetectionReport, Box<dyn std::error::Error>> {
        let metadata = self.reader.open(input_path)?;
        self.logger.info(&format!(
            "Loaded {} ({}x{})",
            input_path.display(),
            metadata.width,
            metadata.height
        ));

        let mut frame = self.reader.frames().next().ok_or("No frames in image")??;
        self.reader.close();

        let started = Instant::now();
        let faces = self.detector.detect(&frame)?;
        self.logger
            .timing("detect", started.elapsed().as_secs_f64() * 1000.0);
        self.logger.metric("faces", faces.len() as f64);
        self.logger.progress(1, 1);

        let report = DetectionReport::new(&frame, Some(input_path), faces);

        if let Some(path) = output_path {
            self.annotator.annotate(&mut frame, &report.faces)?;
            self.image_writer.write(path, &frame)?;
            self.logger
                .info(&format!("Saved annotated image to {}", path.display()));
        }

        Ok(report)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shared::frame::Frame;
    use crate::shared::region::Region;
    use crate::shared::source_metadata::SourceMetadata;
    use std::path::PathBuf;
    use std::sync::{Arc, Mutex};

    // ── Stubs ──

    struct StubImageReader {
        frame: Option<Frame>,
    }

    impl FrameReader for StubImageReader {
        fn open(&mut self, path: &Path) -> Result<SourceMetadata, Box<dyn std::error::Error>> {
            let frame = self.frame.as_ref().ok_or("missing")?;
            Ok(SourceMetadata {
                width: frame.width(),
                height: frame.height(),
                total_frames: 1,
                source_path: Some(path.to_path_buf()),
            })
        }

        fn frames(
            &mut self,
        ) -> Box<dyn Iterator<Item = Result<Frame, Box<dyn std::error::Error>>> + '_> {
            Box::new(self.frame.take().into_iter().map(Ok))
        }

        fn close(&mut self) {
            self.frame = None;
        }
    }

    struct StubDetector {
        regions: Vec<Region>,
    }

    impl FaceDetector for StubDetector {
        fn detect(&mut self, _frame: &Frame) -> Result<Vec<Region>, Box<dyn std::error::Error>> {
            Ok(self.regions.clone())
        }
    }

    /// Marks the first pixel of every annotated frame so writes can be
    /// checked for having passed through the annotator.
    struct MarkingAnnotator {
        calls: Arc<Mutex<Vec<Vec<Region>>>>,
    }

    impl FrameAnnotator for MarkingAnnotator {
        fn annotate(
            &self,
            frame: &mut Frame,
            regions: &[Region],
        ) -> Result<(), Box<dyn std::error::Error>> {
            frame.data_mut()[0] = 255;
            self.calls.lock().unwrap().push(regions.to_vec());
            Ok(())
        }
    }

    struct StubImageWriter {
        written: Arc<Mutex<Vec<(PathBuf, Frame)>>>,
    }

    impl ImageWriter for StubImageWriter {
        fn write(&self, path: &Path, frame: &Frame) -> Result<(), Box<dyn std::error::Error>> {
            self.written
                .lock()
                .unwrap()
                .push((path.to_path_buf(), frame.clone()));
            Ok(())
        }
    }

    struct Harness {
        annotated: Arc<Mutex<Vec<Vec<Region>>>>,
        written: Arc<Mutex<Vec<(PathBuf, Frame)>>>,
        use_case: DetectImageUseCase,
    }

    fn harness(frame: Option<Frame>, regions: Vec<Region>) -> Harness {
        let annotated = Arc::new(Mutex::new(Vec::new()));
        let written = Arc::new(Mutex::new(Vec::new()));
        let use_case = DetectImageUseCase::new(
            Box::new(StubImageReader { frame }),
            Box::new(StubDetector { regions }),
            Box::new(MarkingAnnotator {
                calls: annotated.clone(),
            }),
            Box::new(StubImageWriter {
                written: written.clone(),
            }),
            Box::new(crate::pipeline::pipeline_logger::NullPipelineLogger),
        );
        Harness {
            annotated,
            written,
            use_case,
        }
    }

    fn blank_frame() -> Frame {
        Frame::new(vec![0; 8 * 8 * 4], 8, 8, 4, 0)
    }

    // ── Tests ──

    #[test]
    fn test_report_carries_detected_faces() {
        let faces = vec![Region::square(1, 1, 30), Region::square(5, 5, 39)];
        let mut h = harness(Some(blank_frame()), faces.clone());
        let report = h.use_case.execute(Path::new("in.png"), None).unwrap();

        assert_eq!(report.face_count, 2);
        assert_eq!(report.faces, faces);
        assert_eq!(report.source.as_deref(), Some(Path::new("in.png")));
    }

    #[test]
    fn test_no_output_path_skips_annotation_and_write() {
        let mut h = harness(Some(blank_frame()), vec![Region::square(0, 0, 30)]);
        h.use_case.execute(Path::new("in.png"), None).unwrap();
        assert!(h.annotated.lock().unwrap().is_empty());
        assert!(h.written.lock().unwrap().is_empty());
    }

    #[test]
    fn test_output_path_writes_annotated_frame() {
        let faces = vec![Region::square(0, 0, 30)];
        let mut h = harness(Some(blank_frame()), faces.clone());
        h.use_case
            .execute(Path::new("in.png"), Some(Path::new("out.png")))
            .unwrap();

        assert_eq!(*h.annotated.lock().unwrap(), vec![faces]);
        let written = h.written.lock().unwrap();
        assert_eq!(written.len(), 1);
        assert_eq!(written[0].0, PathBuf::from("out.png"));
        assert_eq!(written[0].1.data()[0], 255);
    }

    #[test]
    fn test_zero_faces_still_writes_output() {
        let mut h = harness(Some(blank_frame()), vec![]);
        let report = h
            .use_case
            .execute(Path::new("in.png"), Some(Path::new("out.png")))
            .unwrap();
        assert_eq!(report.face_count, 0);
        assert_eq!(h.written.lock().unwrap().len(), 1);
    }

    #[test]
    fn test_unreadable_input_fails() {
        let mut h = harness(None, vec![]);
        assert!(h.use_case.execute(Path::new("in.png"), None).is_err());
    }
}
