use std::path::{Path, PathBuf};
use std::sync::atomic::AtomicBool;
use std::sync::Arc;
use std::time::Instant;

use crate::annotation::domain::frame_annotator::FrameAnnotator;
use crate::detection::domain::face_detector::FaceDetector;
use crate::pipeline::detection_report::DetectionReport;
use crate::pipeline::pipeline_logger::PipelineLogger;
use crate::shared::source_metadata::SourceMetadata;
use crate::video::domain::frame_reader::FrameReader;
use crate::video::domain::image_writer::ImageWriter;

use super::stream_executor::{StreamConfig, StreamExecutor};

/// Continuous detection over an ordered frame source.
///
/// Each frame's report is collected in capture order. When an output
/// directory is given, every annotated frame is written there as
/// `frame_{index:05}.png`. Single-use: `execute` consumes the owned
/// components, so calling it twice fails.
pub struct DetectStreamUseCase {
    reader: Option<Box<dyn FrameReader>>,
    detector: Option<Box<dyn FaceDetector>>,
    annotator: Box<dyn FrameAnnotator>,
    image_writer: Box<dyn ImageWriter>,
    executor: Box<dyn StreamExecutor>,
    logger: Box<dyn PipelineLogger>,
    on_progress: Option<Box<dyn Fn(usize, usize) -> bool + Send>>,
    cancelled: Arc<AtomicBool>,
}

impl DetectStreamUseCase {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        reader: Box<dyn FrameReader>,
        detector: Box<dyn FaceDetector>,
        annotator: Box<dyn FrameAnnotator>,
        image_writer: Box<dyn ImageWriter>,
        executor: Box<dyn StreamExecutor>,
        logger: Box<dyn PipelineLogger>,
        on_progress: Option<Box<dyn Fn(usize, usize) -> bool + Send>>,
        cancelled: Option<Arc<AtomicBool>>,
    ) -> Self {
        Self {
            reader: Some(reader),
            detector: Some(detector),
            annotator,
            image_writer,
            executor,
            logger,
            on_progress,
            cancelled: cancelled.unwrap_or_else(|| Arc::new(AtomicBool::new(false))),
        }
    }

    pub fn execute(
        &mut self,
        metadata: &SourceMetadata,
        output_dir: Option<&Path>,
    ) -> Result<Vec<DetectionReport>, Box<dyn std::error::Error>> {
        let config = StreamConfig {
            on_progress: self.on_progress.take(),
            cancelled: self.cancelled.clone(),
        };
        let reader = self.reader.take().ok_or("Pipeline already executed")?;
        let detector = self.detector.take().ok_or("Pipeline already executed")?;

        let total = metadata.total_frames;
        let source = metadata.source_path.clone();
        let annotator = &self.annotator;
        let image_writer = &self.image_writer;
        let logger = &mut self.logger;
        let mut reports = Vec::with_capacity(total);
        let mut last_handled = Instant::now();

        let handled = self.executor.execute(
            reader,
            detector,
            metadata,
            config,
            &mut |mut frame, faces| {
                logger.timing("frame", last_handled.elapsed().as_secs_f64() * 1000.0);
                logger.metric("faces", faces.len() as f64);

                let report = DetectionReport::new(&frame, source.as_deref(), faces);
                if let Some(dir) = output_dir {
                    annotator.annotate(&mut frame, &report.faces)?;
                    image_writer.write(&frame_output_path(dir, frame.index()), &frame)?;
                }
                reports.push(report);

                logger.progress(reports.len(), total);
                last_handled = Instant::now();
                Ok(())
            },
        )?;

        self.logger
            .info(&format!("Processed {handled} of {total} frames"));
        self.logger.summary();
        Ok(reports)
    }
}

/// Path of the annotated copy of frame `index` inside `dir`.
pub fn frame_output_path(dir: &Path, index: usize) -> PathBuf {
    dir.join(format!("frame_{index:05}.png"))
}
