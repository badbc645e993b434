use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread::JoinHandle;

use crate::detection::domain::face_detector::FaceDetector;
use crate::pipeline::stream_executor::{FrameHandler, StreamConfig, StreamExecutor};
use crate::shared::frame::Frame;
use crate::shared::source_metadata::SourceMetadata;
use crate::video::domain::frame_reader::FrameReader;

/// One decoded frame waits while the previous one is being detected.
const DEFAULT_CHANNEL_CAPACITY: usize = 1;

type SendError = Box<dyn std::error::Error + Send + Sync>;

/// Decodes frames on a background thread and detects on the calling thread.
///
/// Layout: `reader → [bounded channel] → detect → handler`
///
/// Each frame is owned by exactly one stage at a time, so decoding frame
/// N+1 never touches the buffer frame N is being scanned from.
pub struct ThreadedStreamExecutor {
    channel_capacity: usize,
}

impl ThreadedStreamExecutor {
    pub fn new() -> Self {
        Self {
            channel_capacity: DEFAULT_CHANNEL_CAPACITY,
        }
    }
}

impl Default for ThreadedStreamExecutor {
    fn default() -> Self {
        Self::new()
    }
}

impl StreamExecutor for ThreadedStreamExecutor {
    fn execute(
        &self,
        reader: Box<dyn FrameReader>,
        mut detector: Box<dyn FaceDetector>,
        metadata: &SourceMetadata,
        config: StreamConfig,
        on_frame: &mut FrameHandler<'_>,
    ) -> Result<usize, Box<dyn std::error::Error>> {
        let total = metadata.total_frames;
        let (frame_tx, frame_rx) =
            crossbeam_channel::bounded::<Result<Frame, SendError>>(self.channel_capacity);
        let reader_handle = spawn_reader(reader, frame_tx, config.cancelled.clone());

        let mut handled = 0usize;
        let mut loop_error: Option<Box<dyn std::error::Error>> = None;

        for frame_result in frame_rx.iter() {
            if config.cancelled.load(Ordering::Relaxed) {
                break;
            }
            let step = frame_result
                .map_err(|e| -> Box<dyn std::error::Error> { e.to_string().into() })
                .and_then(|frame| {
                    let regions = detector.detect(&frame)?;
                    on_frame(frame, regions)
                });
            if let Err(e) = step {
                loop_error = Some(e);
                break;
            }

            handled += 1;
            if let Some(ref cb) = config.on_progress {
                if !cb(handled, total) {
                    config.cancelled.store(true, Ordering::Relaxed);
                    break;
                }
            }
        }

        // Unblock a reader parked on a full channel before joining it.
        drop(frame_rx);
        if reader_handle.join().is_err() && loop_error.is_none() {
            return Err("Frame reader thread panicked".into());
        }

        match loop_error {
            Some(e) => Err(e),
            None => Ok(handled),
        }
    }
}

fn spawn_reader(
    mut reader: Box<dyn FrameReader>,
    frame_tx: crossbeam_channel::Sender<Result<Frame, SendError>>,
    cancelled: Arc<AtomicBool>,
) -> JoinHandle<()> {
    std::thread::spawn(move || {
        for frame_result in reader.frames() {
            if cancelled.load(Ordering::Relaxed) {
                break;
            }
            let mapped = frame_result.map_err(|e| -> SendError { e.to_string().into() });
            if frame_tx.send(mapped).is_err() {
                break;
            }
        }
        reader.close();
    })
}
