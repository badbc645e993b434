/// Smallest window side evaluated by the scanner.
pub const MIN_WINDOW_SIZE: u32 = 30;

/// Top-half average must exceed this fraction of the bottom-half average.
pub const TOP_BRIGHTNESS_RATIO: f64 = 0.9;

/// Maximum left/right average difference, in 0-255 intensity units.
pub const SYMMETRY_TOLERANCE: f64 = 30.0;

pub const DEFAULT_SCALE_FACTOR: f64 = 1.3;
pub const DEFAULT_MIN_NEIGHBORS: i32 = 5;

/// Ranges exposed by the interactive controls.
pub const SCALE_FACTOR_RANGE: (f64, f64) = (1.1, 2.0);
pub const MIN_NEIGHBORS_RANGE: (i32, i32) = (1, 10);

/// Outline colour and stroke width for rendered detections.
pub const BOX_COLOR: [u8; 3] = [0x00, 0xff, 0x00];
pub const BOX_LINE_WIDTH: u32 = 3;

/// Gap between a box's top edge and the baseline of its caption.
pub const LABEL_BASELINE_OFFSET: i64 = 5;

pub const RESULT_FILE_NAME: &str = "face-detection-result.png";

pub const IMAGE_EXTENSIONS: &[&str] = &["jpg", "jpeg", "png", "bmp", "tiff", "tif", "webp", "gif"];
