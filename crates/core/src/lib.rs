//! Brightness-asymmetry face detection.
//!
//! Grayscale conversion, quadrant scoring, multi-scale window scanning and
//! overlap clustering, plus the image I/O and pipeline plumbing the
//! `facefinder` CLI is built from.

pub mod annotation;
pub mod detection;
pub mod pipeline;
pub mod shared;
pub mod video;

pub use detection::domain::detection_error::DetectionError;
pub use detection::infrastructure::brightness_asymmetry_detector::detect_faces;
pub use shared::detection_params::DetectionParams;
pub use shared::frame::Frame;
pub use shared::region::Region;
