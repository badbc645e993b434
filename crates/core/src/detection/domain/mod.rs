pub mod cluster_merger;
pub mod detection_error;
pub mod face_detector;
pub mod grayscale_converter;
pub mod region_scorer;
pub mod window_scanner;
