pub mod detect_image_use_case;
pub mod detect_stream_use_case;
pub mod detection_report;
pub mod infrastructure;
pub mod pipeline_logger;
pub mod stream_executor;
