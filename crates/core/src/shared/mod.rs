pub mod constants;
pub mod detection_params;
pub mod frame;
pub mod intensity_buffer;
pub mod region;
pub mod source_metadata;
