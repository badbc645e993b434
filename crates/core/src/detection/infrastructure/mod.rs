pub mod brightness_asymmetry_detector;
pub mod integral_image_scorer;
