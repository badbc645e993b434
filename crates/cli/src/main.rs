mod settings;

use std::path::{Path, PathBuf};
use std::process;

use clap::{Parser, ValueEnum};
use serde::Serialize;

use facefinder_core::annotation::infrastructure::box_outline_annotator::BoxOutlineAnnotator;
use facefinder_core::detection::domain::window_scanner::WindowScanner;
use facefinder_core::detection::infrastructure::brightness_asymmetry_detector::BrightnessAsymmetryDetector;
use facefinder_core::pipeline::detect_image_use_case::DetectImageUseCase;
use facefinder_core::pipeline::detect_stream_use_case::DetectStreamUseCase;
use facefinder_core::pipeline::detection_report::DetectionReport;
use facefinder_core::pipeline::infrastructure::threaded_stream_executor::ThreadedStreamExecutor;
use facefinder_core::pipeline::pipeline_logger::SummaryPipelineLogger;
use facefinder_core::shared::constants::{
    MIN_NEIGHBORS_RANGE, RESULT_FILE_NAME, SCALE_FACTOR_RANGE,
};
use facefinder_core::shared::detection_params::DetectionParams;
use facefinder_core::video::domain::frame_reader::FrameReader;
use facefinder_core::video::infrastructure::image_file_reader::ImageFileReader;
use facefinder_core::video::infrastructure::image_file_writer::ImageFileWriter;
use facefinder_core::video::infrastructure::image_sequence_reader::ImageSequenceReader;

use settings::Settings;

/// Heuristic face detection for images and frame sequences.
#[derive(Parser)]
#[command(name = "facefinder")]
struct Cli {
    /// Input image file, or a directory of frames processed in name order.
    input: PathBuf,

    /// Where to save annotated output. For a single image this may be a
    /// file or a directory; for a frame directory it must be a directory.
    #[arg(long, short)]
    output: Option<PathBuf>,

    /// Window growth per scan step (1.1-2.0).
    #[arg(long)]
    scale_factor: Option<f64>,

    /// Overlap cluster strictness (1-10).
    #[arg(long)]
    min_neighbors: Option<i32>,

    /// Report format.
    #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
    format: OutputFormat,

    /// Scan window sizes one after another instead of in parallel.
    #[arg(long)]
    sequential: bool,

    /// Settings file to use instead of the per-user default.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Persist the effective detection settings before running.
    #[arg(long)]
    save_settings: bool,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum OutputFormat {
    Text,
    Json,
}

#[derive(Serialize)]
struct JsonReport<'a> {
    parameters: DetectionParams,
    reports: &'a [DetectionReport],
}

fn main() {
    env_logger::init();

    if let Err(e) = run() {
        eprintln!("Error: {e}");
        process::exit(1);
    }
}

fn run() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let settings = effective_settings(&cli);
    validate(&cli, &settings)?;

    if cli.save_settings {
        let path = settings.save(cli.config.as_deref())?;
        log::info!("Settings saved to {}", path.display());
    }

    let params = DetectionParams::new(settings.scale_factor, settings.min_neighbors)?;
    let reports = if cli.input.is_dir() {
        run_stream(&cli.input, cli.output.as_deref(), params, &settings)?
    } else {
        let output = cli.output.as_deref().map(resolve_image_output);
        vec![run_image(&cli.input, output.as_deref(), params, &settings)?]
    };

    match cli.format {
        OutputFormat::Text => print!("{}", render_text(&reports)),
        OutputFormat::Json => println!(
            "{}",
            serde_json::to_string_pretty(&JsonReport {
                parameters: params,
                reports: &reports,
            })?
        ),
    }
    Ok(())
}

/// Settings file values with explicit flags layered on top.
fn effective_settings(cli: &Cli) -> Settings {
    let mut settings = Settings::load(cli.config.as_deref());
    if let Some(scale) = cli.scale_factor {
        settings.scale_factor = scale;
    }
    if let Some(min_neighbors) = cli.min_neighbors {
        settings.min_neighbors = min_neighbors;
    }
    if cli.sequential {
        settings.parallel_scan = false;
    }
    settings
}

fn build_detector(params: DetectionParams, settings: &Settings) -> BrightnessAsymmetryDetector {
    let scanner = if settings.parallel_scan {
        WindowScanner::parallel()
    } else {
        WindowScanner::new()
    };
    BrightnessAsymmetryDetector::new(params).with_scanner(scanner)
}

fn run_image(
    input: &Path,
    output: Option<&Path>,
    params: DetectionParams,
    settings: &Settings,
) -> Result<DetectionReport, Box<dyn std::error::Error>> {
    let mut use_case = DetectImageUseCase::new(
        Box::new(ImageFileReader::new()),
        Box::new(build_detector(params, settings)),
        Box::new(BoxOutlineAnnotator::new(settings.box_color, settings.line_width)),
        Box::new(ImageFileWriter::new()),
        Box::new(SummaryPipelineLogger::default()),
    );
    use_case.execute(input, output)
}

fn run_stream(
    input: &Path,
    output_dir: Option<&Path>,
    params: DetectionParams,
    settings: &Settings,
) -> Result<Vec<DetectionReport>, Box<dyn std::error::Error>> {
    let mut reader = ImageSequenceReader::new();
    let metadata = reader.open(input)?;

    let progress: Box<dyn Fn(usize, usize) -> bool + Send> = Box::new(|current, total| {
        eprint!("\rDetecting frame {current}/{total}");
        true
    });

    let mut use_case = DetectStreamUseCase::new(
        Box::new(reader),
        Box::new(build_detector(params, settings)),
        Box::new(
            BoxOutlineAnnotator::new(settings.box_color, settings.line_width).with_label(true),
        ),
        Box::new(ImageFileWriter::new()),
        Box::new(ThreadedStreamExecutor::new()),
        Box::new(SummaryPipelineLogger::default()),
        Some(progress),
        None,
    );
    let reports = use_case.execute(&metadata, output_dir)?;
    eprintln!();
    if let Some(dir) = output_dir {
        log::info!("Annotated frames written to {}", dir.display());
    }
    Ok(reports)
}

fn validate(cli: &Cli, settings: &Settings) -> Result<(), Box<dyn std::error::Error>> {
    if !cli.input.exists() {
        return Err(format!("Input not found: {}", cli.input.display()).into());
    }
    let (lo, hi) = SCALE_FACTOR_RANGE;
    if !(lo..=hi).contains(&settings.scale_factor) {
        return Err(format!(
            "Scale factor must be between {lo} and {hi}, got {}",
            settings.scale_factor
        )
        .into());
    }
    let (lo, hi) = MIN_NEIGHBORS_RANGE;
    if !(lo..=hi).contains(&settings.min_neighbors) {
        return Err(format!(
            "Min neighbors must be between {lo} and {hi}, got {}",
            settings.min_neighbors
        )
        .into());
    }
    if cli.input.is_dir() {
        if let Some(out) = &cli.output {
            if out.is_file() {
                return Err(format!(
                    "Output for a frame directory must be a directory, got {}",
                    out.display()
                )
                .into());
            }
        }
    }
    Ok(())
}

/// An existing directory (or a path ending in a separator) receives the
/// default result file name.
fn resolve_image_output(output: &Path) -> PathBuf {
    let names_dir = output.as_os_str().to_string_lossy().ends_with(['/', '\\']);
    if output.is_dir() || names_dir {
        output.join(RESULT_FILE_NAME)
    } else {
        output.to_path_buf()
    }
}

fn render_text(reports: &[DetectionReport]) -> String {
    match reports {
        [single] => {
            let mut text = format!("Faces detected: {}\n", single.face_count);
            for face in &single.faces {
                text.push_str(&format!(
                    "  x={} y={} width={} height={}\n",
                    face.x, face.y, face.width, face.height
                ));
            }
            text
        }
        many => {
            let total: usize = many.iter().map(|r| r.face_count).sum();
            let mut text: String = many.iter().map(|r| format!("{r}\n")).collect();
            text.push_str(&format!(
                "Faces detected: {total} across {} frames\n",
                many.len()
            ));
            text
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use facefinder_core::shared::region::Region;

    fn report(index: usize, faces: Vec<Region>) -> DetectionReport {
        DetectionReport {
            source: None,
            frame_index: index,
            width: 100,
            height: 100,
            face_count: faces.len(),
            faces,
        }
    }

    #[test]
    fn test_existing_dir_gets_default_file_name() {
        let dir = tempfile::tempdir().unwrap();
        assert_eq!(
            resolve_image_output(dir.path()),
            dir.path().join(RESULT_FILE_NAME)
        );
    }

    #[test]
    fn test_file_output_kept_as_is() {
        let path = Path::new("/tmp/some/annotated.jpg");
        assert_eq!(resolve_image_output(path), path.to_path_buf());
    }

    #[test]
    fn test_text_for_single_image() {
        let text = render_text(&[report(0, vec![Region::square(6, 6, 33)])]);
        assert_eq!(text, "Faces detected: 1\n  x=6 y=6 width=33 height=33\n");
    }

    #[test]
    fn test_text_for_sequence_totals_faces() {
        let text = render_text(&[
            report(0, vec![Region::square(0, 0, 30)]),
            report(1, vec![]),
        ]);
        assert!(text.starts_with("Frame 0: Faces detected: 1\n"));
        assert!(text.contains("Frame 1: Faces detected: 0\n"));
        assert!(text.ends_with("Faces detected: 1 across 2 frames\n"));
    }

    #[test]
    fn test_flags_override_settings_file() {
        let dir = tempfile::tempdir().unwrap();
        let config = dir.path().join("settings.json");
        std::fs::write(&config, r#"{"scale_factor": 1.5, "min_neighbors": 8}"#).unwrap();

        let cli = Cli::parse_from([
            "facefinder",
            "in.png",
            "--config",
            config.to_str().unwrap(),
            "--min-neighbors",
            "3",
            "--sequential",
        ]);
        let settings = effective_settings(&cli);
        assert_eq!(settings.scale_factor, 1.5);
        assert_eq!(settings.min_neighbors, 3);
        assert!(!settings.parallel_scan);
    }

    #[test]
    fn test_out_of_range_scale_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let cli = Cli::parse_from([
            "facefinder",
            dir.path().to_str().unwrap(),
            "--scale-factor",
            "2.5",
        ]);
        let settings = effective_settings(&cli);
        let err = validate(&cli, &settings).unwrap_err();
        assert!(err.to_string().contains("Scale factor"));
    }
}
