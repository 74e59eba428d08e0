use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use glance_aws::AwsSession;
use glance_core::{
    BoxAnnotator, CelebrityRecognizer, DocumentAnalyzer, FaceComparator, FaceRecord,
    TextLineExtractor,
};
use std::path::{Path, PathBuf};

mod config;

use config::Config;

#[derive(Parser)]
#[command(name = "glance", about = "Document OCR and face recognition via AWS")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Extract form fields from a document image
    Analyze {
        document: PathBuf,
        /// Print resolved key/value pairs instead of the raw blocks
        #[arg(long)]
        pairs: bool,
    },
    /// Print the lines of text detected in a document image
    Lines { document: PathBuf },
    /// Compare the face in SOURCE against the faces in TARGET
    Compare {
        source: PathBuf,
        target: PathBuf,
        /// Minimum similarity in percent (default: GLANCE_SIMILARITY_THRESHOLD or 80)
        #[arg(short, long)]
        threshold: Option<f32>,
        /// Draw the matched faces onto a copy of TARGET
        #[arg(long, value_name = "OUT")]
        annotate: Option<PathBuf>,
    },
    /// Recognize celebrities in a photo and draw labelled boxes
    Celebrities {
        photo: PathBuf,
        /// Annotated output (default: <photo>_celebrities.<ext>)
        #[arg(short, long)]
        output: Option<PathBuf>,
        /// Also save the recognized faces as JSON
        #[arg(long, value_name = "FILE")]
        json: Option<PathBuf>,
    },
    /// Draw faces from a saved JSON face list onto an image
    Annotate {
        image: PathBuf,
        faces: PathBuf,
        output: PathBuf,
    },
    /// Run every call-through against the sample images in a directory
    Demo { images_dir: PathBuf },
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();
    let config = Config::from_env();
    let annotator = BoxAnnotator::new(config.annotation_style());

    match cli.command {
        Commands::Analyze { document, pairs } => {
            let textract = session(&config)?.textract();
            let analysis = DocumentAnalyzer::new(&textract).analyze_file(&document)?;
            if pairs {
                for (key, value) in analysis.key_values() {
                    println!("{key}: {value}");
                }
            } else {
                println!("{}", serde_json::to_string_pretty(&analysis)?);
            }
        }
        Commands::Lines { document } => {
            let textract = session(&config)?.textract();
            for line in TextLineExtractor::new(&textract).extract_lines_file(&document)? {
                println!("{line}");
            }
        }
        Commands::Compare {
            source,
            target,
            threshold,
            annotate,
        } => {
            let rekognition = session(&config)?.rekognition();
            let threshold = threshold.unwrap_or(config.similarity_threshold);
            let matches = FaceComparator::new(&rekognition).compare(&source, &target, threshold)?;
            if matches.is_empty() {
                println!("No faces matched at {threshold}% similarity");
            }
            for m in &matches {
                println!("Similarity: {}%", m.similarity);
            }
            if let Some(out) = annotate {
                let faces: Vec<FaceRecord> = matches.into_iter().map(|m| m.face).collect();
                annotator
                    .annotate(&target, &out, &faces)
                    .with_context(|| format!("annotating {}", target.display()))?;
                println!("Image saved: {}", out.display());
            }
        }
        Commands::Celebrities {
            photo,
            output,
            json,
        } => {
            let rekognition = session(&config)?.rekognition();
            let faces = CelebrityRecognizer::new(&rekognition).recognize(&photo)?;
            for face in &faces {
                println!(
                    "{} ({:.1}%)",
                    face.name.as_deref().unwrap_or("unknown"),
                    face.confidence.unwrap_or_default()
                );
            }
            if let Some(path) = json {
                std::fs::write(&path, serde_json::to_string_pretty(&faces)?)
                    .with_context(|| format!("writing {}", path.display()))?;
            }
            let out = output.unwrap_or_else(|| default_output(&photo));
            annotator
                .annotate(&photo, &out, &faces)
                .with_context(|| format!("annotating {}", photo.display()))?;
            println!("Image saved: {}", out.display());
        }
        Commands::Annotate {
            image,
            faces: faces_path,
            output,
        } => {
            let raw = glance_core::loader::load(&faces_path)?;
            let faces: Vec<FaceRecord> = serde_json::from_slice(&raw)
                .with_context(|| format!("parsing face list {}", faces_path.display()))?;
            annotator
                .annotate(&image, &output, &faces)
                .with_context(|| format!("annotating {}", image.display()))?;
            println!("Image saved: {}", output.display());
        }
        Commands::Demo { images_dir } => run_demo(&config, &annotator, &images_dir)?,
    }

    Ok(())
}

fn session(config: &Config) -> Result<AwsSession> {
    AwsSession::load(config.region.as_deref()).context("initializing AWS session")
}

/// The full call-through sequence against a directory of sample images.
fn run_demo(config: &Config, annotator: &BoxAnnotator, dir: &Path) -> Result<()> {
    tracing::info!(dir = %dir.display(), "running demo sequence");
    let session = session(config)?;
    let textract = session.textract();
    let rekognition = session.rekognition();

    println!("=== Driver's license fields ===");
    let analysis = DocumentAnalyzer::new(&textract).analyze_file(dir.join("cnh.png"))?;
    println!("{}", serde_json::to_string_pretty(&analysis)?);

    println!("=== Lines detected in the list ===");
    let lines = TextLineExtractor::new(&textract)
        .extract_lines_file(dir.join("lista-material-escolar.jpeg"))?;
    for line in lines {
        println!("{line}");
    }

    println!("=== Comparing faces ===");
    let matches = FaceComparator::new(&rekognition).compare(
        dir.join("neymar.jpg"),
        dir.join("msn.jpg"),
        config.similarity_threshold,
    )?;
    for m in matches {
        println!("Similarity: {}%", m.similarity);
    }

    println!("=== Recognizing celebrities ===");
    let photo = dir.join("neymar-torcedores.jpg");
    let faces = CelebrityRecognizer::new(&rekognition).recognize(&photo)?;
    let out = dir.join("resultado_celebridades.jpg");
    annotator
        .annotate(&photo, &out, &faces)
        .with_context(|| format!("annotating {}", photo.display()))?;
    println!("Image saved: {}", out.display());

    Ok(())
}

/// `photos/team.jpg` → `photos/team_celebrities.jpg`.
fn default_output(photo: &Path) -> PathBuf {
    let stem = photo
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "image".to_string());
    let name = match photo.extension() {
        Some(ext) => format!("{stem}_celebrities.{}", ext.to_string_lossy()),
        None => format!("{stem}_celebrities.png"),
    };
    photo.with_file_name(name)
}
