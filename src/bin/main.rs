//! Spritesheet Builder CLI
//!
//! Pack placed sprite images into a single-column spritesheet.

use clap::{Parser, Subcommand, ValueEnum};
use spritesheet_builder::{FrameGrid, Project, ProjectSettings};
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Parser)]
#[command(name = "spritesheet-builder")]
#[command(author, version, about = "Pack grid-addressed sprite frames into a spritesheet", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Pack a project into a spritesheet and config
    Pack {
        /// Project description file (JSON)
        #[arg(short, long)]
        project: PathBuf,

        /// Output path: a .zip file for bundles, a directory for loose files
        #[arg(short, long)]
        output: PathBuf,

        /// Output format
        #[arg(short, long, value_enum, default_value = "bundle")]
        format: OutputFormat,

        /// Stack all images at x = 0 on grid lines before packing
        #[arg(long)]
        align: bool,

        /// Trim transparent rows from every image before packing
        #[arg(long)]
        crop: bool,

        /// File name of the atlas inside the output
        #[arg(long, default_value = "spritesheet.png")]
        atlas_name: String,
    },

    /// Show information about a project
    Info {
        /// Project description file (JSON)
        #[arg(short, long)]
        project: PathBuf,
    },

    /// List the cell keys a pixel rectangle selects
    Cells {
        /// Frame width in pixels
        #[arg(long, default_value = "32")]
        frame_width: u32,

        /// Frame height in pixels
        #[arg(long, default_value = "32")]
        frame_height: u32,

        /// Corner points: x1 y1 x2 y2
        #[arg(required = true, num_args = 4, value_names = ["X1", "Y1", "X2", "Y2"], allow_negative_numbers = true)]
        corners: Vec<i32>,
    },
}

#[derive(Copy, Clone, PartialEq, Eq, ValueEnum)]
enum OutputFormat {
    /// ZIP archive with atlas, config and sounds
    Bundle,
    /// Atlas PNG and config JSON written into a directory
    Files,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();
    let cli = Cli::parse();

    match cli.command {
        Commands::Pack {
            project,
            output,
            format,
            align,
            crop,
            atlas_name,
        } => {
            pack_project(&project, &output, format, align, crop, atlas_name)?;
        }
        Commands::Info { project } => {
            show_project_info(&project)?;
        }
        Commands::Cells {
            frame_width,
            frame_height,
            corners,
        } => {
            let grid = FrameGrid::new(frame_width, frame_height)?;
            let cells = grid.range_of_cells(corners[0], corners[1], corners[2], corners[3]);
            let keys: Vec<String> = cells.iter().map(|k| k.to_string()).collect();
            println!("{}", keys.join(" "));
        }
    }

    Ok(())
}

fn pack_project(
    project_path: &Path,
    output_path: &Path,
    format: OutputFormat,
    align: bool,
    crop: bool,
    atlas_name: String,
) -> Result<(), Box<dyn std::error::Error>> {
    println!("Loading project from {:?}...", project_path);
    let settings = ProjectSettings {
        atlas_name,
        ..ProjectSettings::default()
    };
    let mut project = Project::from_file(project_path, settings)?;
    println!(
        "  Loaded {} images, {} animations, {} sounds",
        project.images().len(),
        project.animations().len(),
        project.sounds().len()
    );

    if crop {
        project.crop_sprites()?;
        println!("  Cropped sprites (frame height now {})", project.grid().height());
    }
    if align {
        project.align_all();
        println!("  Aligned sprites to grid");
    }

    let missing = project.animations().missing_required();
    if !missing.is_empty() {
        println!("  Attention: missing required animations: {}", missing.join(", "));
    }

    let png = {
        let packed = project.pack()?;
        println!(
            "  Packed {} frames into {}x{} spritesheet",
            packed.band_count(),
            packed.width,
            packed.height
        );
        packed.to_png()?
    };

    match format {
        OutputFormat::Bundle => {
            let zip_path = if output_path.extension().is_some() {
                output_path.to_path_buf()
            } else {
                output_path.join(&project.settings().bundle_name)
            };
            if let Some(parent) = zip_path.parent() {
                fs::create_dir_all(parent)?;
            }
            let bytes = project.bundle()?;
            fs::write(&zip_path, &bytes)?;
            println!("Exported bundle ({} bytes) to {:?}", bytes.len(), zip_path);
        }
        OutputFormat::Files => {
            fs::create_dir_all(output_path)?;
            let png_path = output_path.join(&project.settings().atlas_name);
            let config_path = output_path.join(&project.settings().config_name);

            fs::write(&png_path, &png)?;
            fs::write(&config_path, project.config_json()?)?;

            println!("Exported spritesheet to {:?}", png_path);
            println!("  Config: {:?}", config_path);
        }
    }

    Ok(())
}

fn show_project_info(project_path: &Path) -> Result<(), Box<dyn std::error::Error>> {
    println!("Loading project from {:?}...", project_path);
    let project = Project::from_file(project_path, ProjectSettings::default())?;

    println!("\nProject Info:");
    println!(
        "  Frame size: {}x{}",
        project.grid().width(),
        project.grid().height()
    );
    println!("  Images: {}", project.images().len());
    for (id, image) in project.images().iter() {
        println!(
            "    {} {} {}x{} at ({}, {})",
            id, image.name, image.width, image.height, image.x, image.y
        );
    }
    println!("  Animations: {}", project.animations().len());
    for animation in project.animations().iter() {
        println!("    {}: {} frames", animation.name, animation.len());
    }
    println!("  Sounds: {}", project.sounds().names().join(", "));

    let missing = project.animations().missing_required();
    if !missing.is_empty() {
        println!("  Missing required animations: {}", missing.join(", "));
    }

    Ok(())
}
