//! Card Mesher CLI
//!
//! Build textured card scenes from front/back images and optional models.

use card_mesher::{
    classify_orientation, compute_placement, export_glb, CardBuilder, CardConfig, CardRequest,
    CornerMask, Extent,
};
use clap::{Parser, Subcommand};
use std::fs;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "card-mesher")]
#[command(author, version, about = "Build textured 3D cards from images", long_about = None)]
struct Cli {
    /// Enable debug logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Build a card and export it as GLB
    Build {
        /// Front image (PNG or JPEG)
        #[arg(short, long)]
        front: PathBuf,

        /// Back image (PNG or JPEG)
        #[arg(short, long)]
        back: Option<PathBuf>,

        /// glTF/GLB model to place the images on
        #[arg(short, long)]
        model: Option<PathBuf>,

        /// Output file path
        #[arg(short, long)]
        output: PathBuf,

        /// JSON card configuration
        #[arg(short, long)]
        config: Option<PathBuf>,
    },

    /// Write a rounded-corner alpha mask as PNG
    Mask {
        /// Corner radius as a fraction of the mask size, in (0, 0.5]
        #[arg(short, long)]
        radius: f32,

        /// Mask width and height in pixels
        #[arg(short, long, default_value = "512")]
        size: u32,

        /// Output file path
        #[arg(short, long)]
        output: PathBuf,
    },

    /// Print the orientation and plane placement for an extent
    Inspect {
        #[arg(long)]
        width: f32,

        #[arg(long)]
        height: f32,

        #[arg(long)]
        depth: f32,
    },
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let level = if cli.verbose {
        tracing::Level::DEBUG
    } else {
        tracing::Level::INFO
    };
    tracing_subscriber::fmt()
        .with_max_level(level)
        .without_time()
        .compact()
        .init();

    match cli.command {
        Commands::Build {
            front,
            back,
            model,
            output,
            config,
        } => {
            build_card(&front, back.as_ref(), model.as_ref(), &output, config.as_ref())?;
        }
        Commands::Mask {
            radius,
            size,
            output,
        } => {
            write_mask(radius, size, &output)?;
        }
        Commands::Inspect {
            width,
            height,
            depth,
        } => {
            inspect(Extent::new(width, height, depth))?;
        }
    }

    Ok(())
}

fn build_card(
    front_path: &PathBuf,
    back_path: Option<&PathBuf>,
    model_path: Option<&PathBuf>,
    output_path: &PathBuf,
    config_path: Option<&PathBuf>,
) -> Result<(), Box<dyn std::error::Error>> {
    let config = match config_path {
        Some(path) => {
            tracing::info!(?path, "loading card config");
            CardConfig::from_json(&fs::read_to_string(path)?)?
        }
        None => CardConfig::default(),
    };
    let mut builder = CardBuilder::with_config(config)?;

    let front = fs::read(front_path)?;
    let back = back_path.map(fs::read).transpose()?;
    let model = model_path.map(fs::read).transpose()?;

    let mut request = CardRequest::new(&front);
    if let Some(back) = &back {
        request = request.with_back(back);
    }
    if let Some(model) = &model {
        request = request.with_model(model);
    }

    let card = builder.build_or_placeholder(&request)?;
    let extent = card.extent();
    tracing::info!(
        imported = card.body().is_imported(),
        thin_axis = %card.placement().thin_axis,
        "built card {:.3} x {:.3} x {:.3}",
        extent.width,
        extent.height,
        extent.depth
    );

    let glb_path = if output_path.extension().is_some() {
        output_path.clone()
    } else {
        output_path.with_extension("glb")
    };
    let glb_data = export_glb(&card)?;
    fs::write(&glb_path, &glb_data)?;
    println!("Exported GLB ({} bytes) to {:?}", glb_data.len(), glb_path);

    Ok(())
}

fn write_mask(
    radius: f32,
    size: u32,
    output_path: &PathBuf,
) -> Result<(), Box<dyn std::error::Error>> {
    let mask = CornerMask::generate(radius, size)?;
    fs::write(output_path, mask.to_png()?)?;
    println!(
        "Exported {}x{} mask ({:.1}% opaque) to {:?}",
        size,
        size,
        mask.coverage() * 100.0,
        output_path
    );
    Ok(())
}

fn inspect(extent: Extent) -> Result<(), Box<dyn std::error::Error>> {
    let orientation = classify_orientation(&extent);
    let plan = compute_placement(&extent, &orientation)?;

    let sorted: Vec<_> = orientation
        .sorted_axes
        .iter()
        .map(|(axis, magnitude)| serde_json::json!({ "axis": axis, "magnitude": magnitude }))
        .collect();
    let report = serde_json::json!({
        "extent": extent,
        "thin_axis": orientation.thin_axis,
        "sorted_axes": sorted,
        "needs_upright": orientation.needs_upright(),
        "plane_width": plan.plane_width,
        "plane_height": plan.plane_height,
        "front_offset": plan.front_offset,
        "back_offset": plan.back_offset,
        "front_rotation": plan.front_rotation.to_array(),
        "back_rotation": plan.back_rotation.to_array(),
    });
    println!("{}", serde_json::to_string_pretty(&report)?);
    Ok(())
}
