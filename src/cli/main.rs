use anyhow::Result;
use clap::Parser;
use std::path::PathBuf;

use cargo_exif::{CargoMetadata, GpsCoordinate, config, exif, pipeline};

#[derive(Parser, Debug)]
#[command(
    name = "cargo-exif",
    version,
    about = "Embed cargo ID, description, dimensions, weight and GPS position into a JPEG as EXIF tags"
)]
struct Cli {
    /// JPEG photo to tag
    #[arg(value_name = "PATH")]
    path: Option<PathBuf>,

    /// Cargo identifier (written to Make as "CargoID:<id>")
    #[arg(long, default_value = "")]
    id: String,

    /// Cargo description (written to ImageDescription)
    #[arg(long, default_value = "")]
    desc: String,

    /// Length
    #[arg(long, default_value = "")]
    length: String,

    /// Width
    #[arg(long, default_value = "")]
    width: String,

    /// Height
    #[arg(long, default_value = "")]
    height: String,

    /// Weight
    #[arg(long, default_value = "")]
    weight: String,

    /// Latitude in decimal degrees (negative = south)
    #[arg(long, allow_hyphen_values = true, requires = "lon")]
    lat: Option<f64>,

    /// Longitude in decimal degrees (negative = west)
    #[arg(long, allow_hyphen_values = true, requires = "lat")]
    lon: Option<f64>,

    /// Output directory (overrides the config file)
    #[arg(short, long, value_name = "DIR")]
    output: Option<PathBuf>,

    /// Path to config file (default: config.json next to binary)
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Initialize a default config.json and exit
    #[arg(long)]
    init: bool,

    /// Build the tagged image without writing it
    #[arg(long)]
    dry_run: bool,

    /// Display the cargo metadata stored in the image and exit
    #[arg(long)]
    show: bool,

    /// Output results as JSON
    #[arg(long)]
    json: bool,

    /// Verbose output
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Set up logging
    let log_level = if cli.verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(log_level))
        .format_timestamp(None)
        .init();

    // Handle --init
    if cli.init {
        let config = config::Config::default();
        let path = cli.config.as_deref();
        config.save(path)?;
        let save_path = match path {
            Some(p) => p.to_path_buf(),
            None => config::Config::config_path()?,
        };
        println!("Default config written to {}", save_path.display());
        return Ok(());
    }

    let Some(path) = cli.path.as_deref() else {
        anyhow::bail!("No input photo specified. Use --help for usage.");
    };

    // Handle --show
    if cli.show {
        let record = exif::read_cargo_file(path)?;
        if cli.json {
            println!("{}", serde_json::to_string_pretty(&record)?);
        } else {
            print_record(path, &record);
        }
        return Ok(());
    }

    // Load config
    let mut config = config::Config::load(cli.config.as_deref())?;

    // Override from CLI flags
    if cli.dry_run {
        config.output.dry_run = true;
    }
    if let Some(ref dir) = cli.output {
        config.output.directory = Some(dir.display().to_string());
    }

    let meta = CargoMetadata {
        id: cli.id,
        desc: cli.desc,
        length: cli.length,
        width: cli.width,
        height: cli.height,
        weight: cli.weight,
    };
    let gps = GpsCoordinate {
        lat: cli.lat,
        lon: cli.lon,
    };

    if config.output.dry_run {
        log::info!("DRY RUN — no files will be written");
    }
    if gps.coordinate().is_none() {
        log::info!("No GPS coordinate given, GPS tags will be omitted");
    }

    let outcome = pipeline::embed_file(path, &meta, &gps, &config)?;

    if cli.json {
        println!(
            "{}",
            serde_json::to_string_pretty(&serde_json::json!({
                "source": outcome.source.display().to_string(),
                "output": outcome.output_path.display().to_string(),
                "bytes": outcome.bytes,
                "gps_written": outcome.gps_written,
                "written": outcome.written,
                "metadata": meta,
            }))?
        );
    } else if outcome.written {
        println!("Image saved with embedded metadata at:\n{}", outcome.output_path.display());
    } else {
        println!("Would write {} ({} bytes)", outcome.output_path.display(), outcome.bytes);
    }

    Ok(())
}

// ANSI color codes
const DIM: &str = "\x1b[2m";
const RESET: &str = "\x1b[0m";
const BOLD: &str = "\x1b[1m";

/// Print cargo metadata read back from a file.
fn print_record(path: &std::path::Path, record: &exif::CargoRecord) {
    println!();
    println!("{BOLD}File:{RESET} {}", path.display());
    println!("{DIM}{}{RESET}", "═".repeat(72));

    print_row("Cargo ID", record.cargo_id.as_deref());
    print_row("Description", record.description.as_deref());
    print_row("Dimensions", record.dimensions.as_deref());

    if record.has_gps {
        if let Some(lat) = record.gps_latitude {
            print_row("GPSLatitude", Some(format!("{lat:.6}").as_str()));
        }
        if let Some(lon) = record.gps_longitude {
            print_row("GPSLongitude", Some(format!("{lon:.6}").as_str()));
        }
    }

    let has_any = record.cargo_id.is_some()
        || record.description.is_some()
        || record.dimensions.is_some()
        || record.has_gps;
    if !has_any {
        println!("  {DIM}(no cargo metadata found){RESET}");
    }
    println!();
}

/// Print a single row in the metadata table.
fn print_row(tag: &str, val: Option<&str>) {
    if let Some(v) = val {
        println!("  {:<22} : {v}", tag);
    }
}
