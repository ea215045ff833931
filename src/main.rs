//! digipin - command-line interface to the digipin-rs library.

use clap::{Args, Parser, Subcommand, ValueEnum};
use digipin_rs::{
    CsvDecodeConfig, CsvDigipinConfig, DigipinCell, DigipinCellsToGeoParquet, DigipinError,
    DigipinGrid, GeometryFormat, MAX_LEVEL, csv_to_digipin_csv, decode, digipin_csv_to_coords_csv,
    encode_symbols, format_code, format_symbols,
};
use geo_types::Polygon;
use log::info;
use serde::Serialize;
use std::path::PathBuf;
use std::process;

#[derive(Debug, Clone, Copy, ValueEnum)]
enum GeometryArg {
    /// Well-Known Text
    Wkt,
    /// GeoJSON geometry object
    Geojson,
}

impl From<GeometryArg> for GeometryFormat {
    fn from(arg: GeometryArg) -> Self {
        match arg {
            GeometryArg::Wkt => GeometryFormat::Wkt,
            GeometryArg::Geojson => GeometryFormat::GeoJson,
        }
    }
}

#[derive(Parser)]
#[command(name = "digipin")]
#[command(about = "Encode, decode and convert DIGIPIN geocodes", long_about = None)]
struct Cli {
    /// Increase log verbosity (-v info, -vv debug)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Encode a latitude/longitude into a DIGIPIN
    Encode {
        /// Latitude in decimal degrees
        #[arg(long, allow_hyphen_values = true)]
        lat: f64,
        /// Longitude in decimal degrees
        #[arg(long, allow_hyphen_values = true)]
        lon: f64,
        /// Number of symbols to produce (1-10)
        #[arg(long, default_value_t = MAX_LEVEL)]
        level: u8,
    },
    /// Decode a DIGIPIN to the centre of its cell
    Decode {
        code: String,
        /// Print JSON instead of text
        #[arg(long)]
        json: bool,
    },
    /// Check whether a DIGIPIN is well formed
    Validate { code: String },
    /// Describe a cell given a full code or prefix
    Cell {
        code: String,
        /// List the 16 sub-cells
        #[arg(long)]
        children: bool,
        /// Print the cell polygon
        #[arg(long, value_enum)]
        geometry: Option<GeometryArg>,
    },
    /// Add DIGIPINs to a CSV of coordinates or geometries
    Csv(CsvArgs),
    /// Replace a DIGIPIN column with latitude/longitude columns
    DecodeCsv {
        input: PathBuf,
        output: PathBuf,
        /// Column holding the codes
        #[arg(long)]
        code_column: String,
        /// Skip rows with invalid codes instead of failing
        #[arg(long)]
        skip_invalid: bool,
    },
    /// Write every cell of an extent to GeoParquet
    Parquet {
        output: PathBuf,
        #[arg(long, allow_hyphen_values = true)]
        lat_min: f64,
        #[arg(long, allow_hyphen_values = true)]
        lon_min: f64,
        #[arg(long, allow_hyphen_values = true)]
        lat_max: f64,
        #[arg(long, allow_hyphen_values = true)]
        lon_max: f64,
        #[arg(long)]
        level: u8,
    },
}

#[derive(Args)]
struct CsvArgs {
    input: PathBuf,
    output: PathBuf,
    /// Latitude column (with --lon-column)
    #[arg(long, requires = "lon_column", conflicts_with = "geometry_column")]
    lat_column: Option<String>,
    /// Longitude column (with --lat-column)
    #[arg(long, requires = "lat_column")]
    lon_column: Option<String>,
    /// Column holding WKT or GeoJSON geometries
    #[arg(long, required_unless_present = "lat_column")]
    geometry_column: Option<String>,
    /// Number of symbols per code (1-10)
    #[arg(long, default_value_t = MAX_LEVEL)]
    level: u8,
    /// Columns to drop from the output
    #[arg(long)]
    exclude: Vec<String>,
    /// Add the cell polygon as a column
    #[arg(long, value_enum)]
    cell_geometry: Option<GeometryArg>,
    /// Write codes without separators
    #[arg(long)]
    raw: bool,
    /// Skip rows that cannot be converted instead of failing
    #[arg(long)]
    skip_invalid: bool,
}

#[derive(Serialize)]
struct DecodeOutput {
    digipin: String,
    latitude: f64,
    longitude: f64,
    google_maps_url: String,
    apple_maps_url: String,
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    if let Err(e) = run(cli.command) {
        eprintln!("Error: {}", e);
        process::exit(1);
    }
}

fn init_logging(verbose: u8) {
    let default_level = match verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_level))
        .init();
}

fn run(command: Command) -> Result<(), DigipinError> {
    match command {
        Command::Encode { lat, lon, level } => {
            let symbols = encode_symbols(lat, lon, level)?;
            println!("{}", format_symbols(&symbols));
        }
        Command::Decode { code, json } => {
            let cell = DigipinCell::from_code(&format_code(&code)?)?;
            let center = decode(&cell.code)?;
            if json {
                let output = DecodeOutput {
                    digipin: cell.formatted(),
                    latitude: center.latitude,
                    longitude: center.longitude,
                    google_maps_url: cell.google_maps_url(),
                    apple_maps_url: cell.apple_maps_url(),
                };
                let text = serde_json::to_string_pretty(&output)
                    .map_err(|e| DigipinError::IoError(e.to_string()))?;
                println!("{}", text);
            } else {
                println!("DIGIPIN:     {}", cell.formatted());
                println!("Latitude:    {:.7}", center.latitude);
                println!("Longitude:   {:.7}", center.longitude);
                println!("Google Maps: {}", cell.google_maps_url());
                println!("Apple Maps:  {}", cell.apple_maps_url());
            }
        }
        Command::Validate { code } => {
            format_code(&code)?;
            println!("valid");
        }
        Command::Cell {
            code,
            children,
            geometry,
        } => {
            let cell = DigipinCell::from_code(&code)?;
            let dims = cell.dims()?;
            let b = cell.bounds;

            println!("Cell:      {} (level {})", cell.formatted(), cell.level);
            println!("Latitude:  {:.7} .. {:.7}", b.lat_min, b.lat_max);
            println!("Longitude: {:.7} .. {:.7}", b.lon_min, b.lon_max);
            println!("Center:    {}", cell.center());
            println!(
                "Size:      {:.1} m x {:.1} m ({:.1} m²)",
                dims.height_m, dims.width_m, dims.area_m2
            );

            if let Some(format) = geometry {
                println!("{}", polygon_text(&cell.to_polygon(), format.into()));
            }

            if children {
                for child in cell.children() {
                    println!("  {}  {}", child.formatted(), child.center());
                }
            }
        }
        Command::Csv(args) => {
            let mut config = match (args.lat_column, args.lon_column, args.geometry_column) {
                (Some(lat), Some(lon), _) => CsvDigipinConfig::from_coords(lat, lon),
                (_, _, Some(geometry)) => CsvDigipinConfig::new(geometry),
                _ => {
                    return Err(DigipinError::CsvError(
                        "either --lat-column/--lon-column or --geometry-column is required"
                            .to_string(),
                    ));
                }
            };
            config = config
                .level(args.level)
                .exclude(args.exclude)
                .formatted(!args.raw)
                .skip_invalid(args.skip_invalid);
            if let Some(format) = args.cell_geometry {
                config = config.with_cell_geometry(format.into());
            }

            let summary = csv_to_digipin_csv(&args.input, &args.output, &config)?;
            println!(
                "Wrote {} rows to {} ({} skipped)",
                summary.rows_written,
                args.output.display(),
                summary.rows_skipped
            );
        }
        Command::DecodeCsv {
            input,
            output,
            code_column,
            skip_invalid,
        } => {
            let config = CsvDecodeConfig::new(code_column).skip_invalid(skip_invalid);
            let summary = digipin_csv_to_coords_csv(&input, &output, &config)?;
            println!(
                "Wrote {} rows to {} ({} skipped)",
                summary.rows_written,
                output.display(),
                summary.rows_skipped
            );
        }
        Command::Parquet {
            output,
            lat_min,
            lon_min,
            lat_max,
            lon_max,
            level,
        } => {
            let grid = DigipinGrid::from_extent(lat_min, lon_min, lat_max, lon_max, level)?;
            info!("generated {} level-{} cells", grid.len(), level);
            grid.cells().to_geoparquet(&output)?;
            println!("Wrote {} cells to {}", grid.len(), output.display());
        }
    }
    Ok(())
}

fn polygon_text(polygon: &Polygon<f64>, format: GeometryFormat) -> String {
    match format {
        GeometryFormat::Wkt => {
            use wkt::ToWkt;
            polygon.wkt_string()
        }
        GeometryFormat::GeoJson => geojson::Geometry::from(polygon).to_string(),
    }
}
