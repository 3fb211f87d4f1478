//! CLI for tileclip - Clip GeoJSON polygons to a tile or rectangle
//!
//! This is a thin wrapper around the tileclip-core library.

use anyhow::{bail, Context, Result};
use clap::Parser;
use geo::{coord, Rect};
use geojson::{Feature, FeatureCollection, GeoJson};
use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::PathBuf;
use tileclip_core::{clip_geometry, TileConfig, TileCoord};

#[derive(Parser, Debug)]
#[command(
    name = "tileclip",
    about = "Clip GeoJSON polygons to a tile or rectangle",
    version
)]
struct Args {
    /// Input GeoJSON file (FeatureCollection, Feature or Geometry)
    #[arg(value_name = "INPUT")]
    input: PathBuf,

    /// Tile to clip to, as z/x/y. Output is in tile pixel coordinates
    #[arg(long, conflicts_with = "bounds", required_unless_present = "bounds")]
    tile: Option<TileCoord>,

    /// Rectangle to clip to, as minx,miny,maxx,maxy in input coordinates
    #[arg(long, value_parser = parse_bounds, allow_hyphen_values = true)]
    bounds: Option<Rect<f64>>,

    /// Tile extent in pixels
    #[arg(long, default_value = "4096")]
    extent: u32,

    /// Buffer around the tile in screen pixels (1/256th of the tile width)
    #[arg(long, default_value = "8")]
    buffer: u32,

    /// Output file (defaults to stdout)
    #[arg(short, long, value_name = "OUTPUT")]
    output: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,
}

/// Where geometry is clipped, and how input coordinates get there.
enum Target {
    Tile { tile: TileCoord, config: TileConfig },
    Bounds(Rect<f64>),
}

impl Target {
    fn from_args(args: &Args) -> Result<Self> {
        match (args.tile, args.bounds) {
            (Some(tile), _) => Ok(Target::Tile {
                tile,
                config: TileConfig::default()
                    .with_extent(args.extent)
                    .with_buffer(args.buffer),
            }),
            (None, Some(bounds)) => Ok(Target::Bounds(bounds)),
            (None, None) => bail!("one of --tile or --bounds is required"),
        }
    }

    fn clip_bounds(&self) -> Rect<f64> {
        match self {
            Target::Tile { config, .. } => config.clip_bounds(),
            Target::Bounds(bounds) => *bounds,
        }
    }

    fn prepare(&self, geometry: geo::Geometry<f64>) -> geo::Geometry<f64> {
        match self {
            Target::Tile { tile, config } => tile.project_geometry(&geometry, config.extent),
            Target::Bounds(_) => geometry,
        }
    }
}

fn parse_bounds(s: &str) -> std::result::Result<Rect<f64>, String> {
    let values: Vec<f64> = s
        .split(',')
        .map(|v| v.trim().parse::<f64>())
        .collect::<std::result::Result<_, _>>()
        .map_err(|e| format!("Invalid bounds '{}': {}", s, e))?;

    match values.as_slice() {
        [min_x, min_y, max_x, max_y] if values.iter().all(|v| v.is_finite()) => Ok(Rect::new(
            coord! { x: *min_x, y: *min_y },
            coord! { x: *max_x, y: *max_y },
        )),
        _ => Err(format!(
            "Invalid bounds '{}': expected minx,miny,maxx,maxy",
            s
        )),
    }
}

fn load_features(args: &Args) -> Result<Vec<Feature>> {
    let text = std::fs::read_to_string(&args.input)
        .with_context(|| format!("Failed to read {}", args.input.display()))?;
    let geojson: GeoJson = text
        .parse()
        .with_context(|| format!("Failed to parse GeoJSON from {}", args.input.display()))?;

    Ok(match geojson {
        GeoJson::FeatureCollection(collection) => collection.features,
        GeoJson::Feature(feature) => vec![feature],
        GeoJson::Geometry(geometry) => vec![Feature {
            bbox: None,
            geometry: Some(geometry),
            id: None,
            properties: None,
            foreign_members: None,
        }],
    })
}

/// Clip one feature, keeping its id and properties.
///
/// Returns `None` for features that end up outside the target.
fn clip_feature(index: usize, feature: Feature, target: &Target) -> Result<Option<Feature>> {
    let Some(geometry) = feature.geometry else {
        log::debug!("feature {} has no geometry; skipping", index);
        return Ok(None);
    };
    let geometry = geo::Geometry::<f64>::try_from(geometry)
        .with_context(|| format!("Failed to convert feature {} geometry", index))?;

    let clipped = clip_geometry(&target.prepare(geometry), target.clip_bounds())
        .with_context(|| format!("Failed to clip feature {}", index))?;

    Ok(clipped.map(|geometry| Feature {
        bbox: None,
        geometry: Some(geojson::Geometry::new(geojson::Value::from(&geometry))),
        id: feature.id,
        properties: feature.properties,
        foreign_members: feature.foreign_members,
    }))
}

fn write_output(args: &Args, collection: FeatureCollection) -> Result<()> {
    let geojson = GeoJson::FeatureCollection(collection);
    match &args.output {
        Some(path) => {
            let file = File::create(path)
                .with_context(|| format!("Failed to create {}", path.display()))?;
            let mut writer = BufWriter::new(file);
            serde_json::to_writer_pretty(&mut writer, &geojson)
                .context("Failed to write GeoJSON")?;
            writer.flush()?;
        }
        None => {
            let mut stdout = io::stdout().lock();
            serde_json::to_writer_pretty(&mut stdout, &geojson)
                .context("Failed to write GeoJSON")?;
            writeln!(stdout)?;
        }
    }
    Ok(())
}

fn main() -> Result<()> {
    let args = Args::parse();

    // Initialize logging
    let log_level = if args.verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(log_level))
        .init();

    let target = Target::from_args(&args)?;
    let features = load_features(&args)?;
    let total = features.len();

    let mut kept = Vec::new();
    let mut skipped = 0usize;
    for (index, feature) in features.into_iter().enumerate() {
        match clip_feature(index, feature, &target) {
            Ok(Some(feature)) => kept.push(feature),
            Ok(None) => {}
            Err(e) => {
                log::warn!("{:#}", e);
                skipped += 1;
            }
        }
    }

    log::info!(
        "Clipped {} features: {} kept, {} outside, {} skipped",
        total,
        kept.len(),
        total - kept.len() - skipped,
        skipped
    );

    write_output(
        &args,
        FeatureCollection {
            bbox: None,
            features: kept,
            foreign_members: None,
        },
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_bounds() {
        let rect = parse_bounds("-10, -5, 10, 5").unwrap();
        assert_eq!(rect.min(), coord! { x: -10.0, y: -5.0 });
        assert_eq!(rect.max(), coord! { x: 10.0, y: 5.0 });
    }

    #[test]
    fn test_parse_bounds_rejects_bad_input() {
        assert!(parse_bounds("1,2,3").is_err());
        assert!(parse_bounds("a,b,c,d").is_err());
        assert!(parse_bounds("0,0,inf,1").is_err());
    }

    #[test]
    fn test_args_require_a_target() {
        assert!(Args::try_parse_from(["tileclip", "in.geojson"]).is_err());
        assert!(Args::try_parse_from([
            "tileclip",
            "in.geojson",
            "--tile",
            "1/0/0",
            "--bounds",
            "0,0,1,1"
        ])
        .is_err());

        let args = Args::try_parse_from(["tileclip", "in.geojson", "--tile", "3/4/2"]).unwrap();
        assert_eq!(args.tile, Some(TileCoord::new(4, 2, 3)));
        assert_eq!(args.extent, 4096);
        assert_eq!(args.buffer, 8);
    }

    #[test]
    fn test_clip_feature_keeps_properties() {
        let feature: Feature = r#"{
            "type": "Feature",
            "properties": {"name": "square"},
            "geometry": {
                "type": "Polygon",
                "coordinates": [[[-5, -5], [5, -5], [5, 5], [-5, 5], [-5, -5]]]
            }
        }"#
        .parse()
        .unwrap();
        let target = Target::Bounds(Rect::new(
            coord! { x: 0.0, y: 0.0 },
            coord! { x: 10.0, y: 10.0 },
        ));

        let clipped = clip_feature(0, feature, &target).unwrap().unwrap();
        assert_eq!(
            clipped.property("name").and_then(|v| v.as_str()),
            Some("square")
        );
        let geometry = geo::Geometry::<f64>::try_from(clipped.geometry.unwrap()).unwrap();
        assert!(matches!(geometry, geo::Geometry::Polygon(_)));
    }
}
