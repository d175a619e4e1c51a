#[macro_use]
extern crate clap;
use clap::{App, Arg, ArgMatches, SubCommand};

use failure::{Error, Fail};

use log::{error, info, warn};
use std::io;
use std::io::Write;
use std::path::Path;

use chrono::offset::Local;
use geo_types::Coordinate;
use geojson::{Feature, GeoJson, Geometry, Value};

use property_map_core::feature_io;
use property_map_core::planning_match::{AddressMatcher, MatchContext, SEARCH_RADII};
use property_map_core::spiderfy::{
    calculate_positions, coordinate_key, GeoJsonLayers, PropertyMap, SpiderfyConfig, SpiderfyManager,
    DEFAULT_LATITUDE,
};

#[derive(Debug, Fail)]
pub enum MainError {
    #[fail(display = "Invalid coordinate '{}', expected LNG,LAT", _0)]
    InvalidCoordinate(String),
    #[fail(display = "No features found in {}", _0)]
    NoFeatures(String),
    #[fail(display = "No cluster at {}", _0)]
    NoClusterAt(String),
}

fn main() {
    let local_time = Local::now();
    let time_offset = local_time.offset();

    let matches = build_app().get_matches();
    let level = if matches.is_present("verbose") {
        simplelog::LevelFilter::Debug
    } else {
        simplelog::LevelFilter::Info
    };

    // Configure logging
    simplelog::TermLogger::init(
        level,
        simplelog::Config {
            offset: time_offset.clone(),
            ..simplelog::Config::default()
        },
        simplelog::TerminalMode::Stderr,
    )
    .ok();

    match do_main(&matches) {
        Ok(_) => info!("Process finished OK"),
        Err(err) => {
            error!("Process finished with an error: {}", err);
            std::process::exit(1);
        }
    };
}

fn build_app<'a, 'b>() -> App<'a, 'b> {
    App::new("propmap")
        .version("0.1.0")
        .author("Gustavo Ajzenman")
        .about("Spiderfy coincident map markers and match planning applications to addresses")
        .arg(Arg::with_name("verbose")
            .short("v")
            .long("verbose")
            .global(true)
            .help("Log debug information")
        )
        .subcommand(
            SubCommand::with_name("layout")
                .about("Print the spider positions for a number of markers as GeoJSON")
                .arg(Arg::with_name("count")
                    .short("n")
                    .long("count")
                    .help("Number of coincident markers")
                    .takes_value(true)
                    .required(true)
                )
                .arg(Arg::with_name("center")
                    .short("c")
                    .long("center")
                    .help("Cluster center as LNG,LAT")
                    .takes_value(true)
                    .allow_hyphen_values(true)
                    .default_value("-6.2603,53.3498")
                )
                .arg(Arg::with_name("radius-meters")
                    .short("r")
                    .long("radius-meters")
                    .help("Base radius in metres, scaled at the center latitude")
                    .takes_value(true)
                    .default_value("25")
                )
        )
        .subcommand(
            SubCommand::with_name("spiderfy")
                .about("Expand a cluster of coincident point features into spider legs and markers")
                .arg(Arg::with_name("geo-file")
                    .short("g")
                    .long("geo-file")
                    .help("GeoJSON FeatureCollection of point features")
                    .takes_value(true)
                    .required(true)
                )
                .arg(Arg::with_name("at")
                    .long("at")
                    .help("Cluster to expand, as LNG,LAT. Defaults to the largest cluster.")
                    .takes_value(true)
                    .allow_hyphen_values(true)
                )
                .arg(Arg::with_name("config")
                    .long("config")
                    .help("JSON file with spiderfy display settings")
                    .takes_value(true)
                )
                .arg(Arg::with_name("output")
                    .short("o")
                    .long("output")
                    .help("Sets the output file to create. If omitted, stdout will be used.")
                    .takes_value(true)
                )
        )
        .subcommand(
            SubCommand::with_name("match")
                .about("Score planning applications (CSV) against a property address")
                .arg(Arg::with_name("address")
                    .short("a")
                    .long("address")
                    .help("Property address, e.g. \"123 Main Street, Dublin 4\"")
                    .takes_value(true)
                    .required(true)
                )
                .arg(Arg::with_name("postcode")
                    .short("p")
                    .long("postcode")
                    .help("Dublin postcode of the property, e.g. D4")
                    .takes_value(true)
                )
                .arg(Arg::with_name("radius")
                    .short("r")
                    .long("radius")
                    .help("Search radius in metres (30, 75 or 150)")
                    .takes_value(true)
                    .default_value("75")
                )
                .arg(Arg::with_name("input")
                    .short("i")
                    .long("input")
                    .help("Sets the input file to use. If omitted, stdin will be used.")
                    .takes_value(true)
                )
                .arg(Arg::with_name("output")
                    .short("o")
                    .long("output")
                    .help("Sets the output file to create. If omitted, stdout will be used.")
                    .takes_value(true)
                )
                .arg(Arg::with_name("delimiter")
                    .short("d")
                    .long("delimiter")
                    .help("Delimiter for input and output fields")
                    .takes_value(true)
                    .default_value(",")
                )
        )
}

fn parse_coordinate(value: &str) -> Result<Coordinate<f64>, MainError> {
    let invalid = || MainError::InvalidCoordinate(value.to_owned());
    let mut parts = value.split(',').map(|p| p.trim().parse::<f64>());
    match (parts.next(), parts.next(), parts.next()) {
        (Some(Ok(x)), Some(Ok(y)), None) => Ok(Coordinate { x, y }),
        _ => Err(invalid()),
    }
}

fn open_output(path: Option<&str>) -> Result<Box<dyn io::Write>, Error> {
    match path {
        Some(path) => {
            info!("Writing to file {}.", path);
            Ok(Box::new(std::fs::File::create(path)?))
        }
        None => Ok(Box::new(io::stdout())),
    }
}

fn write_geojson(output: &mut dyn io::Write, geo_json: &GeoJson) -> Result<(), Error> {
    serde_json::to_writer_pretty(&mut *output, geo_json)?;
    writeln!(output)?;
    Ok(())
}

fn layout_command(matches: &ArgMatches) -> Result<(), Error> {
    let count = value_t!(matches, "count", usize)?;
    let center = parse_coordinate(matches.value_of("center").unwrap_or_default())?;
    let meters = value_t!(matches, "radius-meters", f64)?;

    let base_radius = SpiderfyConfig::base_radius_for(meters, center.y);
    info!(
        "Laying out {} markers at {:?}, radius {} m = {:.8} deg",
        count, center, meters, base_radius
    );

    let features = calculate_positions(count, center, base_radius)
        .into_iter()
        .enumerate()
        .map(|(i, coords)| {
            let mut properties = PropertyMap::new();
            properties.insert("index".to_owned(), serde_json::Value::from(i));
            Feature {
                bbox: None,
                geometry: Some(Geometry::new(Value::Point(vec![coords.x, coords.y]))),
                id: None,
                properties: Some(properties),
                foreign_members: None,
            }
        })
        .collect();

    let collection = geojson::FeatureCollection {
        bbox: None,
        features,
        foreign_members: None,
    };
    write_geojson(&mut io::stdout(), &GeoJson::FeatureCollection(collection))
}

fn load_config(path: Option<&str>) -> Result<SpiderfyConfig, Error> {
    match path {
        Some(path) => {
            info!("Loading spiderfy settings from {}", path);
            let file = std::fs::File::open(path)?;
            Ok(serde_json::from_reader(io::BufReader::new(file))?)
        }
        None => {
            info!(
                "Using default spiderfy settings (25 m radius at latitude {})",
                DEFAULT_LATITUDE
            );
            Ok(SpiderfyConfig::default())
        }
    }
}

fn spiderfy_command(matches: &ArgMatches) -> Result<(), Error> {
    let geo_file = matches.value_of("geo-file").unwrap_or_default();
    let config = load_config(matches.value_of("config"))?;

    info!("Loading features from {:?} ...", Path::new(geo_file));
    let features = feature_io::load_features(geo_file)?;
    let groups = feature_io::group_coincident(features);
    info!("Found {} distinct marker positions", groups.len());

    let group = match matches.value_of("at") {
        Some(at) => {
            let center = parse_coordinate(at)?;
            let key = coordinate_key(&center);
            groups
                .into_iter()
                .find(|g| coordinate_key(&g.center) == key)
                .ok_or_else(|| MainError::NoClusterAt(at.to_owned()))?
        }
        None => {
            // Largest cluster, first one on ties.
            let mut largest: Option<feature_io::CoincidentGroup> = None;
            for group in groups {
                let bigger = match &largest {
                    Some(best) => group.features.len() > best.features.len(),
                    None => true,
                };
                if bigger {
                    largest = Some(group);
                }
            }
            largest.ok_or_else(|| MainError::NoFeatures(geo_file.to_owned()))?
        }
    };

    if group.features.len() < 2 {
        warn!("Cluster at {:?} has a single feature, nothing overlaps", group.center);
    }

    let mut manager = SpiderfyManager::with_config(GeoJsonLayers::new(), config);
    manager.initialize_layers();
    let summary = manager.expand(group.center, &group.features)?;
    if summary.dropped > 0 {
        warn!("{} features left out of the layout", summary.dropped);
    }
    info!("Expanded {} features around {:?}", summary.shown, group.center);

    let mut output = open_output(matches.value_of("output"))?;
    write_geojson(
        output.as_mut(),
        &GeoJson::FeatureCollection(manager.layers().to_feature_collection()),
    )
}

fn match_command(matches: &ArgMatches) -> Result<(), Error> {
    let radius = value_t!(matches, "radius", u32)?;
    if !SEARCH_RADII.contains(&radius) {
        warn!(
            "Search radius {} m is not one of {:?}; it will not add to the score",
            radius, SEARCH_RADII
        );
    }

    let mut context = MatchContext::new(matches.value_of("address").unwrap_or_default(), radius);
    if let Some(postcode) = matches.value_of("postcode") {
        context = context.with_postcode(postcode);
    }

    // Parse the delimiter. Should be exactly one character.
    let delimiter = matches
        .value_of("delimiter")
        .unwrap_or_default()
        .replace("\\t", "\t");
    let char_delimiter: u8 = delimiter.as_bytes().first().cloned().unwrap_or(b',');
    info!("Using the following delimiter: {:?}", char_delimiter);

    let mut input_file: Box<dyn io::Read> = match matches.value_of("input") {
        Some(path) => Box::new(std::fs::File::open(path)?),
        None => {
            info!("Reading from stdin");
            Box::new(io::stdin())
        }
    };
    let mut output_file = open_output(matches.value_of("output"))?;

    let stats = feature_io::match_applications(
        &AddressMatcher::new(),
        &context,
        input_file.as_mut(),
        output_file.as_mut(),
        char_delimiter,
    )?;
    info!("Stats: {:?}", stats);

    Ok(())
}

fn do_main(matches: &ArgMatches) -> Result<(), Error> {
    match matches.subcommand() {
        ("layout", Some(sub)) => layout_command(sub),
        ("spiderfy", Some(sub)) => spiderfy_command(sub),
        ("match", Some(sub)) => match_command(sub),
        _ => {
            warn!("No command given. Use --help to list them.");
            Ok(())
        }
    }
}
