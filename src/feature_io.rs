use std::collections::HashMap;
use std::fs;
use std::io;
use std::path;
use std::time;

use failure::Fail;
use geojson::Error as GeoJsonError;
use geojson::GeoJson;
use geo_types::Coordinate;
use log::{info, warn};
use serde::Serialize;

use super::cli_utils;
use super::planning_match::{
    group_by_confidence, portal_url, AddressMatcher, Confidence, MatchContext, MatchResult,
    PlanningApplication,
};
use super::spiderfy::{coordinate_key, MapFeature, SpiderfyError};

#[derive(Debug, Fail)]
pub enum FeatureIoError {
    #[fail(display = "GeoJSON error: {}", _0)]
    Parse(GeoJsonError),
    #[fail(display = "Feature collection not found")]
    FeatureCollectionNotFound,
    #[fail(display = "Feature {}: {}", _0, _1)]
    InvalidFeature(usize, SpiderfyError),
    #[fail(display = "I/O error: {}", _0)]
    Io(io::Error),
    #[fail(display = "Csv error: {}", _0)]
    Csv(csv::Error),
}

impl From<GeoJsonError> for FeatureIoError {
    fn from(err: GeoJsonError) -> FeatureIoError {
        info!("Error parsing geo-json: {}", err);
        FeatureIoError::Parse(err)
    }
}

impl From<io::Error> for FeatureIoError {
    fn from(err: io::Error) -> FeatureIoError {
        FeatureIoError::Io(err)
    }
}

impl From<csv::Error> for FeatureIoError {
    fn from(err: csv::Error) -> FeatureIoError {
        FeatureIoError::Csv(err)
    }
}

pub fn load_features<P: AsRef<path::Path>>(geojson_path: P) -> Result<Vec<MapFeature>, FeatureIoError> {
    let file_contents = fs::read_to_string(&geojson_path)?;
    load_features_from_string(&file_contents)
}

pub fn load_features_from_string(geo_json_str: &str) -> Result<Vec<MapFeature>, FeatureIoError> {
    let geo_json = geo_json_str.parse::<GeoJson>()?;

    let feature_collection = if let GeoJson::FeatureCollection(ctn) = geo_json {
        ctn
    } else {
        return Err(FeatureIoError::FeatureCollectionNotFound);
    };

    let features = feature_collection
        .features
        .into_iter()
        .enumerate()
        .map(|(i, f)| MapFeature::from_geojson(f).map_err(|e| FeatureIoError::InvalidFeature(i, e)))
        .collect::<Result<Vec<_>, _>>()?;

    info!("Loaded {} point features", features.len());
    Ok(features)
}

/// Features sharing one six-decimal coordinate key.
#[derive(Debug, Clone, PartialEq)]
pub struct CoincidentGroup {
    pub center: Coordinate<f64>,
    pub features: Vec<MapFeature>,
}

/// Groups features that render on the same spot, in first-seen order.
///
/// The center of a group is the coordinate of its first feature.
pub fn group_coincident(features: Vec<MapFeature>) -> Vec<CoincidentGroup> {
    let mut groups: Vec<CoincidentGroup> = Vec::new();
    let mut index: HashMap<String, usize> = HashMap::new();

    for feature in features {
        let key = coordinate_key(&feature.coordinates);
        match index.get(&key) {
            Some(&i) => groups[i].features.push(feature),
            None => {
                index.insert(key, groups.len());
                groups.push(CoincidentGroup {
                    center: feature.coordinates,
                    features: vec![feature],
                });
            }
        }
    }

    groups
}

#[derive(Debug, Default, PartialEq)]
pub struct ProcessStats {
    pub total_lines: u32,
    pub error_lines: u32,
    pub high: usize,
    pub medium: usize,
    pub low: usize,
}

#[derive(Debug, Serialize)]
struct MatchRow<'a> {
    application_number: &'a str,
    authority: &'a str,
    address: &'a str,
    score: u32,
    confidence: Confidence,
    reasons: String,
    portal_url: String,
}

impl<'a> MatchRow<'a> {
    fn new(result: &MatchResult<'a>) -> MatchRow<'a> {
        let application = result.application;
        MatchRow {
            application_number: &application.application_number,
            authority: &application.authority,
            address: &application.address,
            score: result.score,
            confidence: result.confidence,
            reasons: result.match_reasons.join("; "),
            portal_url: portal_url(&application.authority, &application.application_number),
        }
    }
}

/// Reads planning applications from CSV, scores them and writes them best first.
pub fn match_applications(
    matcher: &AddressMatcher,
    context: &MatchContext,
    input_file: &mut dyn io::Read,
    output_file: &mut dyn io::Write,
    delimiter: u8,
) -> Result<ProcessStats, FeatureIoError> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .delimiter(delimiter)
        .has_headers(true)
        .flexible(true)
        .from_reader(input_file);

    let mut csv_writer = csv::WriterBuilder::new()
        .delimiter(delimiter)
        .from_writer(output_file);

    let start_instant = time::Instant::now();
    let mut stats = ProcessStats::default();
    let mut applications: Vec<PlanningApplication> = Vec::new();

    for (line_number, record_result) in csv_reader.deserialize::<PlanningApplication>().enumerate() {
        stats.total_lines += 1;
        match record_result {
            Ok(application) => applications.push(application),
            Err(e) => {
                warn!("Unable to read line {}: {}", line_number + 2, e);
                stats.error_lines += 1;
            }
        }
    }

    let progress_bar =
        cli_utils::create_progress_bar_count(false, "Scoring...", Some(applications.len() as u64));

    let results = matcher.score_all(&applications, context);
    for result in &results {
        csv_writer.serialize(MatchRow::new(result))?;
        progress_bar.inc(1);
    }
    csv_writer.flush()?;
    progress_bar.finish();

    let groups = group_by_confidence(results);
    stats.high = groups.high.len();
    stats.medium = groups.medium.len();
    stats.low = groups.low.len();

    let elapsed_secs = start_instant.elapsed().as_millis() as f32 / 1000.0f32;
    info!(
        "Scored {} applications in {} seconds ({} high, {} medium, {} low)",
        groups.len(),
        elapsed_secs,
        stats.high,
        stats.medium,
        stats.low
    );

    Ok(stats)
}
