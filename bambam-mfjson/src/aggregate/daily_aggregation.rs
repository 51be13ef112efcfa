use std::path::{Path, PathBuf};

use chrono::NaiveDate;
use itertools::Itertools;
use kdam::tqdm;
use serde_json::{json, Value};

use super::{AggregateError, AggregateOptions, AggregationSummary, DayOutcome};
use crate::model::sink::{RoutePartition, RAW_STAGE};

/// stage directory holding one combined file per route day
pub const AGGREGATED_STAGE: &str = "aggregated";
pub const AGGREGATED_FILENAME: &str = "aggregated.mfjson";

/// aggregates every route day under `{data_directory}/raw` that matches the
/// options. a failing route day is logged and counted, the rest still run.
pub fn aggregate_all(
    data_directory: &Path,
    options: &AggregateOptions,
) -> Result<AggregationSummary, AggregateError> {
    let partitions = find_route_days(data_directory, options)?;
    log::info!(
        "found {} route days to aggregate in {}",
        partitions.len(),
        data_directory.display()
    );
    let mut summary = AggregationSummary::default();
    let total = partitions.len();
    for partition in tqdm!(partitions.iter(), total = total, desc = "aggregate route days") {
        match aggregate_day(data_directory, partition, options) {
            Ok(DayOutcome::Written { path, features }) => {
                log::debug!("wrote {features} trajectories to {}", path.display());
                summary.written += 1;
            }
            Ok(DayOutcome::Skipped(reason)) => {
                log::info!(
                    "skipping route '{}' on {}: {reason}",
                    partition.route_id,
                    partition.date
                );
                summary.skipped += 1;
            }
            Err(e) => {
                log::error!(
                    "failed aggregating route '{}' on {}: {e}",
                    partition.route_id,
                    partition.date
                );
                summary.failed += 1;
            }
        }
    }
    eprintln!();
    Ok(summary)
}

/// lists the `{route}/Year=/Month=/Day=` partitions below the raw stage,
/// sorted by route then date. hidden entries and directories whose names
/// do not parse as a partition are ignored.
pub fn find_route_days(
    data_directory: &Path,
    options: &AggregateOptions,
) -> Result<Vec<RoutePartition>, AggregateError> {
    let raw = data_directory.join(RAW_STAGE);
    if !raw.is_dir() {
        return Err(AggregateError::MissingRawDirectory(data_directory.to_path_buf()));
    }
    // route directories hold sanitized ids
    let route_filter = options
        .route_id
        .as_deref()
        .map(|r| RoutePartition::new(Some(r), NaiveDate::MIN).route_id);
    let mut result = vec![];
    for route in subdirectories(&raw)? {
        if route_filter.as_ref().is_some_and(|r| *r != route) {
            continue;
        }
        let route_dir = raw.join(&route);
        for year in subdirectories(&route_dir)? {
            let year_dir = route_dir.join(&year);
            for month in subdirectories(&year_dir)? {
                let month_dir = year_dir.join(&month);
                for day in subdirectories(&month_dir)? {
                    let Some(partition) = RoutePartition::from_components(&route, &year, &month, &day)
                    else {
                        log::debug!("ignoring directory {}", month_dir.join(&day).display());
                        continue;
                    };
                    if options.date.is_some_and(|d| d != partition.date) {
                        continue;
                    }
                    result.push(partition);
                }
            }
        }
    }
    result.sort();
    Ok(result)
}

/// combines the raw files of one route day. files that cannot be read or are
/// not FeatureCollections are logged and left out. trajectory ids are
/// renumbered from 0 in file name order.
pub fn aggregate_day(
    data_directory: &Path,
    partition: &RoutePartition,
    options: &AggregateOptions,
) -> Result<DayOutcome, AggregateError> {
    let output_directory = partition.directory(data_directory, AGGREGATED_STAGE);
    let output_path = output_directory.join(AGGREGATED_FILENAME);
    if output_path.exists() && !options.overwrite {
        return Ok(DayOutcome::Skipped(format!(
            "{} already exists",
            output_path.display()
        )));
    }

    let raw_directory = partition.directory(data_directory, RAW_STAGE);
    let files = trajectory_files(&raw_directory)?;
    let mut used_files = vec![];
    let mut features: Vec<Value> = vec![];
    for file in files.iter() {
        match read_features(file) {
            Ok(mut file_features) => {
                features.append(&mut file_features);
                used_files.push(file);
            }
            Err(msg) => log::warn!("skipping {}: {msg}", file.display()),
        }
    }
    if features.is_empty() {
        return Ok(DayOutcome::Skipped(String::from("no readable trajectories")));
    }

    for (trajectory_id, feature) in features.iter_mut().enumerate() {
        if let Some(properties) = feature
            .get_mut("properties")
            .and_then(|p| p.as_object_mut())
        {
            properties.insert(String::from("trajectory_id"), json!(trajectory_id));
        }
    }
    let count = features.len();
    let collection = json!({ "type": "FeatureCollection", "features": features });
    let contents =
        serde_json::to_string_pretty(&collection).map_err(|source| AggregateError::SerializationError {
            path: output_path.clone(),
            source,
        })?;
    std::fs::create_dir_all(&output_directory).map_err(|source| AggregateError::IoError {
        path: output_directory.clone(),
        source,
    })?;
    std::fs::write(&output_path, contents).map_err(|source| AggregateError::IoError {
        path: output_path.clone(),
        source,
    })?;

    if options.delete_raw_files {
        for file in used_files {
            std::fs::remove_file(file).map_err(|source| AggregateError::IoError {
                path: file.clone(),
                source,
            })?;
        }
    }
    Ok(DayOutcome::Written {
        path: output_path,
        features: count,
    })
}

fn read_dir_entries(directory: &Path) -> Result<Vec<PathBuf>, AggregateError> {
    let entries = std::fs::read_dir(directory).map_err(|source| AggregateError::IoError {
        path: directory.to_path_buf(),
        source,
    })?;
    entries
        .map(|entry| {
            entry.map(|e| e.path()).map_err(|source| AggregateError::IoError {
                path: directory.to_path_buf(),
                source,
            })
        })
        .collect()
}

fn is_hidden(path: &Path) -> bool {
    path.file_name()
        .and_then(|n| n.to_str())
        .map(|n| n.starts_with('.'))
        .unwrap_or(true)
}

fn subdirectories(directory: &Path) -> Result<Vec<String>, AggregateError> {
    let names = read_dir_entries(directory)?
        .into_iter()
        .filter(|p| p.is_dir() && !is_hidden(p))
        .filter_map(|p| p.file_name().and_then(|n| n.to_str()).map(String::from))
        .sorted()
        .collect_vec();
    Ok(names)
}

fn trajectory_files(directory: &Path) -> Result<Vec<PathBuf>, AggregateError> {
    let files = read_dir_entries(directory)?
        .into_iter()
        .filter(|p| p.is_file() && !is_hidden(p))
        .filter(|p| p.extension().is_some_and(|e| e == "mfjson"))
        .sorted()
        .collect_vec();
    Ok(files)
}

fn read_features(file: &Path) -> Result<Vec<Value>, String> {
    let contents = std::fs::read_to_string(file).map_err(|e| format!("{e}"))?;
    let value: Value = serde_json::from_str(&contents).map_err(|e| format!("{e}"))?;
    if value.get("type").and_then(Value::as_str) != Some("FeatureCollection") {
        return Err(String::from("not a FeatureCollection"));
    }
    match value.get("features") {
        Some(Value::Array(features)) => Ok(features.clone()),
        _ => Err(String::from("FeatureCollection has no features array")),
    }
}

#[cfg(test)]
mod test {
    use super::{aggregate_all, aggregate_day, find_route_days, AGGREGATED_FILENAME};
    use crate::aggregate::{AggregateOptions, DayOutcome};
    use crate::model::encoding::TrajectoryEncoder;
    use crate::model::sample::PropertyValue;
    use crate::model::sink::{DirectorySink, RoutePartition, TrajectorySink};
    use crate::model::test_util::sample;
    use chrono::NaiveDate;
    use std::path::{Path, PathBuf};

    fn setup(name: &str) -> PathBuf {
        let root = std::env::temp_dir().join(format!(
            "bambam-mfjson-aggregate-{}-{name}",
            std::process::id()
        ));
        let _ = std::fs::remove_dir_all(&root);
        let mut sink = DirectorySink::new(&root);
        let encoder = TrajectoryEncoder::default();
        for (entity, tid) in [("y1857", 0), ("y1858", 0), ("y1858", 1)] {
            let (a, b) = if tid == 0 {
                ("04:44:50", "04:45:07")
            } else {
                ("05:00:00", "05:00:30")
            };
            let samples = vec![sample(entity, a, "t"), sample(entity, b, "t")];
            sink.emit(encoder.encode(&samples, tid).unwrap()).unwrap();
        }
        let day = root.join("raw/1/Year=2024/Month=05/Day=01");
        std::fs::write(day.join("broken.mfjson"), "{ not json").unwrap();
        std::fs::create_dir_all(root.join("raw/1/Year=2024/Month=05/.tmp")).unwrap();
        root
    }

    fn aggregated(root: &Path) -> PathBuf {
        root.join("aggregated/1/Year=2024/Month=05/Day=01")
            .join(AGGREGATED_FILENAME)
    }

    #[test]
    fn test_find_route_days() {
        let root = setup("find");
        let days = find_route_days(&root, &AggregateOptions::default()).unwrap();
        let date = NaiveDate::from_ymd_opt(2024, 5, 1).unwrap();
        assert_eq!(days, vec![RoutePartition::new(Some("1"), date)]);
        let other_route = AggregateOptions {
            route_id: Some(String::from("2")),
            ..Default::default()
        };
        assert!(find_route_days(&root, &other_route).unwrap().is_empty());
        let other_date = AggregateOptions {
            date: NaiveDate::from_ymd_opt(2024, 5, 2),
            ..Default::default()
        };
        assert!(find_route_days(&root, &other_date).unwrap().is_empty());
        std::fs::remove_dir_all(&root).unwrap();
    }

    #[test]
    fn test_route_filter_matches_sanitized_directory() {
        let root = setup("sanitized");
        let samples = vec![
            sample("g1", "06:00:00", "t"),
            sample("g1", "06:00:30", "t"),
        ];
        let mut doc = TrajectoryEncoder::default().encode(&samples, 0).unwrap();
        doc.features[0].properties.route_id = Some(PropertyValue::from("Green B"));
        DirectorySink::new(&root).emit(doc).unwrap();
        assert!(root.join("raw/Green_B/Year=2024/Month=05/Day=01").is_dir());

        let options = AggregateOptions {
            route_id: Some(String::from("Green B")),
            ..Default::default()
        };
        let days = find_route_days(&root, &options).unwrap();
        assert_eq!(days.len(), 1);
        assert_eq!(days[0].route_id, "Green_B");
        std::fs::remove_dir_all(&root).unwrap();
    }

    #[test]
    fn test_aggregate_renumbers_trajectories() {
        let root = setup("renumber");
        let summary = aggregate_all(&root, &AggregateOptions::default()).unwrap();
        assert_eq!(summary.written, 1);
        assert_eq!(summary.failed, 0);

        let contents = std::fs::read_to_string(aggregated(&root)).unwrap();
        let value: serde_json::Value = serde_json::from_str(&contents).unwrap();
        assert_eq!(value["type"], "FeatureCollection");
        let features = value["features"].as_array().unwrap();
        assert_eq!(features.len(), 3);
        let ids: Vec<u64> = features
            .iter()
            .filter_map(|f| f["properties"]["trajectory_id"].as_u64())
            .collect();
        assert_eq!(ids, vec![0, 1, 2]);
        assert_eq!(features[0]["properties"]["entity_id"], "y1857");

        // existing output is kept
        let again = aggregate_all(&root, &AggregateOptions::default()).unwrap();
        assert_eq!(again.skipped, 1);
        std::fs::remove_dir_all(&root).unwrap();
    }

    #[test]
    fn test_delete_raw_files() {
        let root = setup("delete");
        let options = AggregateOptions {
            delete_raw_files: true,
            overwrite: true,
            ..Default::default()
        };
        let partition = RoutePartition::new(Some("1"), NaiveDate::from_ymd_opt(2024, 5, 1).unwrap());
        let outcome = aggregate_day(&root, &partition, &options).unwrap();
        assert!(matches!(outcome, DayOutcome::Written { features: 3, .. }));
        let remaining: Vec<String> = std::fs::read_dir(root.join("raw/1/Year=2024/Month=05/Day=01"))
            .unwrap()
            .filter_map(|e| e.ok())
            .filter_map(|e| e.file_name().to_str().map(String::from))
            .collect();
        // the unreadable file is left for inspection
        assert_eq!(remaining, vec![String::from("broken.mfjson")]);
        assert!(aggregated(&root).exists());
        std::fs::remove_dir_all(&root).unwrap();
    }

    #[test]
    fn test_missing_raw_directory() {
        let root = std::env::temp_dir().join("bambam-mfjson-aggregate-missing");
        assert!(find_route_days(&root, &AggregateOptions::default()).is_err());
    }
}
