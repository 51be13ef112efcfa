use std::collections::BTreeMap;

use geo::Point;

use super::property_names::carriage_measure;
use super::{
    CanonicalSample, NormalizeError, PropertyCatalog, PropertyRole, PropertyValue, ValueKind,
};
use crate::model::report::{RawCarriage, RawPositionReport};

/// a normalized sample along with the properties that were dropped from it.
#[derive(Debug)]
pub struct NormalizedReport {
    pub sample: CanonicalSample,
    pub property_errors: Vec<NormalizeError>,
}

/// validates raw position reports and converts them into [`CanonicalSample`]s.
#[derive(Clone, Debug, Default)]
pub struct SampleNormalizer {
    catalog: PropertyCatalog,
}

impl SampleNormalizer {
    pub fn new(catalog: PropertyCatalog) -> SampleNormalizer {
        SampleNormalizer { catalog }
    }

    /// converts one report. a missing entity id, timestamp or position is a
    /// [`NormalizeError::MalformedReport`]. a property that cannot be coerced
    /// is left out of the sample and reported in
    /// [`NormalizedReport::property_errors`].
    pub fn normalize(&self, report: RawPositionReport) -> Result<NormalizedReport, NormalizeError> {
        let RawPositionReport {
            entity_id,
            timestamp,
            longitude,
            latitude,
            properties,
            carriages,
        } = report;

        let entity_id = entity_id
            .map(|id| id.trim().to_string())
            .filter(|id| !id.is_empty())
            .ok_or_else(|| NormalizeError::malformed(None, "missing entity id"))?;
        let id = Some(entity_id.as_str());

        let timestamp = timestamp
            .ok_or_else(|| NormalizeError::malformed(id, "missing timestamp"))?
            .to_utc()
            .map_err(|e| NormalizeError::malformed(id, e))?;

        let position = match (longitude, latitude) {
            (Some(lon), Some(lat)) => validate_position(lon, lat).map_err(|e| NormalizeError::malformed(id, e))?,
            _ => return Err(NormalizeError::malformed(id, "missing position")),
        };

        let mut attributes = BTreeMap::new();
        let mut measures = BTreeMap::new();
        let mut property_errors = vec![];
        for (name, value) in properties.iter() {
            let spec = self.catalog.get(name);
            let kind = match spec.map(|s| s.kind).or_else(|| ValueKind::infer(value)) {
                Some(kind) => kind,
                None if value.is_null() => continue,
                None => {
                    property_errors.push(NormalizeError::PropertyTypeError {
                        name: name.clone(),
                        expected: ValueKind::Text,
                        found: value.to_string(),
                    });
                    continue;
                }
            };
            let role = spec.map(|s| s.role).unwrap_or(PropertyRole::Measure);
            match kind.coerce(name, value) {
                Ok(Some(v)) if role == PropertyRole::Static => {
                    attributes.insert(name.clone(), v);
                }
                Ok(Some(v)) => {
                    measures.insert(name.clone(), v);
                }
                Ok(None) => {}
                Err(e) => property_errors.push(e),
            }
        }

        for carriage in carriages.iter() {
            match normalize_carriage(carriage) {
                Ok(Some((name, value))) => {
                    measures.insert(name, value);
                }
                Ok(None) => {}
                Err(e) => property_errors.push(e),
            }
        }

        let sample = CanonicalSample::new(entity_id, timestamp, position, attributes, measures);
        Ok(NormalizedReport {
            sample,
            property_errors,
        })
    }
}

fn validate_position(lon: f64, lat: f64) -> Result<Point<f64>, String> {
    if !lon.is_finite() || !lat.is_finite() {
        return Err(format!("position ({lon}, {lat}) is not finite"));
    }
    if !(-180.0..=180.0).contains(&lon) {
        return Err(format!("longitude {lon} outside of [-180, 180]"));
    }
    if !(-90.0..=90.0).contains(&lat) {
        return Err(format!("latitude {lat} outside of [-90, 90]"));
    }
    Ok(Point::new(lon, lat))
}

/// carriages without a label or sequence cannot be tracked across reports
/// and are skipped.
fn normalize_carriage(
    carriage: &RawCarriage,
) -> Result<Option<(String, PropertyValue)>, NormalizeError> {
    let (Some(label), Some(sequence)) = (&carriage.label, carriage.carriage_sequence) else {
        return Ok(None);
    };
    let name = carriage_measure(sequence, label);
    let Some(status) = &carriage.occupancy_status else {
        return Ok(None);
    };
    let value = ValueKind::IntegerEnum.coerce(&name, status)?;
    Ok(value.map(|v| (name, v)))
}

#[cfg(test)]
mod test {
    use super::SampleNormalizer;
    use crate::model::report::{RawCarriage, RawPositionReport, RawTimestamp};
    use crate::model::sample::{NormalizeError, PropertyValue};
    use serde_json::json;

    fn report() -> RawPositionReport {
        RawPositionReport::new("y1858", RawTimestamp::from("2024-05-01T04:44:50Z"), -71.06, 42.35)
    }

    #[test]
    fn test_splits_attributes_and_measures() {
        let raw = report()
            .with_property("trip_id", "68165650")
            .with_property("route_id", "1")
            .with_property("bearing", 45)
            .with_property("current_status", 2)
            .with_property("stop_id", "64");
        let result = SampleNormalizer::default().normalize(raw).unwrap();
        let sample = result.sample;
        assert!(result.property_errors.is_empty());
        assert_eq!(sample.entity_id(), "y1858");
        assert_eq!(sample.attribute("trip_id"), Some(&PropertyValue::from("68165650")));
        assert_eq!(sample.measure("bearing"), Some(&PropertyValue::Number(45.0)));
        assert_eq!(sample.measure("current_status"), Some(&PropertyValue::Integer(2)));
        assert_eq!(sample.measure("stop_id"), Some(&PropertyValue::from("64")));
        assert!(sample.measure("trip_id").is_none());
        assert_eq!(sample.position().x(), -71.06);
        assert_eq!(sample.position().y(), 42.35);
    }

    #[test]
    fn test_missing_required_fields_are_malformed() {
        let normalizer = SampleNormalizer::default();
        let mut no_id = report();
        no_id.entity_id = Some(String::from("  "));
        let mut no_time = report();
        no_time.timestamp = None;
        let mut no_position = report();
        no_position.latitude = None;
        for raw in [no_id, no_time, no_position] {
            let result = normalizer.normalize(raw);
            assert!(matches!(result, Err(NormalizeError::MalformedReport { .. })));
        }
    }

    #[test]
    fn test_out_of_range_position_is_malformed() {
        let normalizer = SampleNormalizer::default();
        let bad_lon = RawPositionReport::new("a", RawTimestamp::Epoch(0), 181.0, 0.0);
        let bad_lat = RawPositionReport::new("a", RawTimestamp::Epoch(0), 0.0, -90.5);
        let nan = RawPositionReport::new("a", RawTimestamp::Epoch(0), f64::NAN, 0.0);
        for raw in [bad_lon, bad_lat, nan] {
            assert!(normalizer.normalize(raw).is_err());
        }
    }

    #[test]
    fn test_unparsable_timestamp_is_malformed() {
        let mut raw = report();
        raw.timestamp = Some(RawTimestamp::from("not a time"));
        let err = SampleNormalizer::default().normalize(raw).unwrap_err();
        match err {
            NormalizeError::MalformedReport { entity_id, .. } => assert_eq!(entity_id, "y1858"),
            other => panic!("unexpected error {other}"),
        }
    }

    #[test]
    fn test_property_type_error_drops_only_that_property() {
        let raw = report()
            .with_property("bearing", "north-east")
            .with_property("speed", 7.5);
        let result = SampleNormalizer::default().normalize(raw).unwrap();
        assert_eq!(result.property_errors.len(), 1);
        assert!(result.sample.measure("bearing").is_none());
        assert_eq!(result.sample.measure("speed"), Some(&PropertyValue::Number(7.5)));
    }

    #[test]
    fn test_unknown_properties_are_inferred_measures() {
        let raw = report()
            .with_property("passenger_load", 12)
            .with_property("doors", json!({"front": "open"}))
            .with_property("revenue", json!(null));
        let result = SampleNormalizer::default().normalize(raw).unwrap();
        assert_eq!(
            result.sample.measure("passenger_load"),
            Some(&PropertyValue::Integer(12))
        );
        assert!(result.sample.property("doors").is_none());
        assert!(result.sample.property("revenue").is_none());
        assert_eq!(result.property_errors.len(), 1);
    }

    #[test]
    fn test_carriages_become_measures() {
        let raw = report()
            .with_carriage(RawCarriage {
                label: Some(String::from("1712")),
                carriage_sequence: Some(1),
                occupancy_status: Some(json!(1)),
            })
            .with_carriage(RawCarriage {
                label: None,
                carriage_sequence: Some(2),
                occupancy_status: Some(json!(3)),
            });
        let result = SampleNormalizer::default().normalize(raw).unwrap();
        assert_eq!(
            result.sample.measure("carriage_1_1712"),
            Some(&PropertyValue::Integer(1))
        );
        assert_eq!(result.sample.measures().len(), 1);
    }
}
