use std::collections::{BTreeMap, BTreeSet};

use itertools::Itertools;

use super::datetime_codec::format_datetime;
use super::{
    EncodingError, Measure, MeasureType, MovingPoint, MovingPointType, TemporalProperties,
    TrajectoryDocument, TrajectoryFeature, TrajectoryProperties,
};
use crate::model::interpolation::InterpolationTable;
use crate::model::sample::{property_names as names, CanonicalSample, PropertyValue};

/// turns the drained samples of one closed buffer into an MF-JSON document.
#[derive(Clone, Debug, Default)]
pub struct TrajectoryEncoder {
    interpolation: InterpolationTable,
}

impl TrajectoryEncoder {
    pub fn new(interpolation: InterpolationTable) -> TrajectoryEncoder {
        TrajectoryEncoder { interpolation }
    }

    pub fn encode(
        &self,
        samples: &[CanonicalSample],
        trajectory_id: u64,
    ) -> Result<TrajectoryDocument, EncodingError> {
        let (first, last) = match (samples.first(), samples.last()) {
            (Some(first), Some(last)) if samples.len() >= 2 => (first, last),
            _ => {
                return Err(EncodingError::InsufficientSamples {
                    entity_id: samples
                        .first()
                        .map(|s| s.entity_id().to_string())
                        .unwrap_or_default(),
                    count: samples.len(),
                })
            }
        };
        if let Some(other) = samples.iter().find(|s| s.entity_id() != first.entity_id()) {
            return Err(EncodingError::MixedEntities {
                expected: first.entity_id().to_string(),
                found: other.entity_id().to_string(),
            });
        }

        let datetimes = samples
            .iter()
            .map(|s| format_datetime(&s.timestamp()))
            .collect_vec();
        let coordinates = samples
            .iter()
            .map(|s| [s.position().x(), s.position().y()])
            .collect_vec();

        let measures = self.encode_measures(samples, datetimes.len())?;

        let feature = TrajectoryFeature {
            feature_type: Default::default(),
            temporal_geometry: MovingPoint {
                geometry_type: MovingPointType::MovingPoint,
                coordinates,
                datetimes: datetimes.clone(),
                interpolation: self.interpolation.geometry(),
            },
            properties: static_properties(last, trajectory_id),
            temporal_properties: vec![TemporalProperties {
                datetimes,
                measures,
            }],
        };
        Ok(TrajectoryDocument::new(feature))
    }

    /// one measure per name seen in any sample. omitted values are carried
    /// forward from the previous sample, leading gaps take the first
    /// observed value.
    fn encode_measures(
        &self,
        samples: &[CanonicalSample],
        expected_len: usize,
    ) -> Result<BTreeMap<String, Measure>, EncodingError> {
        let measure_names: BTreeSet<&String> =
            samples.iter().flat_map(|s| s.measures().keys()).collect();

        let mut measures = BTreeMap::new();
        for name in measure_names {
            let Some(mut carry) = samples.iter().find_map(|s| s.measure(name)) else {
                continue;
            };
            let mut values: Vec<PropertyValue> = Vec::with_capacity(samples.len());
            for sample in samples.iter() {
                if let Some(value) = sample.measure(name) {
                    carry = value;
                }
                values.push(carry.clone());
            }
            if values.len() != expected_len {
                return Err(EncodingError::LengthMismatch {
                    entity_id: samples[0].entity_id().to_string(),
                    measure: name.clone(),
                    values: values.len(),
                    datetimes: expected_len,
                });
            }
            let measure = Measure {
                measure_type: MeasureType::Measure,
                values,
                interpolation: self.interpolation.classify(name),
            };
            measures.insert(name.clone(), measure);
        }
        Ok(measures)
    }
}

fn static_properties(last: &CanonicalSample, trajectory_id: u64) -> TrajectoryProperties {
    let get = |name: &str| last.attribute(name).cloned();
    TrajectoryProperties {
        trajectory_id,
        entity_id: last.entity_id().to_string(),
        direction_id: get(names::DIRECTION_ID),
        label: get(names::VEHICLE_LABEL),
        trip_id: get(names::TRIP_ID),
        route_id: get(names::ROUTE_ID),
        schedule_relationship: get(names::SCHEDULE_RELATIONSHIP),
        trip_start_date: get(names::TRIP_START_DATE),
        trip_start_time: get(names::TRIP_START_TIME),
        vehicle_id: get(names::VEHICLE_ID),
        vehicle_label: get(names::VEHICLE_LABEL),
        license_plate: get(names::LICENSE_PLATE),
    }
}

#[cfg(test)]
mod test {
    use super::TrajectoryEncoder;
    use crate::model::encoding::EncodingError;
    use crate::model::interpolation::Interpolation;
    use crate::model::sample::{PropertyValue, SampleNormalizer};
    use crate::model::test_util::{report, sample};

    fn y1858() -> Vec<crate::model::sample::CanonicalSample> {
        let normalizer = SampleNormalizer::default();
        vec![
            report("y1858", "04:44:50", "68165650")
                .with_property("bearing", 45.0)
                .with_property("current_status", 2)
                .with_property("vehicle_label", "1712"),
            report("y1858", "04:45:07", "68165650").with_property("vehicle_label", "1712"),
            report("y1858", "04:45:55", "68165650")
                .with_property("bearing", 54.0)
                .with_property("vehicle_label", "1712"),
        ]
        .into_iter()
        .map(|r| normalizer.normalize(r).unwrap().sample)
        .collect()
    }

    #[test]
    fn test_encode_scenario() {
        let doc = TrajectoryEncoder::default().encode(&y1858(), 0).unwrap();
        let feature = doc.feature().unwrap();
        let geometry = &feature.temporal_geometry;
        assert_eq!(geometry.coordinates.len(), 3);
        assert_eq!(
            geometry.datetimes,
            vec![
                "2024-05-01T04:44:50",
                "2024-05-01T04:45:07",
                "2024-05-01T04:45:55"
            ]
        );
        assert_eq!(geometry.interpolation, Interpolation::Linear);

        let temporal = &feature.temporal_properties[0];
        let bearing = &temporal.measures["bearing"];
        assert_eq!(
            bearing.values,
            vec![
                PropertyValue::Number(45.0),
                PropertyValue::Number(45.0),
                PropertyValue::Number(54.0)
            ]
        );
        assert_eq!(bearing.interpolation, Interpolation::Linear);
        let status = &temporal.measures["current_status"];
        assert_eq!(status.interpolation, Interpolation::Discrete);
        assert_eq!(status.values, vec![PropertyValue::Integer(2); 3]);

        assert_eq!(feature.properties.trajectory_id, 0);
        assert_eq!(feature.properties.entity_id, "y1858");
        assert_eq!(feature.properties.label, Some(PropertyValue::from("1712")));
        assert_eq!(feature.properties.trip_id, Some(PropertyValue::from("68165650")));
        assert_eq!(feature.properties.license_plate, None);
    }

    #[test]
    fn test_leading_gap_is_back_filled() {
        let normalizer = SampleNormalizer::default();
        let samples: Vec<_> = vec![
            report("y1858", "04:44:50", "t"),
            report("y1858", "04:45:07", "t").with_property("speed", 7.5),
            report("y1858", "04:45:55", "t"),
        ]
        .into_iter()
        .map(|r| normalizer.normalize(r).unwrap().sample)
        .collect();
        let doc = TrajectoryEncoder::default().encode(&samples, 4).unwrap();
        let temporal = &doc.feature().unwrap().temporal_properties[0];
        assert_eq!(temporal.measures["speed"].values, vec![PropertyValue::Number(7.5); 3]);
        for measure in temporal.measures.values() {
            assert_eq!(measure.values.len(), temporal.datetimes.len());
        }
        assert_eq!(doc.trajectory_id(), Some(4));
    }

    #[test]
    fn test_insufficient_samples() {
        let one = vec![sample("y1858", "04:44:50", "t")];
        let result = TrajectoryEncoder::default().encode(&one, 0);
        assert!(matches!(
            result,
            Err(EncodingError::InsufficientSamples { count: 1, .. })
        ));
        let none = TrajectoryEncoder::default().encode(&[], 0);
        assert!(matches!(
            none,
            Err(EncodingError::InsufficientSamples { count: 0, .. })
        ));
    }

    #[test]
    fn test_mixed_entities() {
        let samples = vec![
            sample("y1858", "04:44:50", "t"),
            sample("y1857", "04:45:07", "t"),
        ];
        let result = TrajectoryEncoder::default().encode(&samples, 0);
        assert!(matches!(result, Err(EncodingError::MixedEntities { .. })));
    }

    #[test]
    fn test_json_shape() {
        let doc = TrajectoryEncoder::default().encode(&y1858(), 2).unwrap();
        let json: serde_json::Value = serde_json::from_str(&doc.to_json().unwrap()).unwrap();
        assert_eq!(json["type"], "FeatureCollection");
        let feature = &json["features"][0];
        assert_eq!(feature["type"], "Feature");
        assert_eq!(feature["temporalGeometry"]["type"], "MovingPoint");
        assert_eq!(feature["temporalGeometry"]["interpolation"], "Linear");
        assert_eq!(feature["properties"]["trajectory_id"], 2);
        assert!(feature["properties"]["license_plate"].is_null());
        let temporal = &feature["temporalProperties"][0];
        assert_eq!(temporal["bearing"]["type"], "Measure");
        assert_eq!(temporal["bearing"]["values"][2], 54.0);
        assert_eq!(temporal["current_status"]["interpolation"], "Discrete");

        let pretty = doc.to_json_pretty().unwrap();
        let decoded: crate::model::encoding::TrajectoryDocument =
            serde_json::from_str(&pretty).unwrap();
        assert_eq!(decoded, doc);
    }
}
