mod encoding_error;
mod trajectory_document;
mod trajectory_encoder;

pub mod datetime_codec;

pub use encoding_error::EncodingError;
pub use trajectory_document::{
    FeatureCollectionType, FeatureType, Measure, MeasureType, MovingPoint, MovingPointType,
    TemporalProperties, TrajectoryDocument, TrajectoryFeature, TrajectoryProperties,
};
pub use trajectory_encoder::TrajectoryEncoder;
