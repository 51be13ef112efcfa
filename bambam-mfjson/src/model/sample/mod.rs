mod canonical_sample;
mod normalize_error;
mod property_catalog;
mod property_value;
mod sample_normalizer;
mod value_kind;

pub mod property_names;

pub use canonical_sample::CanonicalSample;
pub use normalize_error::NormalizeError;
pub use property_catalog::{PropertyCatalog, PropertyRole, PropertySpec};
pub use property_value::PropertyValue;
pub use sample_normalizer::{NormalizedReport, SampleNormalizer};
pub use value_kind::ValueKind;
