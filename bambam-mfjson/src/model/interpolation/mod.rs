mod interpolation_mode;
mod interpolation_table;

pub use interpolation_mode::Interpolation;
pub use interpolation_table::InterpolationTable;
