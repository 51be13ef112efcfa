pub mod buffer;
pub mod coordinator;
pub mod encoding;
pub mod interpolation;
pub mod report;
pub mod sample;
pub mod segmentation;
pub mod sink;

#[cfg(test)]
pub(crate) mod test_util;
