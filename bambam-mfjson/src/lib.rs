//! assembles real-time vehicle position reports into moving-feature trajectories,
//! written as MF-JSON `FeatureCollection` documents. see
//! [https://docs.ogc.org/is/19-045r3/19-045r3.html] for the MF-JSON encoding.
pub mod aggregate;
pub mod app;
pub mod config;
pub mod model;
