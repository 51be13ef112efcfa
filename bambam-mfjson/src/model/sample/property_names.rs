//! names of the vehicle position properties recognized by the default
//! [`super::PropertyCatalog`]. these follow GTFS-realtime `VehiclePosition` fields.

// trip and vehicle descriptors, constant over a trajectory
pub const TRIP_ID: &str = "trip_id";
pub const ROUTE_ID: &str = "route_id";
pub const DIRECTION_ID: &str = "direction_id";
pub const SCHEDULE_RELATIONSHIP: &str = "schedule_relationship";
pub const TRIP_START_DATE: &str = "trip_start_date";
pub const TRIP_START_TIME: &str = "trip_start_time";
pub const VEHICLE_ID: &str = "vehicle_id";
pub const VEHICLE_LABEL: &str = "vehicle_label";
pub const LICENSE_PLATE: &str = "license_plate";

// time-varying measures
pub const BEARING: &str = "bearing";
pub const SPEED: &str = "speed";
pub const ODOMETER: &str = "odometer";
pub const CURRENT_STATUS: &str = "current_status";
pub const STOP_ID: &str = "stop_id";
pub const CURRENT_STOP_SEQUENCE: &str = "current_stop_sequence";
pub const OCCUPANCY_STATUS: &str = "occupancy_status";
pub const OCCUPANCY_PERCENTAGE: &str = "occupancy_percentage";
pub const CONGESTION_LEVEL: &str = "congestion_level";

/// measure name for the occupancy of one carriage of a multi-carriage vehicle
pub fn carriage_measure(carriage_sequence: u32, label: &str) -> String {
    format!("carriage_{carriage_sequence}_{label}")
}
