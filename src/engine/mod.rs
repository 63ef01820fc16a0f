pub mod coordinator;
pub mod geofence;
pub mod notifier;
pub mod policy;
pub mod store;
