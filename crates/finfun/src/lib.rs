pub mod api;
pub mod config;
pub mod domain;
pub mod infra;
pub mod startup;
pub mod templates;

pub use api::routes::*;
pub use config::*;
pub use domain::{
    DevicePreferences, Error as FinfunError, InMemoryPreferenceStore, ListingEntry,
    ListingSelection, ListingSnapshot, PreferenceStore, RecomputeScheduler,
    SqlitePreferenceStore,
};
pub use infra::db::*;
pub use infra::file_utils::*;
pub use infra::platform::{Error as PlatformError, Platform, PlatformClient};
pub use startup::*;
