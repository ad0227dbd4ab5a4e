pub mod cache;
pub mod catalog;
pub mod policy;
pub mod scan;
pub mod service;
pub mod settings;
pub mod usage;

pub use cache::CatalogCache;
pub use catalog::{Catalog, CatalogHandle};
pub use policy::PolicyEvaluator;
pub use service::{IndexService, RefreshReason};
pub use settings::{
    IndexMode, IndexSchedule, IntervalUnit, SearchSettingsRecord, load_settings, save_settings,
};
pub use usage::UsageCounters;
