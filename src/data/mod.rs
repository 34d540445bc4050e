pub mod persistence;
pub mod saved_range;
pub mod settings;

pub use persistence::Persistable;
pub use saved_range::SavedRange;
pub use settings::PickerSettings;
