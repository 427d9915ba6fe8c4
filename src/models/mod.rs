pub mod lift;
pub mod preferences;
pub mod sync;

pub use lift::{is_big_four, LiftRecord, UnitType, BIG_FOUR, LB_PER_KG};
pub use preferences::{Preferences, PreferencesUpdate};
pub use sync::SyncState;
