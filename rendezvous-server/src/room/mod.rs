mod lifecycle_notifier;
mod membership_table;

pub use lifecycle_notifier::*;
pub use membership_table::*;
