mod apply;
mod change_set;
mod diff;

pub use apply::{apply_change_set, record_lifetime};
pub use change_set::ChangeSet;
pub use diff::diff;
