pub mod r#trait {
    pub use super::trait_::*;
}
#[path = "trait.rs"]
mod trait_;

pub use r#trait::{BlacklistStore, BlacklistStoreStats, UserBlacklistStats};

#[cfg(test)]
pub mod mock;
#[cfg(test)]
pub use mock::MockBlacklistStore;

#[cfg(test)]
mod tests;
