//! Storage layer for the Nexora banking assistant
//!
//! Two stores live here:
//!
//! - [`ProfileStore`]: read-only table of customer profiles, loaded once at
//!   startup from a JSON or YAML document
//! - [`InteractionLog`]: append-only audit trail of user actions
//!   (accept, dismiss, chat), backed by a CSV file or memory
//!
//! # Quick Start
//!
//! ```no_run
//! use nexora_repository::{ProfileRepository, ProfileStore};
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let store = ProfileStore::load("mock_data.json").await?;
//!     let profile = store.find("USR_001")?;
//!     println!("{} has {} risk tolerance", profile.user_id, profile.risk_tolerance());
//!     Ok(())
//! }
//! ```

pub mod error;
pub mod interaction_log;
pub mod profile_store;
pub mod traits;

pub use error::{RepositoryError, RepositoryResult};
pub use interaction_log::{CsvInteractionLog, InMemoryInteractionLog};
pub use profile_store::ProfileStore;
pub use traits::{InteractionLog, ProfileRepository};
