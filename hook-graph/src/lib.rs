//! Follow-graph model and the mutual-follow computation.
//!
//! [`load`] turns the `data.users` array of the webhook response into
//! [`User`] records, [`mutual`] finds the pairs of users that follow each
//! other and decides the [`Outcome`] that gets posted back.
pub mod load;
pub mod mutual;
pub mod types;

pub use load::load_users;
pub use mutual::{decide_outcome, find_mutual_pairs};
pub use types::{FALLBACK_PAIR, MutualPair, Outcome, User, UserId};
