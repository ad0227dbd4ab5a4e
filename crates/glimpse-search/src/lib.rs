pub mod controller;
pub mod fastpath;
pub mod rank;
pub mod recents;
pub mod service;

pub use controller::{QueryController, QueryPhase};
pub use fastpath::{ClipboardProvider, FastPath, FastPathChain};
pub use rank::{normalize_query, rank, score_entry};
pub use recents::{RecencyList, RecencyStore};
pub use service::{Collaborators, SearchService};
