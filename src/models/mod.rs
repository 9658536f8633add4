mod exchange;
mod host;
mod matching;
mod rating;
mod state;
mod user;

pub use exchange::Exchange;
pub use host::Host;
pub use matching::MatchRecord;
pub use rating::Rating;
pub use state::AppState;
pub use user::{AccountStatus, User, UserKind};
