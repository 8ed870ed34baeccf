//! Job polling with supersession and staggered refreshes

pub mod refresh;
pub mod session;
pub mod token;

pub use refresh::{MUTATION_REFRESH_DELAYS, RefreshSchedule};
pub use session::{PollConfig, PollOutcome, PollSession};
pub use token::{PollSlot, PollToken};
