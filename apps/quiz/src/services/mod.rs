pub mod evaluator;
pub mod session;
pub mod store;

pub use evaluator::{Evaluation, Evaluator};
pub use session::{Collaborators, Session, SessionSummary};
pub use store::{CardStore, JsonStore, StoreError};
