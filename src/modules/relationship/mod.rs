pub mod interaction;
pub mod matrix;

pub use interaction::InteractionKind;
pub use matrix::{intensity_for_score, relationship_status, RelationshipMatrix, DEFAULT_SCORE, DEFEND_THRESHOLD};
