pub mod logic;

pub use logic::board::{MatchState, Team, Unit, GRID_SIZE};
pub use logic::catalog::UnitArchetype;
pub use logic::generator::TeamGenerator;
pub use logic::rules::{validate, Rejection, RejectionKind, StateProposal, UnitProposal};
