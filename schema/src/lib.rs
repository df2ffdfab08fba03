// Skirmish Schema - Shared data definitions
// This crate contains the plain data enums and definition structs that are
// shared between the combat engine and the RON battle files. Behaviour for
// the calculator enums lives in the engine crate behind extension traits.

// Re-export the main types
pub use battle_data::*;
pub use calculators::*;
pub use move_types::*;
pub use roster_data::*;

pub mod battle_data;
pub mod calculators;
pub mod move_types;
pub mod roster_data;
