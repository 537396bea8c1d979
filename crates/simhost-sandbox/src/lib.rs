#![forbid(unsafe_code)]

//! Reference engine: two armies on a fixed board.
//!
//! The sandbox implements the full [`Engine`](simhost_core::Engine) call
//! surface so the host can be run end to end without an external engine.
//! Battles are configured by JSON conditions files.

pub mod battle;
pub mod board;
pub mod conditions;
pub mod engine;
pub mod view;

pub use battle::{Battle, Combatant, Unit};
pub use board::{BOARD_HEIGHT, BOARD_WIDTH, Board};
pub use conditions::{Conditions, ConditionsError, GeneralVariables, UnitPlacement, UnitType};
pub use engine::{Sandbox, Toggles};
pub use view::{BoardRect, FrameStore, Selection, Viewport};
