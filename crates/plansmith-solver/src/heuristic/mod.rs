//! Moves and the selectors that enumerate them.

pub mod r#move;
pub mod selector;

pub use r#move::{ChangeMove, Move, SwapMove};
pub use selector::{
    ChangeMoveSelector, MoveArranger, MoveSelector, SelectionOrder, SwapMoveSelector,
    UnionMoveSelector,
};
