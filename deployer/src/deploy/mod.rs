//! Preview deployment reconciliation

pub mod fsm;
pub mod reconciler;
pub mod select;
