pub mod action_stack;
pub mod ai;
pub mod commands;
pub mod conditions;
pub mod damage;
pub mod end_of_turn;
pub mod engine;
pub mod move_effects;
pub mod move_execution;
pub mod state;
pub mod stats;
pub mod triggers;
pub mod turn_order;
pub mod view;

#[cfg(test)]
pub mod tests;
