//! Use Cases Layer - Application Business Logic
//!
//! Orchestrates domain logic with port interfaces to implement
//! the bot's workflows.
//!
//! Use cases:
//! - `DepositMonitor`: Capacity polling loop
//! - `Notifier`: Threshold matching and alert dispatch
//! - `ConversationHandler`: Language, alert creation, view and delete

pub mod conversation;
pub mod deposit_monitor;
pub mod notifier;
