pub mod escalator;
pub mod ledger;
pub mod orchestrator;
pub mod selector;
pub mod template;
