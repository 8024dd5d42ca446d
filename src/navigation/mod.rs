//! Navigation guarding while a reading request selection is unsaved

pub mod guard;
pub mod link;

pub use guard::{
    HistoryDecision, LinkDecision, NavigationCommand, NavigationGuard, PendingNavigation,
    PromptChoice, UnloadDecision,
};
pub use link::{LinkClick, Modifiers};
