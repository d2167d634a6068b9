// All service modules
pub mod notification_service;
pub mod redemption;
pub mod roster;
pub mod view_state;

// Re-export for convenience
pub use notification_service::{ErrorNotice, NotificationService};
pub use redemption::{AddPlayerOutcome, RedemptionWorkflow};
pub use roster::RosterStore;
pub use view_state::ViewStateStore;
