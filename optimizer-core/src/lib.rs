pub mod backend;
pub mod calculations;
pub mod models;
pub mod notifications;
pub mod wizard;

pub use backend::{BackendError, TaxBackend};
pub use models::*;
pub use notifications::{Notification, NotificationLevel, NotificationSink};
pub use wizard::{WizardAction, WizardController, WizardError, WizardState};
