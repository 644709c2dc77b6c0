pub mod identity_event;
pub mod profile;

pub use identity_event::{IdentityEvent, IdentityEventKind};
pub use profile::Profile;
