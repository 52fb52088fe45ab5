//! Domain models for the wedding RSVP backend.

pub mod guest;
pub mod guest_group;
pub mod roster;
pub mod rsvp;
pub mod selection;
pub mod session;

pub use guest::{BusTime, Guest};
pub use guest_group::{CreateGuestGroupRequest, GuestGroup, NewGuest, NewGuestGroup};
pub use roster::{derive_view, BusBreakdown, GroupSummary, Roster, RosterStats, RosterView};
pub use rsvp::{rsvp_link, GuestResponse, RsvpError, RsvpInvitation, RsvpSubmission};
pub use selection::{Selection, SelectionError};
pub use session::{Navigation, RouteGuard, SessionSignal, SessionState};
