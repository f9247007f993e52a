//! Shared HTTP adapter state.
//!
//! HTTP handlers accept this state via `actix_web::web::Data` so they only
//! depend on domain ports (use-cases) and remain testable without I/O.

use std::sync::Arc;

use crate::domain::ports::{
    AccountService, AttendanceCommand, IdentityProvider, MeetupCommand, MeetupQuery,
    ReviewCommand, ReviewQuery,
};

/// Dependency bundle for HTTP handlers.
#[derive(Clone)]
pub struct HttpState {
    /// Account signup, login, and profile reads.
    pub accounts: Arc<dyn AccountService>,
    /// Meetup creation.
    pub meetups: Arc<dyn MeetupCommand>,
    /// Meetup listing and detail reads.
    pub meetup_query: Arc<dyn MeetupQuery>,
    /// Attendance roster mutations.
    pub attendance: Arc<dyn AttendanceCommand>,
    /// Review submission.
    pub reviews: Arc<dyn ReviewCommand>,
    /// Review listing.
    pub review_query: Arc<dyn ReviewQuery>,
    /// Bearer-token validation for the extractors.
    pub identity: Arc<dyn IdentityProvider>,
}
