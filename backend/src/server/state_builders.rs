//! Assembly of the HTTP state from database-backed adapters.

use std::sync::Arc;

use mockable::{Clock, DefaultClock};

use crate::domain::ports::IdentityProvider;
use crate::domain::{
    AccountServiceImpl, AttendanceService, MeetupCommandService, MeetupQueryService, ReviewService,
};
use crate::inbound::http::state::HttpState;
use crate::outbound::persistence::{
    DbPool, DieselMeetupRepository, DieselRegistrationRepository, DieselReviewRepository,
    DieselUserRepository,
};
use crate::outbound::security::Argon2PasswordHasher;

/// Wire the domain services over Diesel repositories.
pub(crate) fn build_http_state(pool: DbPool, identity: Arc<dyn IdentityProvider>) -> HttpState {
    let clock: Arc<dyn Clock> = Arc::new(DefaultClock);

    let users = Arc::new(DieselUserRepository::new(pool.clone()));
    let meetups = Arc::new(DieselMeetupRepository::new(pool.clone()));
    let registrations = Arc::new(DieselRegistrationRepository::new(pool.clone()));
    let review_repo = Arc::new(DieselReviewRepository::new(pool));

    let reviews = Arc::new(ReviewService::new(
        meetups.clone(),
        registrations.clone(),
        review_repo,
        clock.clone(),
    ));

    HttpState {
        accounts: Arc::new(AccountServiceImpl::new(
            users,
            Arc::new(Argon2PasswordHasher::new()),
            identity.clone(),
            clock.clone(),
        )),
        meetups: Arc::new(MeetupCommandService::new(meetups.clone(), clock.clone())),
        meetup_query: Arc::new(MeetupQueryService::new(
            meetups,
            registrations.clone(),
            clock.clone(),
        )),
        attendance: Arc::new(AttendanceService::new(registrations, clock)),
        reviews: reviews.clone(),
        review_query: reviews,
        identity,
    }
}
