//! Domain ports and supporting types for the hexagonal boundary.

mod account_service;
mod attendance_command;
mod identity_provider;
mod meetup_command;
mod meetup_query;
mod meetup_repository;
mod password_hasher;
mod registration_repository;
mod review_command;
mod review_query;
mod review_repository;
mod user_repository;

#[cfg(test)]
pub use account_service::MockAccountService;
pub use account_service::{AccountService, AccountSession};
#[cfg(test)]
pub use attendance_command::MockAttendanceCommand;
pub use attendance_command::{AttendanceCommand, AttendancePayload};
#[cfg(test)]
pub use identity_provider::MockIdentityProvider;
pub use identity_provider::{
    FixtureIdentityProvider, IdentityProvider, IdentityProviderError, IdentityToken,
};
#[cfg(test)]
pub use meetup_command::MockMeetupCommand;
pub use meetup_command::{MeetupCommand, NewMeetup};
#[cfg(test)]
pub use meetup_query::MockMeetupQuery;
pub use meetup_query::{MeetupPayload, MeetupQuery, RegisteredMeetupPayload};
#[cfg(test)]
pub use meetup_repository::MockMeetupRepository;
pub use meetup_repository::{
    AttendanceWindow, MeetupFilter, MeetupRecord, MeetupRepository, MeetupRepositoryError,
    RegisteredMeetupRecord,
};
#[cfg(test)]
pub use password_hasher::MockPasswordHasher;
pub use password_hasher::{FixturePasswordHasher, PasswordHashError, PasswordHasher};
#[cfg(test)]
pub use registration_repository::MockRegistrationRepository;
pub use registration_repository::{
    NewRegistration, RegisterOutcome, RegistrationRepository, RegistrationRepositoryError,
};
#[cfg(test)]
pub use review_command::MockReviewCommand;
pub use review_command::{ReviewCommand, ReviewPayload, SubmitReview};
#[cfg(test)]
pub use review_query::MockReviewQuery;
pub use review_query::{AuthoredReviewPayload, ReviewQuery};
#[cfg(test)]
pub use review_repository::MockReviewRepository;
pub use review_repository::{ReviewRepository, ReviewRepositoryError, ReviewWithAuthor};
#[cfg(test)]
pub use user_repository::MockUserRepository;
pub use user_repository::{NewUserRecord, StoredAccount, UserRepository, UserRepositoryError};
