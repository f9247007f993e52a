//! Domain primitives, ports, and services.
//!
//! Everything in this module is independent of the web framework and of the
//! concrete store: entities enforce their invariants through validated
//! constructors, `ports` defines the hexagonal boundary, and the service
//! types implement the driving ports against injected driven ports.

pub mod ports;

mod account_service;
mod attendance_service;
mod credentials;
mod error;
mod meetup;
mod meetup_service;
mod registration;
mod review;
mod review_service;
mod user;

pub use self::account_service::AccountServiceImpl;
pub use self::attendance_service::AttendanceService;
pub use self::credentials::{Credentials, CredentialsValidationError, NewAccount, Password};
pub use self::error::{Error, ErrorCode};
pub use self::meetup::{Capacity, Meetup, MeetupDraft, MeetupValidationError, TITLE_MAX};
pub use self::meetup_service::{MeetupCommandService, MeetupQueryService};
pub use self::registration::Registration;
pub use self::review::{
    RATING_MAX, RATING_MIN, Rating, Review, ReviewComment, ReviewValidationError,
};
pub use self::review_service::ReviewService;
pub use self::user::{
    EmailAddress, USERNAME_MAX, USERNAME_MIN, User, UserId, UserValidationError, Username,
};

/// Convenient domain result alias.
pub type ApiResult<T> = Result<T, Error>;
