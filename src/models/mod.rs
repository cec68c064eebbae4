// Model exports
pub mod domain;
pub mod requests;
pub mod responses;

pub use domain::{
    BirthDateWindow, CandidateQuery, City, CityId, Gender, GenderId, InterestEdge, InterestKind,
    LikeOutcome, NewProfile, Photo, Profile, ProfileId, ProfileUpdate, RegistrationPayload, UserId,
};
pub use requests::{CandidatesQuery, RegisterProfileRequest, UpdateProfileRequest, UploadPhotoRequest};
pub use responses::{CandidatesResponse, ErrorResponse, HealthResponse, MatchesResponse, StatusResponse};
