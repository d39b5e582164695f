mod auth;
mod request;

pub use auth::{
    AccessClaims, GoogleLoginRequest, LoginRequest, RefreshRequest, RegisterRequest, TokenPair,
    VerificationRequest,
};
pub use request::RequestDescriptor;
