pub mod model;

pub use model::{
    AuthResponse, AuthStatus, LoginCredentials, Session, SignInRequest, SignUpRequest,
    SignupCredentials, User, redact_token,
};
