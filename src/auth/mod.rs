/// Authentication core.
///
/// Two components: the credential verifier (bcrypt hashing and
/// verification) and the token engine (signed token issuance,
/// validation and rotation). The token engine never touches the user
/// store; the verifier never constructs tokens.
mod claims;
mod password;
mod token;

pub use claims::Claims;
pub use claims::TokenClass;
pub use password::hash_password;
pub use password::verify_password;
pub use token::issue_token_pair;
pub use token::rotate_tokens;
pub use token::validate_token;
pub use token::TokenPair;
