pub mod jwt;
pub mod password;
pub mod validate;

pub use jwt::{Claims, SessionIdentity, SessionIssuer, TokenError, TokenPair, TokenType};
pub use validate::{ValidatedJson, ValidatedQuery};
