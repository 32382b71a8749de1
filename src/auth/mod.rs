/**
 * Identity and Session Management
 *
 * User records, credential verification, and signed bearer claims.
 */

pub mod handlers;
pub mod service;
pub mod sessions;
pub mod users;

pub use sessions::{Claims, TokenIssuer};
pub use users::{AuthorSummary, User, UserRole, UserStatus};
