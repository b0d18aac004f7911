pub mod jwt_admin_resolver;
pub mod traits;

pub use jwt_admin_resolver::{AdminClaims, JwtAdminResolver};
pub use traits::{AdminDirectory, AdminIdentity, IdentityResolver};
