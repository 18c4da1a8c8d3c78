#[doc(inline)]
pub use middleware::ExpiryLayer;
#[doc(inline)]
pub use save::save_expiration;
#[doc(inline)]
pub use validate::{validate, ExpirationForm, Validation};

#[macro_use]
mod macros;

pub mod column;
pub mod host;
pub mod middleware;
pub mod republish;
pub mod save;
pub mod store;
pub mod validate;

mod util;
