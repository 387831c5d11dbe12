pub(crate) mod extractors;
pub mod services;

pub use extractors::AdminAuth;
