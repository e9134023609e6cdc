//! Configuration module

mod site;

pub use site::AdminConfig;
pub use site::ServerConfig;
pub use site::SiteConfig;
pub use site::ADMIN_PASSWORD_ENV;
