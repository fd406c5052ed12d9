pub mod corsair;
pub mod email;

pub use corsair::CorsairClient;
pub use email::EmailClient;
