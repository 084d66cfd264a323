pub mod app_config;
pub mod jwt_details;
pub mod policies;
pub mod razorpay_details;

pub use app_config::*;
pub use jwt_details::*;
pub use policies::*;
pub use razorpay_details::*;
