pub mod email;
pub mod razorpay;

pub use email::{LogMailer, Mailer};
pub use razorpay::RazorpayClient;
