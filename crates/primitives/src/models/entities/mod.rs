pub mod order;
pub mod otp;
pub mod pushed_transaction;
pub mod ticket;
pub mod transaction;
pub mod user;

pub use order::*;
pub use otp::*;
pub use pushed_transaction::*;
pub use ticket::*;
pub use transaction::*;
pub use user::*;
