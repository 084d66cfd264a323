pub mod auth_dto;
pub mod clients_dto;
pub mod coupon_dto;
pub mod export_dto;
pub mod ledger_dto;
pub mod pass_dto;
pub mod user_dto;

pub use auth_dto::*;
pub use clients_dto::*;
pub use coupon_dto::*;
pub use export_dto::*;
pub use ledger_dto::*;
pub use pass_dto::*;
pub use user_dto::*;
