pub mod admin_exports;
pub mod admin_issue_ticket;
pub mod admin_send_passes;
pub mod admin_settle;
pub mod apply_coupon;
pub mod current_user;
pub mod health;
pub mod initiate_payment;
pub mod purchase;
pub mod signin;
pub mod signup;
