use fake::faker::name::en::Name;
use fake::Fake;
use serde_json::{json, Value};
use uuid::Uuid;

/// A unique, valid email for one test.
pub fn unique_email() -> String {
    format!("attendee{}@example.com", Uuid::new_v4().simple())
}

pub fn contact_number() -> String {
    format!("9{:09}", (0..1_000_000_000u64).fake::<u64>())
}

pub fn register_body(email: &str, otp: &str) -> Value {
    let name: String = Name().fake();
    json!({
        "email": email,
        "name": name,
        "contact_number": contact_number(),
        "otp": otp,
        "profile_data": { "college": "Test Institute", "year": 3 }
    })
}
