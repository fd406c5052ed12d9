use fake::faker::internet::en::SafeEmail;
use fake::faker::name::en::Name;
use fake::Fake;
use serde_json::{json, Value};

pub fn email() -> String {
    SafeEmail().fake::<String>().to_lowercase()
}

pub fn idempotency_key() -> String {
    format!("test-{}", uuid::Uuid::new_v4())
}

pub fn contribution(email: &str, amount: i64) -> Value {
    json!({
        "user_email": email,
        "user_name": Name().fake::<String>(),
        "amount": amount,
        "idempotency_key": idempotency_key(),
    })
}

pub fn merchant_contribution(email: &str, amount: i64) -> Value {
    json!({
        "customer_email": email,
        "amount": amount,
        "idempotency_key": idempotency_key(),
    })
}
