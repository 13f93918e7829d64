//! Numeric value generators.

use crate::document::GeneratedValue;
use rand::Rng;

/// `bool`: true or false with equal probability.
pub fn generate_bool<R: Rng>(rng: &mut R) -> GeneratedValue {
    GeneratedValue::Bool(rng.gen_bool(0.5))
}

/// `int`: a random integer in the given range (inclusive).
pub fn generate_int_range<R: Rng>(rng: &mut R, min: i64, max: i64) -> GeneratedValue {
    GeneratedValue::Int(rng.gen_range(min..=max))
}

/// `ipv4`: a dotted-quad address.
pub fn generate_ipv4<R: Rng>(rng: &mut R) -> GeneratedValue {
    let octets: [u8; 4] = rng.gen();
    GeneratedValue::String(std::net::Ipv4Addr::from(octets).to_string())
}
