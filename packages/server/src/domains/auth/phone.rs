use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    // E.164-ish: country code (1-3 digits) followed by a 10 digit subscriber number
    static ref PHONE_NUMBER: Regex = Regex::new(r"^\+[0-9]{1,3}[0-9]{10}$").unwrap();
}

pub fn is_valid_phone_number(phone_number: &str) -> bool {
    PHONE_NUMBER.is_match(phone_number)
}
