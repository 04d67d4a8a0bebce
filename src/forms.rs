//! Field validation for the login, signup and contact forms.
//!
//! Validation only: nothing is submitted anywhere. Each validator returns a
//! field → message map; an empty map means the form is valid.

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

static EMAIL: Lazy<Regex> = Lazy::new(|| Regex::new(r"\S+@\S+\.\S+").expect("email regex"));

pub const MIN_PASSWORD_LEN: usize = 6;
pub const MIN_MESSAGE_LEN: usize = 10;
pub const PHONE_DIGITS: usize = 10;

pub type FieldErrors = BTreeMap<&'static str, &'static str>;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Validation {
    pub valid: bool,
    pub errors: FieldErrors,
}

impl From<FieldErrors> for Validation {
    fn from(errors: FieldErrors) -> Self {
        Self {
            valid: errors.is_empty(),
            errors,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormKind {
    Login,
    Signup,
    Contact,
}

impl FormKind {
    pub fn as_str(self) -> &'static str {
        match self {
            FormKind::Login => "login",
            FormKind::Signup => "signup",
            FormKind::Contact => "contact",
        }
    }
}

impl fmt::Display for FormKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for FormKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "login" => Ok(FormKind::Login),
            "signup" => Ok(FormKind::Signup),
            "contact" => Ok(FormKind::Contact),
            other => Err(format!("unknown form: {other}")),
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct LoginForm {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct SignupForm {
    pub full_name: String,
    pub email: String,
    pub phone: String,
    pub password: String,
    pub confirm_password: String,
    pub agree_to_terms: bool,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ContactForm {
    pub name: String,
    pub email: String,
    pub subject: String,
    pub message: String,
}

pub fn is_valid_email(email: &str) -> bool {
    EMAIL.is_match(email)
}

fn check_email(errors: &mut FieldErrors, email: &str) {
    if email.is_empty() {
        errors.insert("email", "Email is required");
    } else if !is_valid_email(email) {
        errors.insert("email", "Please enter a valid email");
    }
}

fn check_password(errors: &mut FieldErrors, password: &str) {
    if password.is_empty() {
        errors.insert("password", "Password is required");
    } else if password.chars().count() < MIN_PASSWORD_LEN {
        errors.insert("password", "Password must be at least 6 characters");
    }
}

fn required(errors: &mut FieldErrors, field: &'static str, value: &str, message: &'static str) {
    if value.trim().is_empty() {
        errors.insert(field, message);
    }
}

impl LoginForm {
    pub fn validate(&self) -> FieldErrors {
        let mut errors = FieldErrors::new();
        check_email(&mut errors, &self.email);
        check_password(&mut errors, &self.password);
        errors
    }
}

impl SignupForm {
    pub fn validate(&self) -> FieldErrors {
        let mut errors = FieldErrors::new();
        required(&mut errors, "fullName", &self.full_name, "Full name is required");
        check_email(&mut errors, &self.email);

        if self.phone.trim().is_empty() {
            errors.insert("phone", "Phone number is required");
        } else if self.phone.chars().filter(char::is_ascii_digit).count() != PHONE_DIGITS {
            errors.insert("phone", "Please enter a valid 10-digit phone number");
        }

        check_password(&mut errors, &self.password);
        if self.confirm_password.is_empty() {
            errors.insert("confirmPassword", "Please confirm your password");
        } else if self.confirm_password != self.password {
            errors.insert("confirmPassword", "Passwords do not match");
        }

        if !self.agree_to_terms {
            errors.insert("agreeToTerms", "You must agree to the terms and conditions");
        }
        errors
    }
}

impl ContactForm {
    pub fn validate(&self) -> FieldErrors {
        let mut errors = FieldErrors::new();
        required(&mut errors, "name", &self.name, "Name is required");
        check_email(&mut errors, &self.email);
        required(&mut errors, "subject", &self.subject, "Subject is required");

        let message = self.message.trim();
        if message.is_empty() {
            errors.insert("message", "Message is required");
        } else if message.chars().count() < MIN_MESSAGE_LEN {
            errors.insert("message", "Message must be at least 10 characters");
        }
        errors
    }
}

/// Decode a submitted JSON body as `kind` and validate it.
pub fn validate_json(kind: FormKind, body: serde_json::Value) -> serde_json::Result<Validation> {
    let errors = match kind {
        FormKind::Login => serde_json::from_value::<LoginForm>(body)?.validate(),
        FormKind::Signup => serde_json::from_value::<SignupForm>(body)?.validate(),
        FormKind::Contact => serde_json::from_value::<ContactForm>(body)?.validate(),
    };
    Ok(errors.into())
}
