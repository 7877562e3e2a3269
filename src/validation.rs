// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Local form validation.
//!
//! Login and registration forms are checked before anything is sent; a
//! failure is reported per field and never reaches the gateway.

use regex::Regex;
use serde::{Deserialize, Serialize};
use std::borrow::Cow;
use std::collections::BTreeMap;
use std::fmt;
use std::sync::LazyLock;
use validator::{Validate, ValidationError, ValidationErrors};

use crate::error::ClientError;

/// Minimum password length accepted by the forms.
pub const MIN_PASSWORD_LEN: usize = 6;

static EMAIL_SHAPE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\S+@\S+\.\S+").expect("static regex"));

/// Field name (camelCase, as the forms name them) to first error message.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FormErrors(BTreeMap<String, String>);

impl FormErrors {
    pub fn get(&self, field: &str) -> Option<&str> {
        self.0.get(field).map(String::as_str)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }
}

impl fmt::Display for FormErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let joined = self
            .iter()
            .map(|(field, message)| format!("{}: {}", field, message))
            .collect::<Vec<_>>()
            .join("; ");
        f.write_str(&joined)
    }
}

impl From<ValidationErrors> for FormErrors {
    fn from(errors: ValidationErrors) -> Self {
        let mut out = BTreeMap::new();
        for (field, errs) in errors.field_errors() {
            // "required" wins over format errors on the same field
            let chosen = errs
                .iter()
                .find(|e| e.code == "required")
                .or_else(|| errs.first());
            if let Some(err) = chosen {
                let message = err
                    .message
                    .as_ref()
                    .map(|m| m.to_string())
                    .unwrap_or_else(|| err.code.to_string());
                out.insert(camel_case(&field.to_string()), message);
            }
        }
        FormErrors(out)
    }
}

/// Run the derive validators and convert failures into a client error.
pub fn check<T: Validate>(form: &T) -> Result<(), ClientError> {
    form.validate()
        .map_err(|e| ClientError::Validation(FormErrors::from(e)))
}

/// Email/password login credentials, sent as-is to the login endpoint.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, Validate)]
pub struct LoginRequest {
    #[validate(custom(function = "validate_login_email"))]
    pub email: String,
    #[validate(custom(function = "validate_password"))]
    pub password: String,
}

impl LoginRequest {
    pub fn new(email: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            email: email.into(),
            password: password.into(),
        }
    }
}

/// Registration form as the user fills it in.
#[derive(Debug, Clone, Default, PartialEq, Eq, Validate)]
pub struct RegistrationForm {
    #[validate(custom(function = "validate_first_name"))]
    pub first_name: String,
    #[validate(custom(function = "validate_last_name"))]
    pub last_name: String,
    #[validate(custom(function = "validate_registration_email"))]
    pub email: String,
    #[validate(custom(function = "validate_password"))]
    pub password: String,
    #[validate(
        custom(function = "validate_confirm_present"),
        must_match(other = "password", message = "Passwords do not match")
    )]
    pub confirm_password: String,
    #[validate(custom(function = "validate_terms_accepted"))]
    pub accept_terms: bool,
}

/// Body of the register endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RegisterRequest {
    pub name: String,
    pub email: String,
    pub password: String,
}

impl From<&RegistrationForm> for RegisterRequest {
    fn from(form: &RegistrationForm) -> Self {
        Self {
            name: format!("{} {}", form.first_name, form.last_name),
            email: form.email.clone(),
            password: form.password.clone(),
        }
    }
}

fn error(code: &'static str, message: &'static str) -> ValidationError {
    ValidationError::new(code).with_message(Cow::Borrowed(message))
}

fn validate_email_shape(value: &str, invalid_message: &'static str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        return Err(error("required", "Email is required"));
    }
    if !EMAIL_SHAPE.is_match(value) {
        return Err(error("email", invalid_message));
    }
    Ok(())
}

fn validate_login_email(value: &str) -> Result<(), ValidationError> {
    validate_email_shape(value, "Email is invalid")
}

fn validate_registration_email(value: &str) -> Result<(), ValidationError> {
    validate_email_shape(value, "Please enter a valid email")
}

fn validate_password(value: &str) -> Result<(), ValidationError> {
    if value.is_empty() {
        return Err(error("required", "Password is required"));
    }
    if value.chars().count() < MIN_PASSWORD_LEN {
        return Err(error("length", "Password must be at least 6 characters"));
    }
    Ok(())
}

fn validate_first_name(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        return Err(error("required", "First name is required"));
    }
    Ok(())
}

fn validate_last_name(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        return Err(error("required", "Last name is required"));
    }
    Ok(())
}

fn validate_confirm_present(value: &str) -> Result<(), ValidationError> {
    if value.is_empty() {
        return Err(error("required", "Please confirm your password"));
    }
    Ok(())
}

fn validate_terms_accepted(value: &bool) -> Result<(), ValidationError> {
    if !*value {
        return Err(error("required", "You must accept the terms and conditions"));
    }
    Ok(())
}

fn camel_case(field: &str) -> String {
    let mut out = String::with_capacity(field.len());
    let mut upper = false;
    for c in field.chars() {
        if c == '_' {
            upper = true;
        } else if upper {
            out.extend(c.to_uppercase());
            upper = false;
        } else {
            out.push(c);
        }
    }
    out
}
