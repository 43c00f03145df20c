use std::sync::OnceLock;

use regex::Regex;

use crate::contract::model::{UserDraft, UserRecord};

/// Raw values typed into the add/edit form
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct FormInput {
    pub name: String,
    pub email: String,
    pub department: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormField {
    Name,
    Email,
    Department,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldError {
    pub field: FormField,
    pub message: &'static str,
}

/// Field presence/format rules of the user form
pub struct UserForm;

fn email_pattern() -> &'static Regex {
    static EMAIL: OnceLock<Regex> = OnceLock::new();
    EMAIL.get_or_init(|| Regex::new(r"\S+@\S+\.\S+").expect("static email regex"))
}

impl FormInput {
    pub fn new(
        name: impl Into<String>,
        email: impl Into<String>,
        department: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            email: email.into(),
            department: department.into(),
        }
    }

    /// Values shown when the form opens on an existing record
    pub fn prefilled(record: &UserRecord) -> Self {
        Self {
            name: record.name.clone(),
            email: record.email.clone(),
            department: record.department.clone().unwrap_or_default(),
        }
    }
}

impl UserForm {
    /// Check the input and build a draft, or report every failing field.
    pub fn validate(input: &FormInput) -> Result<UserDraft, Vec<FieldError>> {
        let name = input.name.trim();
        let email = input.email.trim();
        let department = input.department.trim();

        let mut errors = Vec::new();
        if name.is_empty() {
            errors.push(FieldError {
                field: FormField::Name,
                message: "Name is required",
            });
        }
        if email.is_empty() {
            errors.push(FieldError {
                field: FormField::Email,
                message: "Email is required",
            });
        } else if !email_pattern().is_match(email) {
            errors.push(FieldError {
                field: FormField::Email,
                message: "Invalid email address",
            });
        }
        if department.is_empty() {
            errors.push(FieldError {
                field: FormField::Department,
                message: "Department is required",
            });
        }

        if !errors.is_empty() {
            return Err(errors);
        }

        Ok(UserDraft {
            name: name.to_string(),
            email: email.to_string(),
            department: Some(department.to_string()),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn valid_input_becomes_draft() {
        let draft = UserForm::validate(&FormInput::new(" Ada Lovelace ", "ada@x.com", "Eng"))
            .expect("valid input");
        assert_eq!(draft.name, "Ada Lovelace");
        assert_eq!(draft.email, "ada@x.com");
        assert_eq!(draft.department.as_deref(), Some("Eng"));
    }

    #[test]
    fn empty_fields_are_all_reported() {
        let errors = UserForm::validate(&FormInput::default()).unwrap_err();
        let fields: Vec<_> = errors.iter().map(|e| e.field).collect();
        assert_eq!(
            fields,
            vec![FormField::Name, FormField::Email, FormField::Department]
        );
        assert_eq!(errors[1].message, "Email is required");
    }

    #[test]
    fn email_shape_is_checked() {
        for bad in ["ada", "ada@x", "@x.com", "ada@.com"] {
            let errors = UserForm::validate(&FormInput::new("Ada", bad, "Eng"))
                .expect_err("malformed email should be rejected");
            assert_eq!(errors.len(), 1);
            assert_eq!(errors[0].field, FormField::Email);
            assert_eq!(errors[0].message, "Invalid email address");
        }
    }

    #[test]
    fn email_pattern_is_unanchored() {
        // Same looseness as the original form: a valid shape anywhere passes
        assert!(UserForm::validate(&FormInput::new("Ada", "a b@c.d e", "Eng")).is_ok());
    }

    #[test]
    fn prefilled_uses_record_values() {
        let record = UserRecord::new(4, "Patricia Lebsack", "julianne@kory.org");
        let input = FormInput::prefilled(&record);
        assert_eq!(input.name, "Patricia Lebsack");
        assert_eq!(input.department, "");
    }
}
