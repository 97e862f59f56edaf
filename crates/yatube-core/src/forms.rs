//! Static form schemas and their validation.
//!
//! Submitted HTML forms arrive as loosely typed strings. Each form here
//! describes its fields once (label, help text, kind) and turns raw input into
//! a cleaned value or a set of per-field errors.

use std::collections::BTreeMap;
use std::fmt;

use crate::domain::Group;

pub const REQUIRED_MESSAGE: &str = "Обязательное поле.";
pub const INVALID_CHOICE_MESSAGE: &str =
    "Выберите корректный вариант. Вашего варианта нет среди допустимых значений.";

/// Kind of input a field accepts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    /// Free text.
    Text,
    /// One of a fixed set of options.
    Choice,
    /// Masked text.
    Password,
}

/// Description of a single form field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldSpec {
    pub name: &'static str,
    pub label: &'static str,
    pub help_text: &'static str,
    pub kind: FieldKind,
    pub required: bool,
}

/// Errors collected while cleaning a form, keyed by field name.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FormErrors(BTreeMap<&'static str, Vec<String>>);

impl FormErrors {
    pub fn add(&mut self, field: &'static str, message: impl Into<String>) {
        self.0.entry(field).or_default().push(message.into());
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Messages attached to one field.
    pub fn field(&self, name: &str) -> &[String] {
        self.0.get(name).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn iter(&self) -> impl Iterator<Item = (&'static str, &[String])> {
        self.0.iter().map(|(k, v)| (*k, v.as_slice()))
    }

    /// `Ok(value)` when nothing was recorded.
    pub fn into_result<T>(self, value: T) -> Result<T, FormErrors> {
        if self.is_empty() { Ok(value) } else { Err(self) }
    }
}

impl fmt::Display for FormErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut first = true;
        for (field, messages) in self.iter() {
            for message in messages {
                if !first {
                    f.write_str("; ")?;
                }
                write!(f, "{field}: {message}")?;
                first = false;
            }
        }
        Ok(())
    }
}

/// Raw post form submission.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PostInput {
    pub text: String,
    /// Group ID as submitted; `None` or an empty string selects no group.
    pub group: Option<String>,
}

impl PostInput {
    pub fn new(text: impl Into<String>, group: Option<i64>) -> Self {
        Self {
            text: text.into(),
            group: group.map(|id| id.to_string()),
        }
    }
}

/// Post form data after validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CleanedPost {
    pub text: String,
    pub group_id: Option<i64>,
}

/// Schema of the post create/edit form.
pub struct PostForm;

impl PostForm {
    pub const TEXT: FieldSpec = FieldSpec {
        name: "text",
        label: "Текст",
        help_text: "Введите текст поста",
        kind: FieldKind::Text,
        required: true,
    };

    pub const GROUP: FieldSpec = FieldSpec {
        name: "group",
        label: "Группа",
        help_text: "Группа, к которой будет относиться пост",
        kind: FieldKind::Choice,
        required: false,
    };

    pub const FIELDS: [FieldSpec; 2] = [Self::TEXT, Self::GROUP];

    pub fn field(name: &str) -> Option<&'static FieldSpec> {
        static FIELDS: [FieldSpec; 2] = PostForm::FIELDS;
        FIELDS.iter().find(|f| f.name == name)
    }

    /// Validate raw input against the groups that currently exist.
    pub fn clean(input: &PostInput, groups: &[Group]) -> Result<CleanedPost, FormErrors> {
        let mut errors = FormErrors::default();

        let text = input.text.trim();
        if text.is_empty() {
            errors.add(Self::TEXT.name, REQUIRED_MESSAGE);
        }

        let group_id = match input.group.as_deref().map(str::trim) {
            None | Some("") => None,
            Some(raw) => match raw.parse::<i64>() {
                Ok(id) if groups.iter().any(|g| g.id == id) => Some(id),
                _ => {
                    errors.add(Self::GROUP.name, INVALID_CHOICE_MESSAGE);
                    None
                }
            },
        };

        errors.into_result(CleanedPost {
            text: text.to_string(),
            group_id,
        })
    }
}

/// Raw sign-up form submission.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SignupInput {
    pub username: String,
    pub password1: String,
    pub password2: String,
}

/// Sign-up form data after validation; the password is still in plain text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CleanedSignup {
    pub username: String,
    pub password: String,
}

/// Schema of the sign-up form.
pub struct SignupForm;

impl SignupForm {
    pub const MAX_USERNAME_CHARS: usize = 150;
    pub const MIN_PASSWORD_CHARS: usize = 8;

    pub const USERNAME: FieldSpec = FieldSpec {
        name: "username",
        label: "Имя пользователя",
        help_text: "Не более 150 символов. Только буквы, цифры и символы @/./+/-/_.",
        kind: FieldKind::Text,
        required: true,
    };

    pub const PASSWORD1: FieldSpec = FieldSpec {
        name: "password1",
        label: "Пароль",
        help_text: "Пароль должен содержать как минимум 8 символов.",
        kind: FieldKind::Password,
        required: true,
    };

    pub const PASSWORD2: FieldSpec = FieldSpec {
        name: "password2",
        label: "Подтверждение пароля",
        help_text: "Для подтверждения введите, пожалуйста, пароль ещё раз.",
        kind: FieldKind::Password,
        required: true,
    };

    pub const FIELDS: [FieldSpec; 3] = [Self::USERNAME, Self::PASSWORD1, Self::PASSWORD2];

    pub fn is_valid_username(username: &str) -> bool {
        !username.is_empty()
            && username.chars().count() <= Self::MAX_USERNAME_CHARS
            && username
                .chars()
                .all(|c| c.is_alphanumeric() || matches!(c, '@' | '.' | '+' | '-' | '_'))
    }

    /// Check formats only; username uniqueness needs the user store.
    pub fn clean(input: &SignupInput) -> Result<CleanedSignup, FormErrors> {
        let mut errors = FormErrors::default();

        let username = input.username.trim();
        if username.is_empty() {
            errors.add(Self::USERNAME.name, REQUIRED_MESSAGE);
        } else if !Self::is_valid_username(username) {
            errors.add(
                Self::USERNAME.name,
                "Введите правильное имя пользователя. Оно может содержать только буквы, цифры и знаки @/./+/-/_.",
            );
        }

        if input.password1.is_empty() {
            errors.add(Self::PASSWORD1.name, REQUIRED_MESSAGE);
        } else if input.password1.chars().count() < Self::MIN_PASSWORD_CHARS {
            errors.add(
                Self::PASSWORD1.name,
                "Введённый пароль слишком короткий. Он должен содержать как минимум 8 символов.",
            );
        }

        if input.password2.is_empty() {
            errors.add(Self::PASSWORD2.name, REQUIRED_MESSAGE);
        } else if input.password1 != input.password2 {
            errors.add(Self::PASSWORD2.name, "Введенные пароли не совпадают.");
        }

        errors.into_result(CleanedSignup {
            username: username.to_string(),
            password: input.password1.clone(),
        })
    }
}

/// Schema of the login form.
pub struct LoginForm;

impl LoginForm {
    pub const USERNAME: FieldSpec = FieldSpec {
        name: "username",
        label: "Имя пользователя",
        help_text: "",
        kind: FieldKind::Text,
        required: true,
    };

    pub const PASSWORD: FieldSpec = FieldSpec {
        name: "password",
        label: "Пароль",
        help_text: "",
        kind: FieldKind::Password,
        required: true,
    };

    pub const FIELDS: [FieldSpec; 2] = [Self::USERNAME, Self::PASSWORD];

    pub const INVALID_LOGIN_MESSAGE: &'static str = "Пожалуйста, введите правильные имя пользователя и пароль. Оба поля могут быть чувствительны к регистру.";
}
