use secrecy::{ExposeSecret, SecretString};

pub const MAX_USERNAME_LENGTH: usize = 150;
pub const MIN_PASSWORD_LENGTH: usize = 8;
pub const MAX_PASSWORD_LENGTH: usize = 128;

#[derive(Debug, Clone)]
pub struct Username(String);

impl Username {
    /// Letters, digits and `@ . + - _` only.
    pub fn parse(s: String) -> Result<Self, String> {
        let s = s.trim().to_string();
        if s.is_empty() {
            return Err("A username is required.".into());
        }
        if s.chars().count() > MAX_USERNAME_LENGTH {
            return Err(format!(
                "The username cannot be longer than {MAX_USERNAME_LENGTH} characters."
            ));
        }
        let allowed = |c: char| c.is_alphanumeric() || "@.+-_".contains(c);
        if !s.chars().all(allowed) {
            return Err(
                "Enter a valid username. It may contain only letters, numbers, and @/./+/-/_ characters."
                    .into(),
            );
        }
        Ok(Self(s))
    }
}

impl AsRef<str> for Username {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

#[derive(Debug)]
pub struct NewPassword(SecretString);

impl NewPassword {
    pub fn parse(password: SecretString, confirmation: SecretString) -> Result<Self, String> {
        let raw = password.expose_secret();
        if raw != confirmation.expose_secret() {
            return Err("The two password fields didn't match.".into());
        }
        let length = raw.chars().count();
        if length < MIN_PASSWORD_LENGTH {
            return Err(format!(
                "This password is too short. It must contain at least {MIN_PASSWORD_LENGTH} characters."
            ));
        }
        if length > MAX_PASSWORD_LENGTH {
            return Err(format!(
                "This password is too long. It must contain at most {MAX_PASSWORD_LENGTH} characters."
            ));
        }
        if raw.chars().all(|c| c.is_ascii_digit()) {
            return Err("This password is entirely numeric.".into());
        }
        Ok(Self(password))
    }

    pub fn into_secret(self) -> SecretString {
        self.0
    }
}
