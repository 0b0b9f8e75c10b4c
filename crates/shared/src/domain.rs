use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("'{value}' is not a valid {kind}")]
pub struct ParseChoiceError {
    pub kind: &'static str,
    pub value: String,
}

/// Closed set of options rendered as a select control. Keys are the lowercase
/// values carried on the wire.
macro_rules! choice_enum {
    ($name:ident, $kind:literal, { $($variant:ident => ($key:literal, $label:literal)),+ $(,)? }) => {
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
        #[serde(rename_all = "snake_case")]
        pub enum $name {
            $($variant),+
        }

        impl $name {
            pub const ALL: &'static [$name] = &[$($name::$variant),+];

            pub fn key(self) -> &'static str {
                match self {
                    $($name::$variant => $key),+
                }
            }

            pub fn label(self) -> &'static str {
                match self {
                    $($name::$variant => $label),+
                }
            }
        }

        impl FromStr for $name {
            type Err = ParseChoiceError;

            fn from_str(value: &str) -> Result<Self, Self::Err> {
                match value {
                    $($key => Ok($name::$variant),)+
                    other => Err(ParseChoiceError {
                        kind: $kind,
                        value: other.to_string(),
                    }),
                }
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.key())
            }
        }
    };
}

choice_enum!(Gender, "gender", {
    Male => ("male", "Male"),
    Female => ("female", "Female"),
    Other => ("other", "Other"),
});

choice_enum!(Severity, "severity", {
    Mild => ("mild", "Mild"),
    Moderate => ("moderate", "Moderate"),
    Severe => ("severe", "Severe"),
});

/// Identifies one of the six inputs of the diagnosis form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FormField {
    Name,
    Age,
    Gender,
    Symptoms,
    Duration,
    Severity,
}

impl FormField {
    /// Render order of the form.
    pub const ALL: [FormField; 6] = [
        FormField::Name,
        FormField::Age,
        FormField::Gender,
        FormField::Symptoms,
        FormField::Duration,
        FormField::Severity,
    ];

    pub fn key(self) -> &'static str {
        match self {
            Self::Name => "name",
            Self::Age => "age",
            Self::Gender => "gender",
            Self::Symptoms => "symptoms",
            Self::Duration => "duration",
            Self::Severity => "severity",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Name => "Name",
            Self::Age => "Age",
            Self::Gender => "Gender",
            Self::Symptoms => "Symptoms",
            Self::Duration => "Duration of Symptoms",
            Self::Severity => "Severity",
        }
    }

    /// Whether the field's input control lets `value` through.
    ///
    /// The empty string is always accepted: it is how a control is cleared,
    /// and how a select shows its placeholder option.
    pub fn accepts(self, value: &str) -> bool {
        if value.is_empty() {
            return true;
        }
        match self {
            Self::Age => value.bytes().all(|b| b.is_ascii_digit()),
            Self::Gender => value.parse::<Gender>().is_ok(),
            Self::Severity => value.parse::<Severity>().is_ok(),
            Self::Name | Self::Symptoms | Self::Duration => true,
        }
    }
}

impl fmt::Display for FormField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_choice_keys_and_rejects_labels() {
        assert_eq!("female".parse::<Gender>(), Ok(Gender::Female));
        assert_eq!("severe".parse::<Severity>(), Ok(Severity::Severe));

        let err = "Male".parse::<Gender>().expect_err("labels are not keys");
        assert_eq!(err.kind, "gender");
        assert_eq!(err.to_string(), "'Male' is not a valid gender");
    }

    #[test]
    fn age_control_only_accepts_digits() {
        assert!(FormField::Age.accepts(""));
        assert!(FormField::Age.accepts("42"));
        assert!(!FormField::Age.accepts("-1"));
        assert!(!FormField::Age.accepts("4.5"));
        assert!(!FormField::Age.accepts("forty"));
    }

    #[test]
    fn select_controls_accept_placeholder_or_option_keys() {
        assert!(FormField::Gender.accepts(""));
        assert!(FormField::Gender.accepts("other"));
        assert!(!FormField::Gender.accepts("unknown"));
        assert!(FormField::Severity.accepts("moderate"));
        assert!(!FormField::Severity.accepts("critical"));
    }

    #[test]
    fn free_text_controls_accept_anything() {
        assert!(FormField::Symptoms.accepts("fever, cough\nheadache"));
        assert!(FormField::Duration.accepts("e.g., 2 days"));
        assert!(FormField::Name.accepts("  "));
    }
}
