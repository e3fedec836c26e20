use std::fmt;

#[derive(Debug)]
pub enum EngineError {
    /// TOML parse / deserialization error.
    ConfigParse(String),
    /// Config validation error (bad threshold, bad weights, etc.).
    ConfigValidation(String),
    /// A field name is not one of the recognized field kinds.
    UnknownField(String),
    /// Input record parse error. `side` is "user" or "document".
    InputParse { side: &'static str, detail: String },
}

impl fmt::Display for EngineError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ConfigParse(msg) => write!(f, "config parse error: {msg}"),
            Self::ConfigValidation(msg) => write!(f, "config validation error: {msg}"),
            Self::UnknownField(name) => write!(
                f,
                "unknown field: '{name}' (expected one of: name, id_number, date_of_birth)"
            ),
            Self::InputParse { side, detail } => {
                write!(f, "{side} record parse error: {detail}")
            }
        }
    }
}

impl std::error::Error for EngineError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_messages() {
        let err = EngineError::UnknownField("aadhaar_no".into());
        assert!(err.to_string().contains("'aadhaar_no'"));
        assert!(err.to_string().contains("id_number"));

        let err = EngineError::InputParse {
            side: "document",
            detail: "expected a JSON object".into(),
        };
        assert_eq!(
            err.to_string(),
            "document record parse error: expected a JSON object"
        );
    }
}
