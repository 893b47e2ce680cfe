/// Error code registry for mc-ondemand
///
/// Error codes are organized by category:
/// - 1000-1999: Configuration document errors
/// - 7000-7999: Schema validation errors
/// - 8000-8999: Plan derivation errors
pub struct ErrorCode;

impl ErrorCode {
    // Configuration document errors (1000-1999)
    pub const CONFIG_GENERIC: u16 = 1000;
    pub const CONFIG_NOT_FOUND: u16 = 1001;
    pub const CONFIG_PARSE_ERROR: u16 = 1007;
    pub const CONFIG_VALIDATION_FAILED: u16 = 1008;
    pub const CONFIG_RESOLVE_FAILED: u16 = 1010;

    // Validation errors (7000-7999)
    pub const VALIDATION_GENERIC: u16 = 7000;
    pub const VALIDATION_REQUIRED_FIELD: u16 = 7001;
    pub const VALIDATION_INVALID_TYPE: u16 = 7002;
    pub const VALIDATION_OUT_OF_RANGE: u16 = 7003;
    pub const VALIDATION_INCOMPLETE_GROUP: u16 = 7006;
    pub const VALIDATION_DUPLICATE_VALUE: u16 = 7007;

    // Plan errors (8000-8999)
    pub const PLAN_GENERIC: u16 = 8000;
    pub const PLAN_INSUFFICIENT_MEMORY: u16 = 8001;
}

/// Get a human-readable description for an error code
pub fn describe_error_code(code: u16) -> &'static str {
    match code {
        // Configuration errors
        ErrorCode::CONFIG_GENERIC => "Generic configuration error",
        ErrorCode::CONFIG_NOT_FOUND => "Configuration file could not be read",
        ErrorCode::CONFIG_PARSE_ERROR => "Configuration file is not valid YAML",
        ErrorCode::CONFIG_VALIDATION_FAILED => "Configuration validation failed",
        ErrorCode::CONFIG_RESOLVE_FAILED => "External identifier could not be resolved",

        // Validation errors
        ErrorCode::VALIDATION_GENERIC => "Generic validation error",
        ErrorCode::VALIDATION_REQUIRED_FIELD => "Required field is missing",
        ErrorCode::VALIDATION_INVALID_TYPE => "Invalid data type",
        ErrorCode::VALIDATION_OUT_OF_RANGE => "Value out of allowed range",
        ErrorCode::VALIDATION_INCOMPLETE_GROUP => "Optional group is only partially specified",
        ErrorCode::VALIDATION_DUPLICATE_VALUE => "Field supplied under more than one name",

        // Plan errors
        ErrorCode::PLAN_GENERIC => "Generic plan derivation error",
        ErrorCode::PLAN_INSUFFICIENT_MEMORY => "Task memory too small for the watchdog overhead",

        _ => "Unknown error code",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_code_ranges() {
        assert!(ErrorCode::CONFIG_GENERIC >= 1000 && ErrorCode::CONFIG_GENERIC < 2000);
        assert!(ErrorCode::VALIDATION_GENERIC >= 7000 && ErrorCode::VALIDATION_GENERIC < 8000);
        assert!(ErrorCode::PLAN_GENERIC >= 8000 && ErrorCode::PLAN_GENERIC < 9000);
    }

    #[test]
    fn test_error_code_descriptions() {
        assert_eq!(
            describe_error_code(ErrorCode::CONFIG_PARSE_ERROR),
            "Configuration file is not valid YAML"
        );
        assert_eq!(
            describe_error_code(ErrorCode::PLAN_INSUFFICIENT_MEMORY),
            "Task memory too small for the watchdog overhead"
        );
        assert_eq!(describe_error_code(65535), "Unknown error code");
    }

    #[test]
    fn test_generic_codes_are_described() {
        for code in [
            ErrorCode::CONFIG_GENERIC,
            ErrorCode::VALIDATION_GENERIC,
            ErrorCode::PLAN_GENERIC,
        ] {
            assert!(describe_error_code(code).starts_with("Generic "));
        }
    }
}
