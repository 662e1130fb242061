//! Custom assertion macros and utilities
//!
//! Provides enhanced assertion macros for better test output and
//! more descriptive error messages.

/// Assert that a result is ok and return the value
#[macro_export]
macro_rules! assert_ok {
    ($result:expr) => {
        match $result {
            Ok(value) => value,
            Err(e) => panic!("Expected Ok, got Err: {:?}", e),
        }
    };
    ($result:expr, $message:expr) => {
        match $result {
            Ok(value) => value,
            Err(e) => panic!("{}: {:?}", $message, e),
        }
    };
}

/// Assert that a string contains a substring
#[macro_export]
macro_rules! assert_contains {
    ($haystack:expr, $needle:expr) => {
        assert!(
            $haystack.contains($needle),
            "Expected '{}' to contain '{}'",
            $haystack,
            $needle
        );
    };
}

/// Assert an error response: status code plus the `{"error", "status"}` body
#[macro_export]
macro_rules! assert_error_response {
    ($response:expr, $status:expr) => {{
        let response = &$response;
        assert_eq!(response.status, $status, "unexpected status, body: {}", response.body);
        assert_eq!(response.body["status"], $status.as_u16());
        assert!(response.body["error"].is_string(), "missing error message: {}", response.body);
    }};
    ($response:expr, $status:expr, $message:expr) => {{
        $crate::assert_error_response!($response, $status);
        assert_eq!($response.body["error"], $message);
    }};
}
