//! Logging macros taking `Code` constants and `"key" => value` context pairs
//!
//! Context values only need `Display`. Error and warning macros accept an
//! optional `path = <TokenPath>` naming the token the event is about.

/// Log an error with a registered code
#[macro_export]
macro_rules! log_error {
    ($code:expr, $message:expr) => {
        $crate::logging::log_error_with_context($code, $message, None, vec![])
    };

    ($code:expr, $message:expr, path = $path:expr) => {
        $crate::logging::log_error_with_context($code, $message, Some($path), vec![])
    };

    ($code:expr, $message:expr, $($key:expr => $value:expr),+) => {
        {
            let context_strings: Vec<(&str, String)> = vec![$(($key, format!("{}", $value))),+];
            let context_refs: Vec<(&str, &str)> = context_strings.iter()
                .map(|(k, v)| (*k, v.as_str()))
                .collect();
            $crate::logging::log_error_with_context($code, $message, None, context_refs)
        }
    };

    ($code:expr, $message:expr, path = $path:expr, $($key:expr => $value:expr),+) => {
        {
            let context_strings: Vec<(&str, String)> = vec![$(($key, format!("{}", $value))),+];
            let context_refs: Vec<(&str, &str)> = context_strings.iter()
                .map(|(k, v)| (*k, v.as_str()))
                .collect();
            $crate::logging::log_error_with_context($code, $message, Some($path), context_refs)
        }
    };
}

/// Log a recoverable problem with a registered code
#[macro_export]
macro_rules! log_warning {
    ($code:expr, $message:expr) => {
        $crate::logging::log_warning_with_context($code, $message, None, vec![])
    };

    ($code:expr, $message:expr, path = $path:expr) => {
        $crate::logging::log_warning_with_context($code, $message, Some($path), vec![])
    };

    ($code:expr, $message:expr, $($key:expr => $value:expr),+) => {
        {
            let context_strings: Vec<(&str, String)> = vec![$(($key, format!("{}", $value))),+];
            let context_refs: Vec<(&str, &str)> = context_strings.iter()
                .map(|(k, v)| (*k, v.as_str()))
                .collect();
            $crate::logging::log_warning_with_context($code, $message, None, context_refs)
        }
    };

    ($code:expr, $message:expr, path = $path:expr, $($key:expr => $value:expr),+) => {
        {
            let context_strings: Vec<(&str, String)> = vec![$(($key, format!("{}", $value))),+];
            let context_refs: Vec<(&str, &str)> = context_strings.iter()
                .map(|(k, v)| (*k, v.as_str()))
                .collect();
            $crate::logging::log_warning_with_context($code, $message, Some($path), context_refs)
        }
    };
}

/// Log a stage milestone with a success code
#[macro_export]
macro_rules! log_success {
    ($code:expr, $message:expr) => {
        $crate::logging::log_success_with_context($code, $message, vec![])
    };

    ($code:expr, $message:expr, $($key:expr => $value:expr),+) => {
        {
            let context_strings: Vec<(&str, String)> = vec![$(($key, format!("{}", $value))),+];
            let context_refs: Vec<(&str, &str)> = context_strings.iter()
                .map(|(k, v)| (*k, v.as_str()))
                .collect();
            $crate::logging::log_success_with_context($code, $message, context_refs)
        }
    };
}

/// Log informational message
#[macro_export]
macro_rules! log_info {
    ($message:expr) => {
        $crate::logging::log_info_with_context($message, vec![])
    };

    ($message:expr, $($key:expr => $value:expr),+) => {
        {
            let context_strings: Vec<(&str, String)> = vec![$(($key, format!("{}", $value))),+];
            let context_refs: Vec<(&str, &str)> = context_strings.iter()
                .map(|(k, v)| (*k, v.as_str()))
                .collect();
            $crate::logging::log_info_with_context($message, context_refs)
        }
    };
}

/// Log debug message; context is only formatted when debug output is enabled
#[macro_export]
macro_rules! log_debug {
    ($message:expr) => {
        if $crate::logging::config::get_min_log_level() >= $crate::logging::LogLevel::Debug {
            $crate::logging::log_debug_with_context($message, vec![])
        }
    };

    ($message:expr, $($key:expr => $value:expr),+) => {
        if $crate::logging::config::get_min_log_level() >= $crate::logging::LogLevel::Debug {
            let context_strings: Vec<(&str, String)> = vec![$(($key, format!("{}", $value))),+];
            let context_refs: Vec<(&str, &str)> = context_strings.iter()
                .map(|(k, v)| (*k, v.as_str()))
                .collect();
            $crate::logging::log_debug_with_context($message, context_refs)
        }
    };
}

#[cfg(test)]
mod tests {
    use crate::logging::codes;
    use crate::utils::TokenPath;

    // The macros must expand in every supported form
    #[test]
    fn test_macro_forms_expand() {
        let path = TokenPath::from(["basis", "text", "font-size"]);
        let actual = 10.0_f64;

        log_error!(codes::system::INTERNAL_ERROR, "plain");
        log_error!(codes::system::INTERNAL_ERROR, "with path", path = path.clone());
        log_error!(codes::system::INTERNAL_ERROR, "with ctx", "actual" => actual);
        log_error!(
            codes::system::INTERNAL_ERROR,
            "with both",
            path = path.clone(),
            "actual" => actual,
            "minimum" => 16
        );

        log_warning!(codes::codecs::UNPARSEABLE_COLOR, "plain");
        log_warning!(codes::codecs::UNPARSEABLE_COLOR, "with path", path = path.clone());
        log_warning!(codes::codecs::UNPARSEABLE_COLOR, "with ctx", "value" => "blurple");
        log_warning!(
            codes::codecs::UNPARSEABLE_COLOR,
            "with both",
            path = path,
            "value" => "blurple"
        );

        log_success!(codes::success::PIPELINE_COMPLETE, "done");
        log_success!(codes::success::PIPELINE_COMPLETE, "done", "issues" => 0);
        log_info!("info");
        log_info!("info", "tokens" => 3);
        log_debug!("debug");
        log_debug!("debug", "depth" => 2);
    }
}
