//! Operator-facing console lines. Diagnostics go to the log file through `tracing`.
//!
//! Every line starts with a fixed-width coloured tag so that relayed event
//! lines stay aligned beneath the banner.

#[doc(hidden)]
#[macro_export]
macro_rules! console_tag {
    ($tag:literal, $color:ident) => {
        $crate::Colorize::bold($crate::Colorize::$color($tag))
    };
}

#[macro_export]
macro_rules! success_message {
    ($($arg:tt)*) => {
        println!("{} {}", $crate::console_tag!("[SUCCESS]", green), format_args!($($arg)*))
    };
}

/// Written to stderr so that failures stay visible when stdout is piped.
#[macro_export]
macro_rules! error_message {
    ($($arg:tt)*) => {
        eprintln!("{} {}", $crate::console_tag!("  [ERROR]", red), format_args!($($arg)*))
    };
}

#[macro_export]
macro_rules! warning_message {
    ($($arg:tt)*) => {
        println!("{} {}", $crate::console_tag!("[WARNING]", yellow), format_args!($($arg)*))
    };
}

#[macro_export]
macro_rules! info_message {
    ($($arg:tt)*) => {
        println!("{} {}", $crate::console_tag!("   [INFO]", cyan), format_args!($($arg)*))
    };
}
