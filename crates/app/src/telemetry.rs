//! Tracing setup.
//!
//! - `QUIZ_LOG` holds the filter directives (default `info`).
//! - `QUIZ_LOG_FORMAT` selects `pretty` (default) or `json`.
//!
//! Logs go to stderr; stdout belongs to the quiz itself.

use tracing_subscriber::EnvFilter;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum LogFormat {
    Pretty,
    Json,
}

impl LogFormat {
    /// Anything but `json` falls back to pretty output.
    fn from_setting(raw: Option<&str>) -> Self {
        match raw.map(str::trim) {
            Some(value) if value.eq_ignore_ascii_case("json") => Self::Json,
            _ => Self::Pretty,
        }
    }
}

pub fn init_tracing() {
    let filter = EnvFilter::try_from_env("QUIZ_LOG").unwrap_or_else(|_| EnvFilter::new("info"));

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_writer(std::io::stderr);

    let format = std::env::var("QUIZ_LOG_FORMAT").ok();
    match LogFormat::from_setting(format.as_deref()) {
        LogFormat::Json => builder.json().init(),
        LogFormat::Pretty => builder.pretty().init(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pretty_is_the_default_format() {
        assert_eq!(LogFormat::from_setting(None), LogFormat::Pretty);
        assert_eq!(LogFormat::from_setting(Some("")), LogFormat::Pretty);
        assert_eq!(LogFormat::from_setting(Some("pretty")), LogFormat::Pretty);
        assert_eq!(LogFormat::from_setting(Some("yaml")), LogFormat::Pretty);
    }

    #[test]
    fn json_is_selected_explicitly() {
        assert_eq!(LogFormat::from_setting(Some("json")), LogFormat::Json);
        assert_eq!(LogFormat::from_setting(Some(" JSON ")), LogFormat::Json);
    }
}
