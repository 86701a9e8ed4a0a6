use std::env;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Environment {
    #[default]
    Development,
    Production,
}

/// Resolves the runtime environment from `ENV`, falling back to the build profile.
pub fn which() -> Environment {
    #[cfg(debug_assertions)]
    let default_env = Environment::Development;
    #[cfg(not(debug_assertions))]
    let default_env = Environment::Production;

    match env::var("ENV") {
        Err(_) => default_env,
        Ok(v) => parse(&v).unwrap_or(default_env),
    }
}

fn parse(value: &str) -> Option<Environment> {
    match value.to_ascii_lowercase().as_str() {
        "development" | "dev" => Some(Environment::Development),
        "production" | "prod" => Some(Environment::Production),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("development", Some(Environment::Development))]
    #[case("DEV", Some(Environment::Development))]
    #[case("production", Some(Environment::Production))]
    #[case("prod", Some(Environment::Production))]
    #[case("staging", None)]
    fn parses_environment_names(#[case] input: &str, #[case] expected: Option<Environment>) {
        assert_eq!(parse(input), expected);
    }
}
