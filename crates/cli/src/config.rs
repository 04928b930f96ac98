use garage_core::policy::{CarPolicy, HorsePowerBounds};

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("{var} must be {expected}, got {value:?}")]
    Invalid {
        var: &'static str,
        expected: &'static str,
        value: String,
    },

    #[error("horsepower minimum ({min}) must not exceed maximum ({max})")]
    InvertedBounds { min: i64, max: i64 },
}

/// Load the car policy from environment variables.
///
/// `CAR_POLICY` picks the base preset; the remaining variables override
/// individual settings of that preset.
///
/// | Env Var                       | Default                          |
/// |-------------------------------|----------------------------------|
/// | `CAR_POLICY`                  | `permissive` (or `strict`)       |
/// | `CAR_HORSE_POWERS_MIN`        | preset (`1` / `20`)              |
/// | `CAR_HORSE_POWERS_MAX`        | preset (`1914` / `100`)          |
/// | `CAR_DESCRIPTION_ALLOW_NULL`  | `true`                           |
/// | `CAR_DESCRIPTION_ALLOW_BLANK` | preset (`true` / `false`)        |
/// | `CAR_TRIM_WHITESPACE`         | `true`                           |
pub fn policy_from_env() -> Result<CarPolicy, ConfigError> {
    policy_from_lookup(|key| std::env::var(key).ok())
}

/// Same as [`policy_from_env`], reading values through `lookup`.
pub fn policy_from_lookup<F>(lookup: F) -> Result<CarPolicy, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    let mut policy = match lookup("CAR_POLICY").as_deref().map(str::trim) {
        None | Some("") | Some("permissive") => CarPolicy::permissive(),
        Some("strict") => CarPolicy::strict(),
        Some(other) => {
            return Err(ConfigError::Invalid {
                var: "CAR_POLICY",
                expected: "`strict` or `permissive`",
                value: other.to_string(),
            })
        }
    };

    let min = parse_int(&lookup, "CAR_HORSE_POWERS_MIN")?.unwrap_or(policy.horse_powers.min());
    let max = parse_int(&lookup, "CAR_HORSE_POWERS_MAX")?.unwrap_or(policy.horse_powers.max());
    policy.horse_powers =
        HorsePowerBounds::new(min, max).ok_or(ConfigError::InvertedBounds { min, max })?;

    if let Some(allow_null) = parse_bool(&lookup, "CAR_DESCRIPTION_ALLOW_NULL")? {
        policy.description.allow_null = allow_null;
    }
    if let Some(allow_blank) = parse_bool(&lookup, "CAR_DESCRIPTION_ALLOW_BLANK")? {
        policy.description.allow_blank = allow_blank;
    }
    if let Some(trim) = parse_bool(&lookup, "CAR_TRIM_WHITESPACE")? {
        policy.trim_whitespace = trim;
    }

    Ok(policy)
}

fn parse_int<F>(lookup: &F, var: &'static str) -> Result<Option<i64>, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    match lookup(var) {
        None => Ok(None),
        Some(raw) => raw
            .trim()
            .parse()
            .map(Some)
            .map_err(|_| ConfigError::Invalid {
                var,
                expected: "an integer",
                value: raw,
            }),
    }
}

fn parse_bool<F>(lookup: &F, var: &'static str) -> Result<Option<bool>, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    let Some(raw) = lookup(var) else {
        return Ok(None);
    };
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(Some(true)),
        "0" | "false" | "no" | "off" => Ok(Some(false)),
        _ => Err(ConfigError::Invalid {
            var,
            expected: "a boolean",
            value: raw,
        }),
    }
}
