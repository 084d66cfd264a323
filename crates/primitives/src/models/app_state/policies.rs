use eyre::{eyre, Report};
use serde::{Deserialize, Serialize};
use std::env;
use std::str::FromStr;
use strum::{Display, EnumString};

/// What signing in does to the code that was just checked.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, Display, EnumString)]
#[strum(serialize_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum OtpSigninPolicy {
    /// The code stays usable until it expires.
    #[default]
    ReuseWithinWindow,
    ConsumeOnSignin,
}

/// How repeated free grants of the same title to one user are treated.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, Display, EnumString)]
#[strum(serialize_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum FreeTicketPolicy {
    #[default]
    PerRequest,
    /// A second grant reports the ticket that already exists.
    OncePerUser,
}

pub(crate) fn policy_from_env<T>(key: &str) -> Result<T, Report>
where
    T: FromStr + Default,
{
    match env::var(key) {
        Ok(raw) if !raw.trim().is_empty() => T::from_str(raw.trim())
            .map_err(|_| eyre!("{} has an unsupported value: {}", key, raw)),
        _ => Ok(T::default()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn policies_parse_snake_case() {
        assert_eq!(
            OtpSigninPolicy::from_str("consume_on_signin").unwrap(),
            OtpSigninPolicy::ConsumeOnSignin
        );
        assert_eq!(
            FreeTicketPolicy::from_str("once_per_user").unwrap(),
            FreeTicketPolicy::OncePerUser
        );
        assert!(FreeTicketPolicy::from_str("sometimes").is_err());
    }

    #[test]
    fn defaults_match_original_behaviour() {
        assert_eq!(OtpSigninPolicy::default(), OtpSigninPolicy::ReuseWithinWindow);
        assert_eq!(FreeTicketPolicy::default(), FreeTicketPolicy::PerRequest);
        assert_eq!(OtpSigninPolicy::ReuseWithinWindow.to_string(), "reuse_within_window");
    }
}
