use anyhow::Result;
use config::{Config, ConfigError, Environment};
use poise::serenity_prelude::{ChannelId, RoleId};
use serde::Deserialize;
use std::collections::HashSet;

/// Environment prefix, e.g. `BOT_TOKEN`, `BOT_ALERT_CHANNEL_ID`.
const ENV_PREFIX: &str = "BOT";

#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Discord's bot token
    pub token: String,
    /// Command prefix
    pub prefix: String,
    /// Channel for announcements
    pub announcement_channel_id: u64,
    /// General channel
    pub general_channel_id: u64,
    /// Channel for events
    pub event_channel_id: u64,
    /// Channel receiving the percepteur alerts
    pub alert_channel_id: u64,
    /// Role pinged in the alert message
    pub defender_role_id: u64,
    /// Comma separated role ids allowed to trigger alerts. Empty disables
    /// the role check and falls back to the manage-messages permission.
    allowed_role_ids: String,
    /// Port of the keep-alive web server
    pub web_port: u16,
    #[serde(skip)]
    allowed_roles: HashSet<RoleId>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            token: String::new(),
            prefix: String::from("!"),
            announcement_channel_id: 0,
            general_channel_id: 0,
            event_channel_id: 0,
            alert_channel_id: 0,
            defender_role_id: 1342890492463022121,
            allowed_role_ids: String::new(),
            web_port: 5000,
            allowed_roles: HashSet::new(),
        }
    }
}

impl Settings {
    pub fn new() -> Result<Self, ConfigError> {
        let s = Config::builder()
            // Settings come from the environment (with a prefix of BOT)
            // Eg.. `BOT_PREFIX=?` would set the `prefix` key
            .add_source(Environment::with_prefix(ENV_PREFIX))
            .build()?;

        // Deserialize entire configuration
        let mut settings: Settings = s.try_deserialize()?;
        settings.allowed_roles = parse_role_list(&settings.allowed_role_ids);
        Ok(settings)
    }

    /// Checks that all required settings have been overridden.
    /// A failure here is fatal, the gateway connection is never started.
    pub fn validate(&self) -> Result<()> {
        let mut errors = Vec::new();

        if self.token.is_empty() {
            errors.push("BOT_TOKEN is required".to_string());
        }
        for (name, id) in [
            ("BOT_ANNOUNCEMENT_CHANNEL_ID", self.announcement_channel_id),
            ("BOT_GENERAL_CHANNEL_ID", self.general_channel_id),
            ("BOT_EVENT_CHANNEL_ID", self.event_channel_id),
            ("BOT_ALERT_CHANNEL_ID", self.alert_channel_id),
        ] {
            if id == 0 {
                errors.push(format!("{} must be set", name));
            }
        }
        if self.defender_role_id == 0 {
            errors.push("BOT_DEFENDER_ROLE_ID must not be zero".to_string());
        }

        if errors.is_empty() {
            Ok(())
        } else {
            anyhow::bail!("invalid configuration: {}", errors.join(", "))
        }
    }

    /// Logs an overview of the loaded configuration.
    pub fn log_status(&self) {
        log::info!("Token configured: {}", !self.token.is_empty());
        log::info!("Prefix: {}", self.prefix);
        log::info!("Announcement channel: {}", self.announcement_channel_id);
        log::info!("General channel: {}", self.general_channel_id);
        log::info!("Event channel: {}", self.event_channel_id);
        log::info!("Alert channel: {}", self.alert_channel_id);
        log::info!("Allowed roles: {} role(s)", self.allowed_roles.len());
        log::info!("Keep-alive port: {}", self.web_port);
    }

    /// Channel receiving the percepteur alerts. Only valid after [`Self::validate`].
    pub fn alert_channel(&self) -> ChannelId {
        ChannelId::new(self.alert_channel_id)
    }

    /// Role pinged in the alert message.
    pub fn defender_role(&self) -> RoleId {
        RoleId::new(self.defender_role_id)
    }

    /// Roles allowed to trigger alerts. Empty means the role check is disabled.
    pub fn allowed_roles(&self) -> &HashSet<RoleId> {
        &self.allowed_roles
    }
}

/// Parses the comma separated `BOT_ALLOWED_ROLE_IDS` list, skipping
/// blank and malformed entries.
fn parse_role_list(raw: &str) -> HashSet<RoleId> {
    raw.split(',')
        .map(str::trim)
        .filter(|entry| !entry.is_empty())
        .filter_map(|entry| match entry.parse::<u64>() {
            Ok(id) if id != 0 => Some(RoleId::new(id)),
            _ => {
                log::warn!("Ignoring invalid role id '{}' in allowed role list", entry);
                None
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn role_list_parses_ids_and_skips_garbage() {
        let roles = parse_role_list("77, 1342890492463022121,,abc, 0 ");
        assert_eq!(roles.len(), 2);
        assert!(roles.contains(&RoleId::new(77)));
        assert!(roles.contains(&RoleId::new(1342890492463022121)));
    }

    #[test]
    fn empty_role_list_disables_the_check() {
        assert!(parse_role_list("").is_empty());
        assert!(parse_role_list(" , ").is_empty());
    }

    #[test]
    fn default_settings_fail_validation() {
        let err = Settings::default().validate().unwrap_err().to_string();
        assert!(err.contains("BOT_TOKEN"));
        assert!(err.contains("BOT_ALERT_CHANNEL_ID"));
    }

    #[test]
    fn overridden_settings_pass_validation() {
        let settings = Settings {
            token: "token".into(),
            announcement_channel_id: 1,
            general_channel_id: 2,
            event_channel_id: 3,
            alert_channel_id: 4,
            ..Settings::default()
        };
        assert!(settings.validate().is_ok());
        assert_eq!(settings.alert_channel(), ChannelId::new(4));
    }
}
