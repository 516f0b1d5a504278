//! The two long-form texts edited from the page header.
use anyhow::{Context, Result};
use std::fmt;
use std::str::FromStr;
use tracing::{info, instrument, warn};

use crate::api::AdminApi;
use crate::model::ConfigEntry;
use crate::notice::{Notifier, MSG_SAVED, MSG_SAVE_FAILED};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigKey {
    ShopIntroduce,
    UserIntroduce,
}

impl ConfigKey {
    pub fn name(&self) -> &'static str {
        match self {
            ConfigKey::ShopIntroduce => "shop_introduce",
            ConfigKey::UserIntroduce => "user_introduce",
        }
    }

    /// Modal title.
    pub fn title(&self) -> &'static str {
        match self {
            ConfigKey::ShopIntroduce => "商城说明",
            ConfigKey::UserIntroduce => "用户中心说明",
        }
    }
}

impl fmt::Display for ConfigKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for ConfigKey {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "shop" | "shop_introduce" => Ok(ConfigKey::ShopIntroduce),
            "user" | "user_introduce" => Ok(ConfigKey::UserIntroduce),
            other => Err(format!("unknown config key '{}'", other)),
        }
    }
}

/// In-memory copy of the backend's configuration entries.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConfigSet {
    entries: Vec<ConfigEntry>,
}

impl ConfigSet {
    pub fn new(entries: Vec<ConfigEntry>) -> Self {
        Self { entries }
    }

    pub fn entries(&self) -> &[ConfigEntry] {
        &self.entries
    }

    /// First entry with exactly this name.
    pub fn get(&self, name: &str) -> Option<&ConfigEntry> {
        self.entries.iter().find(|c| c.name == name)
    }

    pub fn value_of(&self, name: &str) -> Option<&str> {
        self.get(name).and_then(|c| c.value.as_deref())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigSaveOutcome {
    Saved,
    Rejected(i64),
    /// Nothing to save; the modal was not open.
    NotOpen,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConfigModal {
    open: bool,
    title: String,
    key: Option<ConfigKey>,
    content: Option<String>,
}

impl ConfigModal {
    pub fn is_open(&self) -> bool {
        self.open
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn key(&self) -> Option<ConfigKey> {
        self.key
    }

    pub fn content(&self) -> Option<&str> {
        self.content.as_deref()
    }

    pub fn open_for(&mut self, key: ConfigKey, configs: &ConfigSet) {
        self.open = true;
        self.title = key.title().to_string();
        self.key = Some(key);
        self.content = configs.value_of(key.name()).map(str::to_string);
    }

    pub fn set_content(&mut self, content: impl Into<String>) {
        self.content = Some(content.into());
    }

    pub fn cancel(&mut self) {
        *self = Self::default();
    }

    /// Write the edited value back as a single-entry update.
    #[instrument(skip_all)]
    pub async fn submit(
        &mut self,
        api: &dyn AdminApi,
        notifier: &dyn Notifier,
    ) -> Result<ConfigSaveOutcome> {
        let key = match (self.open, self.key) {
            (true, Some(key)) => key,
            _ => return Ok(ConfigSaveOutcome::NotOpen),
        };
        let entry = ConfigEntry::new(key.name(), self.content.clone());
        let res = api
            .put_configs(std::slice::from_ref(&entry))
            .await
            .with_context(|| format!("failed to save config {}", key))?;
        if !res.is_ok() {
            warn!(code = res.code, %key, "config save rejected");
            notifier.error(MSG_SAVE_FAILED);
            return Ok(ConfigSaveOutcome::Rejected(res.code));
        }
        info!(%key, "config saved");
        self.cancel();
        notifier.success(MSG_SAVED);
        Ok(ConfigSaveOutcome::Saved)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn configs() -> ConfigSet {
        ConfigSet::new(vec![
            ConfigEntry::new("shop_introduce", Some("first".into())),
            ConfigEntry::new("shop_introduce", Some("second".into())),
            ConfigEntry::new("Shop_Introduce", Some("other".into())),
        ])
    }

    #[test]
    fn value_of_returns_first_exact_match() {
        assert_eq!(configs().value_of("shop_introduce"), Some("first"));
        assert_eq!(configs().value_of("user_introduce"), None);
        assert_eq!(configs().value_of("shop"), None);
    }

    #[test]
    fn open_for_missing_key_has_no_content() {
        let mut modal = ConfigModal::default();
        modal.open_for(ConfigKey::UserIntroduce, &configs());
        assert!(modal.is_open());
        assert_eq!(modal.title(), "用户中心说明");
        assert_eq!(modal.content(), None);
    }

    #[test]
    fn open_for_seeds_value() {
        let mut modal = ConfigModal::default();
        modal.open_for(ConfigKey::ShopIntroduce, &configs());
        assert_eq!(modal.key(), Some(ConfigKey::ShopIntroduce));
        assert_eq!(modal.content(), Some("first"));
        modal.cancel();
        assert_eq!(modal, ConfigModal::default());
    }

    #[test]
    fn parse_key() {
        assert_eq!("shop".parse::<ConfigKey>().unwrap(), ConfigKey::ShopIntroduce);
        assert_eq!(
            "user_introduce".parse::<ConfigKey>().unwrap(),
            ConfigKey::UserIntroduce
        );
        assert!("other".parse::<ConfigKey>().is_err());
    }
}
