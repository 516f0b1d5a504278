//! The notification admin page: table, both modals and the config cache.
use anyhow::{Context, Result};
use tracing::{debug, info, instrument};

use crate::api::AdminApi;
use crate::config_modal::{ConfigKey, ConfigModal, ConfigSaveOutcome, ConfigSet};
use crate::notice::Notifier;
use crate::notification_modal::{NotificationModal, SubmitOutcome};
use crate::table::{NotificationTable, TableData};

/// Result of fetching a page and opening one of its rows for editing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditTarget {
    Opened,
    /// The list request came back with a non-zero code.
    ListRejected(u32),
    NotOnPage(u32),
}

pub struct NotificationPage<A, N> {
    api: A,
    notifier: N,
    configs: ConfigSet,
    table: NotificationTable,
    notification_modal: NotificationModal,
    config_modal: ConfigModal,
}

impl<A: AdminApi, N: Notifier> NotificationPage<A, N> {
    pub fn new(api: A, notifier: N) -> Self {
        Self {
            api,
            notifier,
            configs: ConfigSet::default(),
            table: NotificationTable::new(),
            notification_modal: NotificationModal::default(),
            config_modal: ConfigModal::default(),
        }
    }

    pub fn api(&self) -> &A {
        &self.api
    }

    pub fn configs(&self) -> &ConfigSet {
        &self.configs
    }

    pub fn table(&self) -> &NotificationTable {
        &self.table
    }

    pub fn notification_modal(&self) -> &NotificationModal {
        &self.notification_modal
    }

    pub fn notification_modal_mut(&mut self) -> &mut NotificationModal {
        &mut self.notification_modal
    }

    pub fn config_modal(&self) -> &ConfigModal {
        &self.config_modal
    }

    pub fn config_modal_mut(&mut self) -> &mut ConfigModal {
        &mut self.config_modal
    }

    /// Load the config set, then the first page of the table.
    #[instrument(skip_all)]
    pub async fn mount(&mut self, page_size: Option<u32>) -> Result<Option<TableData>> {
        self.fetch_configs().await?;
        self.table.request(&self.api, None, page_size).await
    }

    /// Replace the cached config set. A rejected fetch keeps the old one.
    pub async fn fetch_configs(&mut self) -> Result<bool> {
        let res = self
            .api
            .get_configs()
            .await
            .context("failed to fetch configs")?;
        if !res.is_ok() {
            debug!(code = res.code, "config fetch rejected");
            return Ok(false);
        }
        self.configs = ConfigSet::new(res.data.unwrap_or_default());
        debug!(entries = self.configs.entries().len(), "configs loaded");
        Ok(true)
    }

    pub async fn change_page(
        &mut self,
        page: Option<u32>,
        page_size: Option<u32>,
    ) -> Result<Option<TableData>> {
        self.table.request(&self.api, page, page_size).await
    }

    pub fn open_create(&mut self) {
        self.notification_modal.open_create();
    }

    /// Open the edit form for a row currently on screen.
    pub fn open_edit(&mut self, id: i64) -> bool {
        match self.table.row(id) {
            Some(record) => {
                self.notification_modal.open_edit(record);
                true
            }
            None => false,
        }
    }

    /// Fetch the given page, then open the edit form for `id` if it is listed.
    pub async fn open_edit_on_page(
        &mut self,
        page: Option<u32>,
        page_size: Option<u32>,
        id: i64,
    ) -> Result<EditTarget> {
        let listed = self.change_page(page, page_size).await?;
        let page_no = self.table.query().page;
        if listed.is_none() {
            return Ok(EditTarget::ListRejected(page_no));
        }
        if !self.open_edit(id) {
            return Ok(EditTarget::NotOnPage(page_no));
        }
        Ok(EditTarget::Opened)
    }

    pub fn cancel_notification(&mut self) {
        self.notification_modal.cancel();
    }

    #[instrument(skip_all)]
    pub async fn submit_notification(&mut self) -> Result<SubmitOutcome> {
        let outcome = self
            .notification_modal
            .submit(&self.api, &self.notifier)
            .await?;
        if outcome.is_saved() {
            self.table.reload(&self.api).await?;
        }
        Ok(outcome)
    }

    pub async fn delete(&mut self, id: i64) -> Result<bool> {
        self.table.delete(&self.api, &self.notifier, id).await
    }

    pub fn open_config(&mut self, key: ConfigKey) {
        self.config_modal.open_for(key, &self.configs);
    }

    pub fn open_shop_introduce(&mut self) {
        self.open_config(ConfigKey::ShopIntroduce);
    }

    pub fn open_user_introduce(&mut self) {
        self.open_config(ConfigKey::UserIntroduce);
    }

    pub fn cancel_config(&mut self) {
        self.config_modal.cancel();
    }

    #[instrument(skip_all)]
    pub async fn submit_config(&mut self) -> Result<ConfigSaveOutcome> {
        let outcome = self.config_modal.submit(&self.api, &self.notifier).await?;
        if outcome == ConfigSaveOutcome::Saved {
            self.fetch_configs().await?;
            info!("config set refreshed");
        }
        Ok(outcome)
    }
}
