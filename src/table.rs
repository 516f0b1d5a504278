use anyhow::{Context, Result};
use tracing::{debug, instrument};

use crate::api::AdminApi;
use crate::model::{ListQuery, NotificationRecord};
use crate::notice::{Notifier, MSG_DELETED};

/// What the table widget consumes after a fetch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableData {
    pub data: Vec<NotificationRecord>,
    pub total: u64,
    pub success: bool,
}

/// Server-paginated notification table.
#[derive(Debug, Clone, Default)]
pub struct NotificationTable {
    query: ListQuery,
    rows: Vec<NotificationRecord>,
    total: u64,
    requests: u64,
}

impl NotificationTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn query(&self) -> ListQuery {
        self.query
    }

    pub fn rows(&self) -> &[NotificationRecord] {
        &self.rows
    }

    pub fn total(&self) -> u64 {
        self.total
    }

    /// Number of list requests issued so far, reloads included.
    pub fn requests(&self) -> u64 {
        self.requests
    }

    pub fn row(&self, id: i64) -> Option<&NotificationRecord> {
        self.rows.iter().find(|r| r.id == Some(id))
    }

    /// Fetch one page. Unset paging falls back to page 1 of 10. A non-zero
    /// response code leaves the previously displayed rows in place.
    #[instrument(skip(self, api))]
    pub async fn request(
        &mut self,
        api: &dyn AdminApi,
        page: Option<u32>,
        page_size: Option<u32>,
    ) -> Result<Option<TableData>> {
        let query = ListQuery::from_params(page, page_size);
        self.query = query;
        self.requests += 1;
        let res = api
            .list_notifications(query)
            .await
            .context("failed to list notifications")?;
        if !res.is_ok() {
            debug!(code = res.code, "list rejected; keeping stale rows");
            return Ok(None);
        }
        let page = res.data.unwrap_or_default();
        self.rows = page.rows;
        self.total = page.count;
        Ok(Some(TableData {
            data: self.rows.clone(),
            total: self.total,
            success: true,
        }))
    }

    /// Re-fetch the current page.
    pub async fn reload(&mut self, api: &dyn AdminApi) -> Result<Option<TableData>> {
        let ListQuery { page, page_size } = self.query;
        self.request(api, Some(page), Some(page_size)).await
    }

    /// Delete a row by id. Returns whether the backend accepted it.
    #[instrument(skip(self, api, notifier))]
    pub async fn delete(
        &mut self,
        api: &dyn AdminApi,
        notifier: &dyn Notifier,
        id: i64,
    ) -> Result<bool> {
        let res = api
            .delete_notification(id)
            .await
            .context("failed to delete notification")?;
        if !res.is_ok() {
            debug!(code = res.code, "delete rejected");
            return Ok(false);
        }
        notifier.success(MSG_DELETED);
        self.reload(api).await?;
        Ok(true)
    }
}
