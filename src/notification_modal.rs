//! Create/edit form for a single notification.
use anyhow::{Context, Result};
use tracing::{debug, info, instrument};

use crate::api::AdminApi;
use crate::model::{NotificationRecord, NotificationStatus, SORT_MAX, SORT_MIN};
use crate::notice::{Notifier, MSG_MISSING_FIELDS};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubmitOutcome {
    /// Title or content missing; nothing was sent.
    Invalid,
    Created,
    Updated,
    /// Backend answered with a non-zero code.
    Rejected(i64),
    /// Nothing to save; the modal was not open.
    NotOpen,
}

impl SubmitOutcome {
    pub fn is_saved(&self) -> bool {
        matches!(self, SubmitOutcome::Created | SubmitOutcome::Updated)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NotificationModal {
    open: bool,
    info: Option<NotificationRecord>,
}

impl NotificationModal {
    pub fn is_open(&self) -> bool {
        self.open
    }

    pub fn info(&self) -> Option<&NotificationRecord> {
        self.info.as_ref()
    }

    pub fn is_editing(&self) -> bool {
        self.open && self.info.as_ref().is_some_and(|r| r.id.is_some())
    }

    pub fn open_create(&mut self) {
        self.open = true;
        self.info = Some(NotificationRecord::blank());
    }

    pub fn open_edit(&mut self, record: &NotificationRecord) {
        self.open = true;
        self.info = Some(record.clone());
    }

    pub fn cancel(&mut self) {
        self.open = false;
        self.info = None;
    }

    fn info_mut(&mut self) -> &mut NotificationRecord {
        self.info.get_or_insert_with(NotificationRecord::blank)
    }

    pub fn set_title(&mut self, title: impl Into<String>) {
        self.info_mut().title = title.into();
    }

    pub fn set_content(&mut self, content: impl Into<String>) {
        self.info_mut().content = content.into();
    }

    pub fn set_status(&mut self, status: NotificationStatus) {
        self.info_mut().status = status;
    }

    pub fn set_sort(&mut self, sort: i64) {
        self.info_mut().sort = sort.clamp(SORT_MIN, SORT_MAX);
    }

    /// Validate and send the form. Create vs update is decided by the
    /// presence of an id. On success the form closes with a fresh create seed.
    #[instrument(skip_all)]
    pub async fn submit(
        &mut self,
        api: &dyn AdminApi,
        notifier: &dyn Notifier,
    ) -> Result<SubmitOutcome> {
        if !self.open {
            return Ok(SubmitOutcome::NotOpen);
        }
        let record = match &self.info {
            Some(r) if !r.title.is_empty() && !r.content.is_empty() => r,
            _ => {
                notifier.warning(MSG_MISSING_FIELDS);
                return Ok(SubmitOutcome::Invalid);
            }
        };

        let (res, outcome) = match record.id {
            Some(id) => {
                let res = api
                    .update_notification(record)
                    .await
                    .with_context(|| format!("failed to update notification {}", id))?;
                (res, SubmitOutcome::Updated)
            }
            None => {
                let res = api
                    .create_notification(&record.to_new())
                    .await
                    .context("failed to create notification")?;
                (res, SubmitOutcome::Created)
            }
        };

        if !res.is_ok() {
            debug!(code = res.code, message = ?res.message, "notification save rejected");
            return Ok(SubmitOutcome::Rejected(res.code));
        }

        info!(?outcome, title = %record.title, "notification saved");
        self.open = false;
        self.info = Some(NotificationRecord::blank());
        Ok(outcome)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn create_seed() {
        let mut modal = NotificationModal::default();
        assert!(!modal.is_open());
        modal.open_create();
        let info = modal.info().unwrap();
        assert!(modal.is_open());
        assert!(!modal.is_editing());
        assert_eq!(info.title, "");
        assert_eq!(info.status, NotificationStatus::Online);
        assert_eq!(info.sort, 1);
    }

    #[test]
    fn sort_is_clamped() {
        let mut modal = NotificationModal::default();
        modal.open_create();
        modal.set_sort(0);
        assert_eq!(modal.info().unwrap().sort, SORT_MIN);
        modal.set_sort(5_000_000);
        assert_eq!(modal.info().unwrap().sort, SORT_MAX);
    }

    #[test]
    fn cancel_drops_record() {
        let mut modal = NotificationModal::default();
        let mut record = NotificationRecord::blank();
        record.id = Some(3);
        modal.open_edit(&record);
        assert!(modal.is_editing());
        modal.cancel();
        assert!(!modal.is_open());
        assert!(modal.info().is_none());
    }
}
