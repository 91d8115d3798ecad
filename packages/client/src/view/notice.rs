//! Short-lived inline notices.
//!
//! A notice replaces whatever was shown before and clears itself after
//! [`NOTICE_TIMEOUT`]. A timer never clears a newer notice.

use std::{
    sync::{
        Arc,
        atomic::{AtomicU64, Ordering},
    },
    time::Duration,
};

use tokio::sync::watch;

use crate::error::ClientError;

pub const NOTICE_TIMEOUT: Duration = Duration::from_secs(5);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeKind {
    Info,
    Error,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub id: u64,
    pub kind: NoticeKind,
    pub text: String,
}

pub struct NoticeBoard {
    current: Arc<watch::Sender<Option<Notice>>>,
    next_id: AtomicU64,
    timeout: Duration,
}

impl NoticeBoard {
    pub fn new() -> Self {
        Self::with_timeout(NOTICE_TIMEOUT)
    }

    pub fn with_timeout(timeout: Duration) -> Self {
        let (current, _) = watch::channel(None);
        Self {
            current: Arc::new(current),
            next_id: AtomicU64::new(1),
            timeout,
        }
    }

    pub fn subscribe(&self) -> watch::Receiver<Option<Notice>> {
        self.current.subscribe()
    }

    pub fn current(&self) -> Option<Notice> {
        self.current.borrow().clone()
    }

    pub fn info(&self, text: impl Into<String>) -> Notice {
        self.post(NoticeKind::Info, text.into())
    }

    pub fn error(&self, error: &ClientError) -> Notice {
        self.post(NoticeKind::Error, error.to_string())
    }

    pub fn clear(&self) {
        self.current.send_replace(None);
    }

    /// Show `text` and schedule its removal; must run inside a tokio runtime
    fn post(&self, kind: NoticeKind, text: String) -> Notice {
        let notice = Notice {
            id: self.next_id.fetch_add(1, Ordering::Relaxed),
            kind,
            text,
        };
        self.current.send_replace(Some(notice.clone()));

        let current = self.current.clone();
        let id = notice.id;
        let timeout = self.timeout;
        tokio::spawn(async move {
            tokio::time::sleep(timeout).await;
            current.send_if_modified(|slot| {
                if slot.as_ref().is_some_and(|shown| shown.id == id) {
                    *slot = None;
                    true
                } else {
                    false
                }
            });
        });
        notice
    }
}

impl Default for NoticeBoard {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_notice_clears_after_timeout() {
        // テスト項目: 通知は一定時間後に自動で消える
        // given (前提条件):
        let board = NoticeBoard::with_timeout(Duration::from_millis(100));

        // when (操作):
        board.error(&ClientError::Forbidden);

        // then (期待する結果):
        let shown = board.current().unwrap();
        assert_eq!(shown.kind, NoticeKind::Error);
        assert_eq!(shown.text, "You can only delete your own messages.");
        tokio::time::sleep(Duration::from_millis(300)).await;
        assert_eq!(board.current(), None);
    }

    #[tokio::test]
    async fn test_old_timer_does_not_clear_newer_notice() {
        // テスト項目: 古い通知のタイマーは新しい通知を消さない
        // given (前提条件):
        let board = NoticeBoard::with_timeout(Duration::from_millis(200));
        board.info("first");
        tokio::time::sleep(Duration::from_millis(120)).await;

        // when (操作):
        let second = board.info("second");
        tokio::time::sleep(Duration::from_millis(120)).await;

        // then (期待する結果):
        assert_eq!(board.current(), Some(second));
        tokio::time::sleep(Duration::from_millis(250)).await;
        assert_eq!(board.current(), None);
    }
}
