//! Toast model for the upload lifecycle.
//!
//! At most one toast is shown. It opens as `Loading` when an upload
//! starts and is updated in place to `Success` or `Error`. Every toast
//! auto-dismisses; each update bumps the revision so a timer scheduled for
//! an older revision cannot close the newer content.

use crate::upload::UploadFailure;
use std::time::Duration;

/// How long any toast stays up.
pub const AUTO_DISMISS: Duration = Duration::from_millis(3000);

pub const LOADING_MESSAGE: &str = "Carregando...";
pub const SUCCESS_MESSAGE: &str = "Arquivo enviado com sucesso!";
pub const UNEXPECTED_RESPONSE_MESSAGE: &str = "Erro: Resposta inesperada do servidor.";
pub const UPLOAD_ERROR_MESSAGE: &str = "Erro ao fazer upload do arquivo.";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeKind {
    Loading,
    Success,
    Error,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NoticeId(u64);

#[derive(Debug, Clone, PartialEq)]
pub struct Notice {
    pub id: NoticeId,
    pub revision: u32,
    pub kind: NoticeKind,
    pub message: String,
}

impl Notice {
    pub fn auto_dismiss(&self) -> Duration {
        AUTO_DISMISS
    }
}

/// Message shown for a failed upload.
pub fn failure_message(failure: &UploadFailure) -> &'static str {
    match failure {
        UploadFailure::UnexpectedResponse(_) => UNEXPECTED_RESPONSE_MESSAGE,
        UploadFailure::Network(_) => UPLOAD_ERROR_MESSAGE,
    }
}

#[derive(Debug, Clone, Default)]
pub struct Notifier {
    current: Option<Notice>,
    issued: u64,
}

impl Notifier {
    pub fn current(&self) -> Option<&Notice> {
        self.current.as_ref()
    }

    /// Open a new toast, replacing whatever was shown.
    pub fn show(&mut self, kind: NoticeKind, message: &str) -> NoticeId {
        self.issued += 1;
        let id = NoticeId(self.issued);
        self.current = Some(Notice {
            id,
            revision: 0,
            kind,
            message: message.to_string(),
        });
        id
    }

    pub fn loading(&mut self, message: &str) -> NoticeId {
        self.show(NoticeKind::Loading, message)
    }

    /// Turn toast `id` into `kind` with `message`. Returns the updated
    /// toast, or `None` when `id` is no longer shown.
    pub fn resolve(&mut self, id: NoticeId, kind: NoticeKind, message: &str) -> Option<&Notice> {
        match self.current.as_mut() {
            Some(notice) if notice.id == id => {
                notice.revision += 1;
                notice.kind = kind;
                notice.message = message.to_string();
                Some(&*notice)
            }
            _ => None,
        }
    }

    /// Manual dismissal.
    pub fn dismiss(&mut self, id: NoticeId) -> bool {
        if self.current.as_ref().map(|n| n.id) == Some(id) {
            self.current = None;
            true
        } else {
            false
        }
    }

    /// Auto-dismiss timer callback for `(id, revision)`.
    pub fn expire(&mut self, id: NoticeId, revision: u32) -> bool {
        let matches = self
            .current
            .as_ref()
            .map_or(false, |n| n.id == id && n.revision == revision);
        if matches {
            self.current = None;
        }
        matches
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_loading_then_success_updates_in_place() {
        let mut notifier = Notifier::default();
        let id = notifier.loading(LOADING_MESSAGE);
        assert_eq!(notifier.current().unwrap().kind, NoticeKind::Loading);
        assert_eq!(notifier.current().unwrap().auto_dismiss(), AUTO_DISMISS);

        let notice = notifier.resolve(id, NoticeKind::Success, SUCCESS_MESSAGE).unwrap();
        assert_eq!(notice.id, id);
        assert_eq!(notice.revision, 1);
        assert_eq!(notice.message, SUCCESS_MESSAGE);
        assert_eq!(notice.auto_dismiss(), AUTO_DISMISS);
    }

    #[test]
    fn test_expire_only_matching_revision() {
        let mut notifier = Notifier::default();
        let id = notifier.loading(LOADING_MESSAGE);
        notifier.resolve(id, NoticeKind::Error, UPLOAD_ERROR_MESSAGE);
        assert!(!notifier.expire(id, 0));
        assert!(notifier.expire(id, 1));
        assert!(notifier.current().is_none());
    }

    #[test]
    fn test_loading_toast_expires() {
        let mut notifier = Notifier::default();
        let id = notifier.loading(LOADING_MESSAGE);
        assert!(notifier.expire(id, 0));
        assert!(notifier.current().is_none());
        assert!(notifier.resolve(id, NoticeKind::Success, SUCCESS_MESSAGE).is_none());
    }

    #[test]
    fn test_show_opens_resolved_toast() {
        let mut notifier = Notifier::default();
        let first = notifier.loading(LOADING_MESSAGE);
        let second = notifier.show(NoticeKind::Error, UPLOAD_ERROR_MESSAGE);
        assert_ne!(first, second);
        let notice = notifier.current().unwrap();
        assert_eq!((notice.id, notice.revision), (second, 0));
        assert_eq!(notice.kind, NoticeKind::Error);
        assert!(!notifier.dismiss(first));
    }

    #[test]
    fn test_new_loading_replaces_old_toast() {
        let mut notifier = Notifier::default();
        let first = notifier.loading(LOADING_MESSAGE);
        notifier.resolve(first, NoticeKind::Success, SUCCESS_MESSAGE);
        let second = notifier.loading(LOADING_MESSAGE);
        assert_ne!(first, second);
        assert!(!notifier.expire(first, 1));
        assert!(notifier.resolve(first, NoticeKind::Error, UPLOAD_ERROR_MESSAGE).is_none());
        assert_eq!(notifier.current().unwrap().kind, NoticeKind::Loading);
    }

    #[test]
    fn test_manual_dismiss() {
        let mut notifier = Notifier::default();
        let id = notifier.loading(LOADING_MESSAGE);
        assert!(notifier.dismiss(id));
        assert!(!notifier.dismiss(id));
        assert!(notifier.resolve(id, NoticeKind::Success, SUCCESS_MESSAGE).is_none());
    }

    #[test]
    fn test_failure_messages() {
        assert_eq!(
            failure_message(&UploadFailure::UnexpectedResponse("x".into())),
            UNEXPECTED_RESPONSE_MESSAGE
        );
        assert_eq!(
            failure_message(&UploadFailure::Network("x".into())),
            UPLOAD_ERROR_MESSAGE
        );
    }
}
