use crate::notice::{failure_message, Notice, NoticeId, NoticeKind, Notifier, LOADING_MESSAGE, SUCCESS_MESSAGE};
use crate::upload::{Reaction, UploadEvent, UploadMachine, UploadState};

/// Upload state machine plus the toast bound to its in-flight upload.
#[derive(Debug, Clone, Default)]
pub struct UploadSession {
    machine: UploadMachine,
    notifier: Notifier,
    toast: Option<NoticeId>,
}

impl UploadSession {
    pub fn state(&self) -> &UploadState {
        self.machine.state()
    }

    pub fn notice(&self) -> Option<&Notice> {
        self.notifier.current()
    }

    pub fn handle(&mut self, event: UploadEvent) -> Reaction {
        let reaction = self.machine.handle(event);
        match &reaction {
            Reaction::Start { .. } => {
                self.toast = Some(self.notifier.loading(LOADING_MESSAGE));
            }
            Reaction::Succeeded => self.resolve(NoticeKind::Success, SUCCESS_MESSAGE),
            Reaction::Failed(failure) => self.resolve(NoticeKind::Error, failure_message(failure)),
            Reaction::Superseded(_) => {
                if let Some(id) = self.toast.take() {
                    self.notifier.dismiss(id);
                }
            }
            Reaction::Updated | Reaction::Warn(_) | Reaction::Stale => {}
        }
        reaction
    }

    /// Update the upload's toast, or open a fresh one when the loading
    /// toast has already expired or been dismissed.
    fn resolve(&mut self, kind: NoticeKind, message: &str) {
        let updated = match self.toast {
            Some(id) => self.notifier.resolve(id, kind, message).is_some(),
            None => false,
        };
        if !updated {
            self.toast = Some(self.notifier.show(kind, message));
        }
    }

    pub fn dismiss_notice(&mut self) -> bool {
        match self.notifier.current().map(|n| n.id) {
            Some(id) => self.notifier.dismiss(id),
            None => false,
        }
    }

    pub fn expire_notice(&mut self, id: NoticeId, revision: u32) -> bool {
        self.notifier.expire(id, revision)
    }
}
