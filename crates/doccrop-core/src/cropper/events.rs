//! Change notifications for the rendering layer.

use super::CropperState;
use crate::error::CropError;
use crate::transform::CropRect;

/// Something the UI should react to.
#[derive(Debug, Clone, PartialEq)]
pub enum CropperEvent {
    /// The lifecycle state changed.
    StateChanged(CropperState),
    /// The selection rectangle changed (or was cleared).
    SelectionChanged(Option<CropRect>),
    /// The display frame must be repainted.
    Redraw,
    /// An operation was refused; the message is user-facing.
    Rejected(CropError),
}

/// Handle returned by `subscribe`, used to unsubscribe.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ListenerId(pub(crate) u64);

pub(crate) type Listener = Box<dyn FnMut(&CropperEvent)>;

/// Listener registry. Listeners run synchronously, in subscription order.
#[derive(Default)]
pub(crate) struct Listeners {
    next_id: u64,
    entries: Vec<(ListenerId, Listener)>,
}

impl Listeners {
    pub fn add(&mut self, listener: Listener) -> ListenerId {
        let id = ListenerId(self.next_id);
        self.next_id += 1;
        self.entries.push((id, listener));
        id
    }

    pub fn remove(&mut self, id: ListenerId) -> bool {
        let before = self.entries.len();
        self.entries.retain(|(entry_id, _)| *entry_id != id);
        self.entries.len() != before
    }

    pub fn emit(&mut self, event: &CropperEvent) {
        for (_, listener) in self.entries.iter_mut() {
            listener(event);
        }
    }

    #[cfg(test)]
    pub fn len(&self) -> usize {
        self.entries.len()
    }
}

impl std::fmt::Debug for Listeners {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Listeners")
            .field("count", &self.entries.len())
            .finish()
    }
}
