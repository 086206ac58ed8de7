//! Typed notification bus for source state transitions.
//!
//! Every mutation of [`SourceData`](crate::SourceData) publishes zero or more
//! [`SourceEvent`]s. Consumers subscribe per [`SourceEventKind`] and receive
//! the event plus read access to the state it was published from.
//!
//! Delivery is synchronous and in registration order. There is no error
//! isolation: a handler that panics unwinds through [`EventBus::publish`] and
//! handlers registered after it do not see that emission.

use crate::source::{FileId, SourceState};

/// A state transition published by the source model.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SourceEvent {
    ModeSetText,
    ModeSetFile,
    TextContentSet,
    FileAdded(FileId),
    FileRemoved(FileId),
    FilesCleared,
    /// The source holds no text, or no files.
    SourceEmpty,
    LineNumbersEnabled,
    LineNumbersDisabled,
    FirstLineNumberSet,
    ErrorShown,
    ErrorHidden,
    ErrorMessageSet,
    AboutShown,
    AboutHidden,
}

/// Payload-free discriminant of [`SourceEvent`], used as the subscription key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SourceEventKind {
    ModeSetText,
    ModeSetFile,
    TextContentSet,
    FileAdded,
    FileRemoved,
    FilesCleared,
    SourceEmpty,
    LineNumbersEnabled,
    LineNumbersDisabled,
    FirstLineNumberSet,
    ErrorShown,
    ErrorHidden,
    ErrorMessageSet,
    AboutShown,
    AboutHidden,
}

impl SourceEvent {
    pub fn kind(&self) -> SourceEventKind {
        match self {
            SourceEvent::ModeSetText => SourceEventKind::ModeSetText,
            SourceEvent::ModeSetFile => SourceEventKind::ModeSetFile,
            SourceEvent::TextContentSet => SourceEventKind::TextContentSet,
            SourceEvent::FileAdded(_) => SourceEventKind::FileAdded,
            SourceEvent::FileRemoved(_) => SourceEventKind::FileRemoved,
            SourceEvent::FilesCleared => SourceEventKind::FilesCleared,
            SourceEvent::SourceEmpty => SourceEventKind::SourceEmpty,
            SourceEvent::LineNumbersEnabled => SourceEventKind::LineNumbersEnabled,
            SourceEvent::LineNumbersDisabled => SourceEventKind::LineNumbersDisabled,
            SourceEvent::FirstLineNumberSet => SourceEventKind::FirstLineNumberSet,
            SourceEvent::ErrorShown => SourceEventKind::ErrorShown,
            SourceEvent::ErrorHidden => SourceEventKind::ErrorHidden,
            SourceEvent::ErrorMessageSet => SourceEventKind::ErrorMessageSet,
            SourceEvent::AboutShown => SourceEventKind::AboutShown,
            SourceEvent::AboutHidden => SourceEventKind::AboutHidden,
        }
    }

    /// File id carried by the event, if any.
    pub fn file_id(&self) -> Option<FileId> {
        match self {
            SourceEvent::FileAdded(id) | SourceEvent::FileRemoved(id) => Some(*id),
            _ => None,
        }
    }
}

impl SourceEventKind {
    pub const ALL: [SourceEventKind; 15] = [
        SourceEventKind::ModeSetText,
        SourceEventKind::ModeSetFile,
        SourceEventKind::TextContentSet,
        SourceEventKind::FileAdded,
        SourceEventKind::FileRemoved,
        SourceEventKind::FilesCleared,
        SourceEventKind::SourceEmpty,
        SourceEventKind::LineNumbersEnabled,
        SourceEventKind::LineNumbersDisabled,
        SourceEventKind::FirstLineNumberSet,
        SourceEventKind::ErrorShown,
        SourceEventKind::ErrorHidden,
        SourceEventKind::ErrorMessageSet,
        SourceEventKind::AboutShown,
        SourceEventKind::AboutHidden,
    ];

    /// Stable snake_case name, as handed to JS subscribers.
    pub fn as_str(self) -> &'static str {
        match self {
            SourceEventKind::ModeSetText => "set_mode_text",
            SourceEventKind::ModeSetFile => "set_mode_file",
            SourceEventKind::TextContentSet => "set_text_content",
            SourceEventKind::FileAdded => "add_file",
            SourceEventKind::FileRemoved => "remove_file",
            SourceEventKind::FilesCleared => "clear_files",
            SourceEventKind::SourceEmpty => "empty_source",
            SourceEventKind::LineNumbersEnabled => "enable_line_numbers",
            SourceEventKind::LineNumbersDisabled => "disable_line_numbers",
            SourceEventKind::FirstLineNumberSet => "set_first_line_number",
            SourceEventKind::ErrorShown => "show_error",
            SourceEventKind::ErrorHidden => "hide_error",
            SourceEventKind::ErrorMessageSet => "set_error_message",
            SourceEventKind::AboutShown => "show_about",
            SourceEventKind::AboutHidden => "hide_about",
        }
    }

    /// Inverse of [`as_str`](Self::as_str).
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|kind| kind.as_str() == name)
    }
}

impl std::fmt::Display for SourceEventKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Handle returned by [`EventBus::subscribe`], used to unsubscribe.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SubscriptionId(u64);

/// Event handler. Gets the event and the state it was published from.
pub type Handler = Box<dyn FnMut(&SourceEvent, &SourceState)>;

struct Subscription {
    id: SubscriptionId,
    /// `None` subscribes to every event.
    kind: Option<SourceEventKind>,
    handler: Handler,
}

/// Per-instance publish/subscribe registry.
#[derive(Default)]
pub struct EventBus {
    subscriptions: Vec<Subscription>,
    next_id: u64,
}

impl std::fmt::Debug for EventBus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EventBus")
            .field("subscriptions", &self.subscriptions.len())
            .finish()
    }
}

impl EventBus {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a handler for one kind of event.
    pub fn subscribe<F>(&mut self, kind: SourceEventKind, handler: F) -> SubscriptionId
    where
        F: FnMut(&SourceEvent, &SourceState) + 'static,
    {
        self.push(Some(kind), Box::new(handler))
    }

    /// Register a handler that receives every event.
    pub fn subscribe_all<F>(&mut self, handler: F) -> SubscriptionId
    where
        F: FnMut(&SourceEvent, &SourceState) + 'static,
    {
        self.push(None, Box::new(handler))
    }

    /// Remove a handler. Returns false if it was already gone.
    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        let before = self.subscriptions.len();
        self.subscriptions.retain(|s| s.id != id);
        self.subscriptions.len() != before
    }

    /// Number of registered handlers.
    pub fn len(&self) -> usize {
        self.subscriptions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.subscriptions.is_empty()
    }

    /// Invoke every matching handler, in registration order.
    pub fn publish(&mut self, event: &SourceEvent, state: &SourceState) {
        tracing::trace!(?event, "publish");
        let kind = event.kind();
        for sub in self
            .subscriptions
            .iter_mut()
            .filter(|s| s.kind.is_none_or(|k| k == kind))
        {
            (sub.handler)(event, state);
        }
    }

    fn push(&mut self, kind: Option<SourceEventKind>, handler: Handler) -> SubscriptionId {
        let id = SubscriptionId(self.next_id);
        self.next_id += 1;
        self.subscriptions.push(Subscription { id, kind, handler });
        id
    }
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;
    use std::rc::Rc;

    use super::*;

    fn recorder() -> (Rc<RefCell<Vec<String>>>, impl Fn(&'static str) -> Handler) {
        let log = Rc::new(RefCell::new(Vec::new()));
        let make = {
            let log = log.clone();
            move |tag: &'static str| -> Handler {
                let log = log.clone();
                Box::new(move |event: &SourceEvent, _: &SourceState| {
                    log.borrow_mut().push(format!("{tag}:{event:?}"));
                })
            }
        };
        (log, make)
    }

    #[test]
    fn test_delivery_in_registration_order() {
        let state = SourceState::default();
        let mut bus = EventBus::new();
        let (log, make) = recorder();

        bus.subscribe(SourceEventKind::SourceEmpty, make("a"));
        bus.subscribe(SourceEventKind::SourceEmpty, make("b"));
        bus.subscribe(SourceEventKind::FilesCleared, make("c"));

        bus.publish(&SourceEvent::SourceEmpty, &state);
        assert_eq!(*log.borrow(), vec!["a:SourceEmpty", "b:SourceEmpty"]);
    }

    #[test]
    fn test_payload_reaches_handler() {
        let state = SourceState::default();
        let mut bus = EventBus::new();
        let seen = Rc::new(RefCell::new(None));
        let sink = seen.clone();
        bus.subscribe(SourceEventKind::FileRemoved, move |event, _| {
            *sink.borrow_mut() = event.file_id();
        });

        bus.publish(&SourceEvent::FileRemoved(FileId::new(7)), &state);
        assert_eq!(*seen.borrow(), Some(FileId::new(7)));
    }

    #[test]
    fn test_subscribe_all_sees_everything() {
        let state = SourceState::default();
        let mut bus = EventBus::new();
        let (log, make) = recorder();
        bus.push(None, make("all"));

        bus.publish(&SourceEvent::AboutShown, &state);
        bus.publish(&SourceEvent::ErrorHidden, &state);
        assert_eq!(*log.borrow(), vec!["all:AboutShown", "all:ErrorHidden"]);
    }

    #[test]
    fn test_unsubscribe() {
        let state = SourceState::default();
        let mut bus = EventBus::new();
        let (log, make) = recorder();
        let id = bus.push(Some(SourceEventKind::AboutShown), make("x"));

        assert!(bus.unsubscribe(id));
        assert!(!bus.unsubscribe(id));
        assert!(bus.is_empty());

        bus.publish(&SourceEvent::AboutShown, &state);
        assert!(log.borrow().is_empty());
    }

    #[test]
    fn test_panicking_handler_stops_delivery() {
        let state = SourceState::default();
        let mut bus = EventBus::new();
        let (log, make) = recorder();
        bus.subscribe(SourceEventKind::AboutShown, |_, _| panic!("listener failed"));
        bus.push(Some(SourceEventKind::AboutShown), make("after"));

        let result = std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| {
            bus.publish(&SourceEvent::AboutShown, &state);
        }));
        assert!(result.is_err());
        assert!(log.borrow().is_empty());
    }

    #[test]
    fn test_kind_names() {
        assert_eq!(SourceEvent::FileAdded(FileId::new(0)).kind().as_str(), "add_file");
        assert_eq!(SourceEventKind::SourceEmpty.to_string(), "empty_source");

        let mut names: Vec<_> = SourceEventKind::ALL.iter().map(|k| k.as_str()).collect();
        names.sort_unstable();
        names.dedup();
        assert_eq!(names.len(), SourceEventKind::ALL.len());

        for kind in SourceEventKind::ALL {
            assert_eq!(SourceEventKind::from_name(kind.as_str()), Some(kind));
        }
        assert_eq!(SourceEventKind::from_name("AddFile"), None);
    }
}
