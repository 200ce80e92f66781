use std::collections::{BTreeSet, HashMap};
use std::time::Duration;

/// Handle to an element owned by a [`Page`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ElementRef(pub usize);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Subscription(pub u64);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TimerHandle(pub u64);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventKind {
    KeyDown,
    Paste,
    Click,
}

/// Event delivered by the host for a live subscription or timer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageEvent {
    KeyDown(Subscription),
    Paste(Subscription),
    Click(Subscription),
    Timer(TimerHandle),
}

/// What the host should do with the event's default action
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Disposition {
    Proceed,
    Prevent,
}

/// The slice of a document model the speed test needs.
///
/// Lookups return `None`/empty for absent elements; setters on a stale
/// handle are no-ops.
pub trait Page {
    fn element_by_id(&self, id: &str) -> Option<ElementRef>;
    fn elements_by_class(&self, class: &str) -> Vec<ElementRef>;

    fn text(&self, el: ElementRef) -> String;
    fn set_text(&mut self, el: ElementRef, text: &str);

    fn value(&self, el: ElementRef) -> String;
    fn set_value(&mut self, el: ElementRef, value: &str);

    fn set_disabled(&mut self, el: ElementRef, disabled: bool);
    fn set_class(&mut self, el: ElementRef, class: &str, present: bool);

    fn subscribe(&mut self, el: ElementRef, kind: EventKind) -> Subscription;
    fn unsubscribe(&mut self, sub: Subscription);

    fn set_interval(&mut self, period: Duration) -> TimerHandle;
    fn clear_interval(&mut self, timer: TimerHandle);
}

#[derive(Debug, Clone, Default)]
pub struct Element {
    pub id: Option<String>,
    pub classes: BTreeSet<String>,
    pub text: String,
    pub value: String,
    pub disabled: bool,
}

#[derive(Debug, Clone, Copy)]
struct Interval {
    period: Duration,
    elapsed: Duration,
}

/// In-process page: an element table plus subscription and timer registries.
///
/// The host-side helpers (`key_down`, `type_text`, `advance`, ...) stand in
/// for what a browser does around a listener: they report which live
/// subscriptions an interaction reaches and apply default actions.
#[derive(Debug, Default)]
pub struct MemoryPage {
    elements: Vec<Element>,
    subscriptions: HashMap<Subscription, (ElementRef, EventKind)>,
    timers: HashMap<TimerHandle, Interval>,
    next_handle: u64,
}

impl MemoryPage {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, element: Element) -> ElementRef {
        self.elements.push(element);
        ElementRef(self.elements.len() - 1)
    }

    pub fn add_with_id(&mut self, id: &str) -> ElementRef {
        self.add(Element {
            id: Some(id.to_string()),
            ..Element::default()
        })
    }

    pub fn add_with_class(&mut self, class: &str) -> ElementRef {
        self.add(Element {
            classes: BTreeSet::from([class.to_string()]),
            ..Element::default()
        })
    }

    pub fn element(&self, el: ElementRef) -> Option<&Element> {
        self.elements.get(el.0)
    }

    pub fn has_class(&self, el: ElementRef, class: &str) -> bool {
        self.element(el).is_some_and(|e| e.classes.contains(class))
    }

    pub fn is_disabled(&self, el: ElementRef) -> bool {
        self.element(el).is_some_and(|e| e.disabled)
    }

    pub fn subscription_count(&self) -> usize {
        self.subscriptions.len()
    }

    pub fn timer_count(&self) -> usize {
        self.timers.len()
    }

    fn next_handle(&mut self) -> u64 {
        self.next_handle += 1;
        self.next_handle
    }

    fn events_for(&self, el: ElementRef, kind: EventKind) -> Vec<PageEvent> {
        let mut subs: Vec<Subscription> = self
            .subscriptions
            .iter()
            .filter(|(_, (target, k))| *target == el && *k == kind)
            .map(|(sub, _)| *sub)
            .collect();
        // registration order
        subs.sort_by_key(|s| s.0);
        subs.into_iter()
            .map(|sub| match kind {
                EventKind::KeyDown => PageEvent::KeyDown(sub),
                EventKind::Paste => PageEvent::Paste(sub),
                EventKind::Click => PageEvent::Click(sub),
            })
            .collect()
    }

    pub fn key_down(&self, el: ElementRef) -> Vec<PageEvent> {
        self.events_for(el, EventKind::KeyDown)
    }

    pub fn paste(&self, el: ElementRef) -> Vec<PageEvent> {
        self.events_for(el, EventKind::Paste)
    }

    pub fn click(&self, el: ElementRef) -> Vec<PageEvent> {
        self.events_for(el, EventKind::Click)
    }

    /// Default action of typing: append unless the field is disabled
    pub fn type_text(&mut self, el: ElementRef, text: &str) {
        if let Some(e) = self.elements.get_mut(el.0) {
            if !e.disabled {
                e.value.push_str(text);
            }
        }
    }

    pub fn backspace(&mut self, el: ElementRef) {
        if let Some(e) = self.elements.get_mut(el.0) {
            if !e.disabled {
                e.value.pop();
            }
        }
    }

    /// Advances every interval timer by `dt` and reports the ones that fired
    pub fn advance(&mut self, dt: Duration) -> Vec<PageEvent> {
        let mut fired = Vec::new();
        for (handle, interval) in self.timers.iter_mut() {
            if interval.period.is_zero() {
                continue;
            }
            interval.elapsed += dt;
            while interval.elapsed >= interval.period {
                interval.elapsed -= interval.period;
                fired.push(*handle);
            }
        }
        fired.sort_by_key(|h| h.0);
        fired.into_iter().map(PageEvent::Timer).collect()
    }
}

impl Page for MemoryPage {
    fn element_by_id(&self, id: &str) -> Option<ElementRef> {
        self.elements
            .iter()
            .position(|e| e.id.as_deref() == Some(id))
            .map(ElementRef)
    }

    fn elements_by_class(&self, class: &str) -> Vec<ElementRef> {
        self.elements
            .iter()
            .enumerate()
            .filter(|(_, e)| e.classes.contains(class))
            .map(|(i, _)| ElementRef(i))
            .collect()
    }

    fn text(&self, el: ElementRef) -> String {
        self.element(el).map(|e| e.text.clone()).unwrap_or_default()
    }

    fn set_text(&mut self, el: ElementRef, text: &str) {
        if let Some(e) = self.elements.get_mut(el.0) {
            e.text = text.to_string();
        }
    }

    fn value(&self, el: ElementRef) -> String {
        self.element(el).map(|e| e.value.clone()).unwrap_or_default()
    }

    fn set_value(&mut self, el: ElementRef, value: &str) {
        if let Some(e) = self.elements.get_mut(el.0) {
            e.value = value.to_string();
        }
    }

    fn set_disabled(&mut self, el: ElementRef, disabled: bool) {
        if let Some(e) = self.elements.get_mut(el.0) {
            e.disabled = disabled;
        }
    }

    fn set_class(&mut self, el: ElementRef, class: &str, present: bool) {
        if let Some(e) = self.elements.get_mut(el.0) {
            if present {
                e.classes.insert(class.to_string());
            } else {
                e.classes.remove(class);
            }
        }
    }

    fn subscribe(&mut self, el: ElementRef, kind: EventKind) -> Subscription {
        let sub = Subscription(self.next_handle());
        self.subscriptions.insert(sub, (el, kind));
        sub
    }

    fn unsubscribe(&mut self, sub: Subscription) {
        self.subscriptions.remove(&sub);
    }

    fn set_interval(&mut self, period: Duration) -> TimerHandle {
        let handle = TimerHandle(self.next_handle());
        self.timers.insert(
            handle,
            Interval {
                period,
                elapsed: Duration::ZERO,
            },
        );
        handle
    }

    fn clear_interval(&mut self, timer: TimerHandle) {
        self.timers.remove(&timer);
    }
}
