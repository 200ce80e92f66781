use std::cell::Cell;
use std::rc::Rc;
use std::time::Duration;

use chrono::{DateTime, Local};
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use serde::Serialize;

use crate::clock::Clock;
use crate::config::Config;
use crate::page::{Disposition, Element, ElementRef, MemoryPage, Page};
use crate::runtime::HostEvent;
use crate::speed_test::{Callbacks, ElementIds, ScorerError, SpeedTest};

/// Elements of the generated speed test page
#[derive(Debug, Clone, Copy)]
pub struct PageLayout {
    pub target: ElementRef,
    pub input: ElementRef,
    pub overlay: ElementRef,
    pub container: ElementRef,
    pub stats: ElementRef,
    pub progress: ElementRef,
    pub completed: ElementRef,
    pub reset: ElementRef,
}

/// Lays out the same elements a survey page would carry around the question
pub fn build_page(prompt: &str, question_id: &str, ids: &ElementIds) -> (MemoryPage, PageLayout) {
    let mut page = MemoryPage::new();
    let container = page.add_with_class(&ids.container_class);
    let target = page.add(Element {
        id: Some(ids.target.clone()),
        text: prompt.to_string(),
        ..Element::default()
    });
    let overlay = page.add_with_class(&ids.overlay_class);
    let input = page.add_with_id(&ids.input_for(question_id));
    let stats = page.add_with_id(&ids.stats);
    let progress = page.add_with_id(&ids.progress);
    let completed = page.add_with_id(&ids.completed);
    let reset = page.add_with_id(&ids.reset);

    let layout = PageLayout {
        target,
        input,
        overlay,
        container,
        stats,
        progress,
        completed,
        reset,
    };
    (page, layout)
}

/// Summary of a finished test
#[derive(Debug, Clone, Serialize)]
pub struct Completion {
    pub wpm: f64,
    pub keystrokes: usize,
    pub errors: usize,
    pub finished_at: DateTime<Local>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Control {
    Continue,
    Quit,
}

#[derive(Debug)]
pub struct App<C: Clock> {
    pub page: MemoryPage,
    pub layout: PageLayout,
    pub test: SpeedTest<C>,
    pub completion: Option<Completion>,
    pub error_class: String,
    finished: Rc<Cell<Option<f64>>>,
    resets: Rc<Cell<usize>>,
}

impl<C: Clock> App<C> {
    pub fn new(prompt: &str, config: &Config, clock: C) -> Result<Self, ScorerError> {
        let (mut page, layout) = build_page(prompt, &config.question_id, &config.elements);
        let finished = Rc::new(Cell::new(None));
        let resets = Rc::new(Cell::new(0));

        let on_finish = finished.clone();
        let on_reset = resets.clone();
        let callbacks = Callbacks::default()
            .on_complete(move |speed| on_finish.set(Some(speed)))
            .on_reset(move || on_reset.set(on_reset.get() + 1));

        let test = SpeedTest::init(
            &mut page,
            &config.question_id,
            &config.elements,
            config.options,
            callbacks,
            clock,
        )?;

        Ok(Self {
            page,
            layout,
            test,
            completion: None,
            error_class: config.elements.error_class.clone(),
            finished,
            resets,
        })
    }

    pub fn handle(&mut self, event: HostEvent, tick: Duration) -> Control {
        match event {
            HostEvent::Key(key) => return self.on_key(key),
            HostEvent::Paste(text) => self.on_paste(&text),
            HostEvent::Tick => self.on_tick(tick),
            HostEvent::Resize => {}
            HostEvent::Closed => return Control::Quit,
        }
        Control::Continue
    }

    fn on_key(&mut self, key: KeyEvent) -> Control {
        let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
        match key.code {
            KeyCode::Esc => return Control::Quit,
            KeyCode::Char('c') if ctrl => return Control::Quit,
            KeyCode::Char('r') if ctrl => self.click_reset(),
            KeyCode::Char(c) if !ctrl => {
                self.keystroke(|page, input| page.type_text(input, c.encode_utf8(&mut [0; 4])))
            }
            KeyCode::Backspace => self.keystroke(|page, input| page.backspace(input)),
            KeyCode::Enter | KeyCode::Tab => self.keystroke(|_, _| {}),
            _ => {}
        }
        Control::Continue
    }

    /// keydown listeners, then the field's default action, then the deferred scoring
    fn keystroke(&mut self, default_action: impl FnOnce(&mut MemoryPage, ElementRef)) {
        for ev in self.page.key_down(self.layout.input) {
            self.test.handle_event(&mut self.page, ev);
        }
        default_action(&mut self.page, self.layout.input);
        self.test.run_deferred(&mut self.page);
        self.collect_completion();
    }

    fn on_paste(&mut self, text: &str) {
        let prevented = self
            .page
            .paste(self.layout.input)
            .into_iter()
            .map(|ev| self.test.handle_event(&mut self.page, ev))
            .fold(false, |acc, d| acc || d == Disposition::Prevent);
        if prevented {
            log::debug!("paste of {} chars blocked", text.chars().count());
        } else {
            self.page.type_text(self.layout.input, text);
        }
    }

    fn on_tick(&mut self, dt: Duration) {
        for ev in self.page.advance(dt) {
            self.test.handle_event(&mut self.page, ev);
        }
    }

    pub fn click_reset(&mut self) {
        for ev in self.page.click(self.layout.reset) {
            self.test.handle_event(&mut self.page, ev);
        }
        self.completion = None;
        self.finished.set(None);
    }

    fn collect_completion(&mut self) {
        if let Some(wpm) = self.finished.take() {
            let state = self.test.state();
            self.completion = Some(Completion {
                wpm,
                keystrokes: state.key_count,
                errors: state.error_count,
                finished_at: Local::now(),
            });
        }
    }

    pub fn reset_count(&self) -> usize {
        self.resets.get()
    }

    pub fn prompt(&self) -> String {
        self.page.text(self.layout.target)
    }

    pub fn has_error(&self) -> bool {
        self.page.has_class(self.layout.container, &self.error_class)
    }

    /// Detaches the test and hands back the result, if any
    pub fn finish(mut self) -> Option<Completion> {
        self.test.destroy(&mut self.page);
        self.completion
    }
}
