use crate::carousel::CarouselParts;
use crate::config::Config;
use crate::events::UiEvent;
use crate::page::{Page, PageSnapshot};
use crate::script::Step;
use pagehost::{Dom, MemoryDom, NodeId, Point, PointerId, Scheduler, Selector, VirtualClock};
use std::time::Duration;
use thiserror::Error;

/// Pointer used for every scripted gesture.
pub const SCRIPT_POINTER: PointerId = PointerId(1);

#[derive(Error, Debug)]
pub enum DriveError {
    #[error("no element matches '{selector}' at index {nth}")]
    TargetNotFound { selector: Selector, nth: usize },
}

#[derive(Error, Debug)]
#[error("line {line}: {source}")]
pub struct StepFailed {
    pub line: usize,
    #[source]
    pub source: DriveError,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Outcome {
    Applied,
    /// The caller decides how time passes.
    Wait(Duration),
    Snapshot(PageSnapshot),
}

/// Plays the part of a browser: turns script steps into host mutations and
/// events for a mounted [`Page`].
#[derive(Debug)]
pub struct Driver<S = VirtualClock> {
    dom: MemoryDom<S>,
    page: Page,
}

impl<S: Scheduler> Driver<S> {
    pub fn new(mut dom: MemoryDom<S>, config: Config) -> Self {
        let page = Page::mount(&mut dom, &config);
        Self { dom, page }
    }

    pub fn dom(&self) -> &MemoryDom<S> {
        &self.dom
    }

    pub fn page(&self) -> &Page {
        &self.page
    }

    pub fn snapshot(&self) -> PageSnapshot {
        self.page.snapshot(&self.dom)
    }

    /// Delivers one event, then the scroll event a host fires if a handler
    /// moved the page.
    pub fn dispatch(&mut self, event: UiEvent) {
        self.page.dispatch(&mut self.dom, &event);
        self.flush_scroll();
    }

    pub fn reconfigure(&mut self, config: Config) {
        self.page.reconfigure(&mut self.dom, &config);
    }

    pub fn apply(&mut self, step: &Step) -> Result<Outcome, DriveError> {
        match step {
            Step::Click { selector, nth } => {
                let target = self.find(selector, *nth)?;
                self.dispatch(UiEvent::Click(target));
            }
            Step::Hover => {
                if let Some(root) = self.carousel_root() {
                    self.dispatch(UiEvent::MouseEnter(root));
                }
            }
            Step::Leave => {
                if let Some(root) = self.carousel_root() {
                    self.dispatch(UiEvent::MouseLeave(root));
                }
            }
            Step::Focus(selector) => {
                let target = self.find(selector, 0)?;
                self.dom.focus(target);
            }
            Step::Key(key) => {
                let target = self.dom.focused().unwrap_or(self.dom.body());
                self.dispatch(UiEvent::KeyDown { target, key: *key });
            }
            Step::PointerDown(x) => self.pointer_down(*x),
            Step::PointerUp(x) => self.pointer_up(*x),
            Step::PointerCancel => {
                let target = self.pointer_target();
                self.dispatch(UiEvent::PointerCancel {
                    target,
                    pointer: SCRIPT_POINTER,
                });
            }
            Step::Swipe { from, to } => {
                self.pointer_down(*from);
                self.pointer_up(*to);
            }
            Step::Wait(d) => return Ok(Outcome::Wait(*d)),
            Step::Scroll(y) => {
                self.dom.set_scroll_y(*y);
                self.flush_scroll();
            }
            Step::Resize(width) => {
                for slide in self.slides() {
                    self.dom.set_width(slide, *width);
                }
                self.dispatch(UiEvent::Resize);
            }
            Step::Snapshot => return Ok(Outcome::Snapshot(self.snapshot())),
        }
        Ok(Outcome::Applied)
    }

    fn find(&self, selector: &Selector, nth: usize) -> Result<NodeId, DriveError> {
        self.dom
            .query_all(None, selector)
            .get(nth)
            .copied()
            .ok_or_else(|| DriveError::TargetNotFound {
                selector: selector.clone(),
                nth,
            })
    }

    // the elements the mounted carousel was wired to, not a fresh query
    fn parts(&self) -> Option<&CarouselParts> {
        self.page.carousel.as_ref().map(|c| c.parts())
    }

    fn carousel_root(&self) -> Option<NodeId> {
        self.parts().map(|p| p.root)
    }

    fn slides(&self) -> Vec<NodeId> {
        self.parts().map(|p| p.slides.clone()).unwrap_or_default()
    }

    fn pointer_target(&self) -> NodeId {
        self.dom
            .pointer_capture(SCRIPT_POINTER)
            .or_else(|| self.parts().map(|p| p.viewport))
            .unwrap_or(self.dom.body())
    }

    fn pointer_down(&mut self, x: f64) {
        let target = self.pointer_target();
        self.dispatch(UiEvent::PointerDown {
            target,
            pointer: SCRIPT_POINTER,
            position: Point::new(x, 0.0),
        });
    }

    fn pointer_up(&mut self, x: f64) {
        let target = self.pointer_target();
        self.dispatch(UiEvent::PointerUp {
            target,
            pointer: SCRIPT_POINTER,
            position: Point::new(x, 0.0),
        });
    }

    fn flush_scroll(&mut self) {
        if self.dom.take_scroll_change() {
            self.page.dispatch(&mut self.dom, &UiEvent::Scroll);
        }
    }
}

impl Driver<VirtualClock> {
    pub fn now(&self) -> Duration {
        self.dom.timers().now()
    }

    /// Moves virtual time forward, running every timer that falls due on
    /// the way in order.
    pub fn advance(&mut self, by: Duration) {
        let deadline = self.now() + by;
        while let Some(id) = self.dom.timers_mut().pop_due(deadline) {
            self.dispatch(UiEvent::Tick(id));
        }
        self.dom.timers_mut().settle(deadline);
    }

    /// Replays parsed steps, reporting each `snapshot` step with its line.
    pub fn run(
        &mut self,
        steps: &[(usize, Step)],
        mut on_snapshot: impl FnMut(usize, &PageSnapshot),
    ) -> Result<(), StepFailed> {
        for (line, step) in steps {
            let outcome = self.apply(step).map_err(|source| StepFailed {
                line: *line,
                source,
            })?;
            match outcome {
                Outcome::Applied => {}
                Outcome::Wait(d) => self.advance(d),
                Outcome::Snapshot(s) => on_snapshot(*line, &s),
            }
        }
        Ok(())
    }
}
