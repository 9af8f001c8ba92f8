use super::model::{CarouselState, Origin};
use super::{Autoplay, CarouselParts, MountError, view};
use crate::config::CarouselConfig;
use crate::events::UiEvent;
use pagehost::{ClassName, Dom, Host, NodeId, Point, PointerId, TimerId};
use std::num::NonZeroUsize;

/// A mounted carousel. Every input converges on [`Carousel::go_to`].
#[derive(Debug)]
pub struct Carousel {
    parts: CarouselParts,
    dots: Vec<NodeId>,
    state: CarouselState,
    autoplay: Autoplay,
    config: CarouselConfig,
}

impl Carousel {
    /// Builds the dots, renders slide 0 and starts autoplay. Returns
    /// `Ok(None)` when the page has no carousel.
    pub fn mount<H: Host + ?Sized>(
        host: &mut H,
        config: &CarouselConfig,
    ) -> Result<Option<Self>, MountError> {
        let Some(parts) = CarouselParts::locate(host, config)? else {
            log::debug!("no carousel matching '{}'", config.root);
            return Ok(None);
        };
        let len = NonZeroUsize::new(parts.slides.len())
            .ok_or_else(|| MountError::NoSlides(config.slide.clone()))?;

        let dots = view::build_dots(host, &parts, config);
        let mut carousel = Self {
            parts,
            dots,
            state: CarouselState::new(len),
            autoplay: Autoplay::new(config.autoplay_interval()),
            config: config.clone(),
        };

        carousel.render(host);
        carousel.autoplay.start(host);
        log::info!("carousel mounted with {} slides", len);
        Ok(Some(carousel))
    }

    pub fn index(&self) -> usize {
        self.state.index()
    }

    pub fn slide_count(&self) -> usize {
        self.state.slide_count()
    }

    pub fn is_hovering(&self) -> bool {
        self.state.is_hovering()
    }

    pub fn parts(&self) -> &CarouselParts {
        &self.parts
    }

    pub fn dots(&self) -> &[NodeId] {
        &self.dots
    }

    pub fn autoplay(&self) -> &Autoplay {
        &self.autoplay
    }

    pub fn active_class(&self) -> &ClassName {
        &self.config.active_class
    }

    pub fn go_to<H: Host + ?Sized>(&mut self, host: &mut H, target: isize, origin: Origin) {
        let index = self.state.set_index(target);
        log::debug!("carousel at slide {} ({:?})", index, origin);
        self.render(host);

        if origin == Origin::User {
            self.autoplay.restart(host);
        }
    }

    pub fn next<H: Host + ?Sized>(&mut self, host: &mut H, origin: Origin) {
        self.go_to(host, self.state.step_target(1), origin);
    }

    pub fn previous<H: Host + ?Sized>(&mut self, host: &mut H, origin: Origin) {
        self.go_to(host, self.state.step_target(-1), origin);
    }

    pub fn render<D: Dom + ?Sized>(&self, dom: &mut D) {
        view::render(
            dom,
            &self.parts,
            &self.dots,
            &self.state,
            &self.config.active_class,
        );
    }

    pub fn handle<H: Host + ?Sized>(&mut self, host: &mut H, event: &UiEvent) {
        match *event {
            UiEvent::Click(target) => self.on_click(host, target),
            UiEvent::MouseEnter(target) if target == self.parts.root => {
                self.state.set_hovering(true)
            }
            UiEvent::MouseLeave(target) if target == self.parts.root => {
                self.state.set_hovering(false)
            }
            UiEvent::KeyDown { target, key } if host.contains(self.parts.viewport, target) => {
                if key == self.config.next_key {
                    self.next(host, Origin::User);
                } else if key == self.config.prev_key {
                    self.previous(host, Origin::User);
                }
            }
            UiEvent::PointerDown {
                target,
                pointer,
                position,
            } if host.contains(self.parts.viewport, target) => {
                self.on_pointer_down(host, pointer, position)
            }
            UiEvent::PointerUp {
                target,
                pointer,
                position,
            } if self.receives_pointer(host, target, pointer) => {
                self.on_pointer_up(host, pointer, position)
            }
            UiEvent::PointerCancel { target, pointer }
                if self.receives_pointer(host, target, pointer) =>
            {
                self.release_gesture_pointer(host, pointer);
                self.state.cancel_gesture();
            }
            UiEvent::Resize => self.render(host),
            UiEvent::Tick(id) => self.on_tick(host, id),
            _ => {}
        }
    }

    /// Applies reloaded settings. Selectors only take effect on the next
    /// mount; timing, keys and labels apply immediately.
    pub fn reconfigure<H: Host + ?Sized>(&mut self, host: &mut H, config: &CarouselConfig) {
        if config.active_class != self.config.active_class {
            for &dot in &self.dots {
                host.toggle_class(dot, &self.config.active_class, false);
            }
        }
        self.config = config.clone();
        self.render(host);
        self.autoplay.set_period(config.autoplay_interval());
        self.autoplay.restart(host);
    }

    pub fn unmount<H: Host + ?Sized>(mut self, host: &mut H) {
        self.autoplay.stop(host);
    }

    fn on_click<H: Host + ?Sized>(&mut self, host: &mut H, target: NodeId) {
        if host.contains(self.parts.next, target) {
            self.next(host, Origin::User);
        } else if host.contains(self.parts.prev, target) {
            self.previous(host, Origin::User);
        } else if let Some(i) = self.dots.iter().position(|&d| host.contains(d, target)) {
            self.go_to(host, i as isize, Origin::User);
        }
    }

    // the viewport holds pointer capture for the whole gesture
    fn receives_pointer<D: Dom + ?Sized>(
        &self,
        dom: &D,
        target: NodeId,
        pointer: PointerId,
    ) -> bool {
        self.state.gesture_pointer() == Some(pointer) || dom.contains(self.parts.viewport, target)
    }

    fn on_pointer_down<H: Host + ?Sized>(&mut self, host: &mut H, pointer: PointerId, at: Point) {
        self.state.begin_gesture(pointer, at.x);
        host.set_pointer_capture(self.parts.viewport, pointer);
    }

    fn on_pointer_up<H: Host + ?Sized>(&mut self, host: &mut H, pointer: PointerId, at: Point) {
        self.release_gesture_pointer(host, pointer);
        let swipe = self.state.end_gesture(at.x, self.config.swipe_threshold);

        if let Some(swipe) = swipe {
            log::debug!("swipe {:?}", swipe);
            self.go_to(host, self.state.step_target(swipe.step()), Origin::User);
        }
    }

    // capture belongs to the pointer that started the gesture
    fn release_gesture_pointer<D: Dom + ?Sized>(&self, dom: &mut D, fallback: PointerId) {
        let pointer = self.state.gesture_pointer().unwrap_or(fallback);
        dom.release_pointer_capture(self.parts.viewport, pointer);
    }

    fn on_tick<H: Host + ?Sized>(&mut self, host: &mut H, id: TimerId) {
        if !self.autoplay.owns(id) {
            return;
        }
        if self.state.is_hovering() {
            log::trace!("autoplay tick skipped while hovered");
            return;
        }
        self.next(host, Origin::Autoplay);
    }
}
