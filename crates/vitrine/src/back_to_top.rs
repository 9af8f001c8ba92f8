use crate::config::BackToTopConfig;
use crate::events::UiEvent;
use pagehost::{Dom, Host, NodeId, ScrollBehavior, Window};

pub const SHOWN: &str = "block";
pub const HIDDEN: &str = "none";

/// Shown strictly past the threshold.
pub fn is_visible(scroll_y: f64, threshold: f64) -> bool {
    scroll_y > threshold
}

#[derive(Debug)]
pub struct BackToTop {
    button: NodeId,
    threshold: f64,
    behavior: ScrollBehavior,
}

impl BackToTop {
    /// Finds the button and applies the visibility for the current offset,
    /// so an already scrolled page starts out right.
    pub fn mount<H: Host + ?Sized>(host: &mut H, config: &BackToTopConfig) -> Option<Self> {
        let Some(button) = host.element_by_id(&config.button_id) else {
            log::debug!("no back-to-top button #{}", config.button_id);
            return None;
        };

        let control = Self {
            button,
            threshold: config.threshold,
            behavior: config.behavior,
        };
        control.update(host);
        log::info!("back-to-top mounted on #{}", config.button_id);
        Some(control)
    }

    pub fn button(&self) -> NodeId {
        self.button
    }

    pub fn handle<H: Host + ?Sized>(&mut self, host: &mut H, event: &UiEvent) {
        match *event {
            UiEvent::Scroll => self.update(host),
            UiEvent::Click(target) if host.contains(self.button, target) => {
                log::debug!("scrolling to top ({})", self.behavior);
                host.scroll_to(0.0, self.behavior);
            }
            _ => {}
        }
    }

    pub fn reconfigure<H: Host + ?Sized>(&mut self, host: &mut H, config: &BackToTopConfig) {
        self.threshold = config.threshold;
        self.behavior = config.behavior;
        self.update(host);
    }

    fn update<H: Dom + Window + ?Sized>(&self, host: &mut H) {
        let display = if is_visible(host.scroll_y(), self.threshold) {
            SHOWN
        } else {
            HIDDEN
        };
        host.set_style(self.button, "display", display);
    }
}
