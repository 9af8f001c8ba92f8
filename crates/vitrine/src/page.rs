use crate::back_to_top::BackToTop;
use crate::carousel::Carousel;
use crate::config::Config;
use crate::events::UiEvent;
use pagehost::{Dom, Host, Window};
use std::fmt;

/// Both page behaviors, mounted independently. Either may be absent.
#[derive(Debug, Default)]
pub struct Page {
    pub carousel: Option<Carousel>,
    pub back_to_top: Option<BackToTop>,
}

impl Page {
    pub fn mount<H: Host + ?Sized>(host: &mut H, config: &Config) -> Self {
        let carousel = match Carousel::mount(host, &config.carousel) {
            Ok(c) => c,
            Err(e) => {
                log::warn!("Carousel not mounted: {}", e);
                None
            }
        };
        let back_to_top = BackToTop::mount(host, &config.back_to_top);

        Self {
            carousel,
            back_to_top,
        }
    }

    pub fn dispatch<H: Host + ?Sized>(&mut self, host: &mut H, event: &UiEvent) {
        log::trace!("dispatch {:?}", event);
        if let Some(carousel) = &mut self.carousel {
            carousel.handle(host, event);
        }
        if let Some(back_to_top) = &mut self.back_to_top {
            back_to_top.handle(host, event);
        }
    }

    pub fn reconfigure<H: Host + ?Sized>(&mut self, host: &mut H, config: &Config) {
        if let Some(carousel) = &mut self.carousel {
            carousel.reconfigure(host, &config.carousel);
        }
        if let Some(back_to_top) = &mut self.back_to_top {
            back_to_top.reconfigure(host, &config.back_to_top);
        }
        log::info!("Configuration applied");
    }

    pub fn snapshot<D: Dom + Window + ?Sized>(&self, dom: &D) -> PageSnapshot {
        let carousel = self.carousel.as_ref().map(|c| CarouselSnapshot {
            index: c.index(),
            transform: dom
                .style(c.parts().track, "transform")
                .unwrap_or_default(),
            active_dots: c
                .dots()
                .iter()
                .enumerate()
                .filter(|(_, d)| dom.has_class(**d, c.active_class()))
                .map(|(i, _)| i)
                .collect(),
            hovering: c.is_hovering(),
        });

        PageSnapshot {
            carousel,
            to_top: self
                .back_to_top
                .as_ref()
                .and_then(|b| dom.style(b.button(), "display")),
            scroll_y: dom.scroll_y(),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct CarouselSnapshot {
    pub index: usize,
    pub transform: String,
    pub active_dots: Vec<usize>,
    pub hovering: bool,
}

/// Observable page state, as a test or a person watching would see it.
#[derive(Debug, Clone, PartialEq)]
pub struct PageSnapshot {
    pub carousel: Option<CarouselSnapshot>,
    pub to_top: Option<String>,
    pub scroll_y: f64,
}

impl fmt::Display for PageSnapshot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.carousel {
            Some(c) => write!(
                f,
                "slide={} transform={} dots={:?}{}",
                c.index,
                c.transform,
                c.active_dots,
                if c.hovering { " hover" } else { "" }
            )?,
            None => write!(f, "carousel=none")?,
        }
        write!(
            f,
            " to_top={} scroll_y={}",
            self.to_top.as_deref().unwrap_or("none"),
            self.scroll_y
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixture::PageFixture;
    use pagehost::{MemoryDom, VirtualClock};

    #[test]
    fn test_page_without_either_unit_is_empty() {
        let mut dom = MemoryDom::new();
        let config = Config::default();
        let mut page = Page::mount(&mut dom, &config);

        assert!(page.carousel.is_none());
        assert!(page.back_to_top.is_none());
        page.dispatch(&mut dom, &UiEvent::Resize);
        assert_eq!(dom.timers().pending(), 0);
        assert_eq!(
            page.snapshot(&dom).to_string(),
            "carousel=none to_top=none scroll_y=0"
        );
    }

    #[test]
    fn test_zero_slides_leaves_carousel_unmounted() {
        let config = Config::default();
        let mut dom = PageFixture::with_skills(0)
            .build(&config, VirtualClock::new())
            .unwrap();
        let page = Page::mount(&mut dom, &config);

        assert!(page.carousel.is_none());
        assert!(page.back_to_top.is_some());
        assert_eq!(dom.timers().pending(), 0);
    }

    #[test]
    fn test_snapshot_follows_reloaded_active_class() {
        let mut config = Config::default();
        let mut dom = PageFixture::with_skills(4)
            .build(&config, VirtualClock::new())
            .unwrap();
        let mut page = Page::mount(&mut dom, &config);

        config.carousel.active_class = pagehost::ClassName::from("current");
        page.reconfigure(&mut dom, &config);
        let carousel = page.snapshot(&dom).carousel.unwrap();
        assert_eq!(carousel.active_dots, vec![0]);
    }

    #[test]
    fn test_snapshot_display() {
        let config = Config::default();
        let mut dom = PageFixture::with_skills(3)
            .build(&config, VirtualClock::new())
            .unwrap();
        let page = Page::mount(&mut dom, &config);

        assert_eq!(
            page.snapshot(&dom).to_string(),
            "slide=0 transform=translateX(0px) dots=[0] to_top=none scroll_y=0"
        );
    }
}
