pub mod autoplay;
pub mod controller;
pub mod model;
pub mod view;

pub use autoplay::Autoplay;
pub use controller::Carousel;
pub use model::{CarouselState, Origin, Swipe};

use crate::config::CarouselConfig;
use pagehost::{Dom, NodeId, Selector};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum MountError {
    #[error("carousel has no {role} matching '{selector}'")]
    MissingPart {
        role: &'static str,
        selector: Selector,
    },
    #[error("carousel has no slides matching '{0}'")]
    NoSlides(Selector),
}

/// The elements a carousel is wired to, located once at mount.
#[derive(Debug, Clone)]
pub struct CarouselParts {
    pub root: NodeId,
    pub track: NodeId,
    pub slides: Vec<NodeId>,
    pub prev: NodeId,
    pub next: NodeId,
    pub dots: NodeId,
    pub viewport: NodeId,
}

impl CarouselParts {
    /// `Ok(None)` when the page has no carousel root at all.
    pub fn locate<D: Dom + ?Sized>(
        dom: &D,
        config: &CarouselConfig,
    ) -> Result<Option<Self>, MountError> {
        let Some(root) = dom.query(None, &config.root) else {
            return Ok(None);
        };

        let part = |role: &'static str, selector: &Selector| {
            dom.query(Some(root), selector)
                .ok_or_else(|| MountError::MissingPart {
                    role,
                    selector: selector.clone(),
                })
        };

        let slides = dom.query_all(Some(root), &config.slide);
        if slides.is_empty() {
            return Err(MountError::NoSlides(config.slide.clone()));
        }

        Ok(Some(Self {
            root,
            track: part("track", &config.track)?,
            slides,
            prev: part("previous button", &config.prev)?,
            next: part("next button", &config.next)?,
            dots: part("dot container", &config.dots)?,
            viewport: part("viewport", &config.viewport)?,
        }))
    }
}
