use crate::config::Config;
use pagehost::{ElementSpec, HostError, MemoryDom, Selector};
use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;

const SKILLS: &[&str] = &[
    "Rust", "Go", "Python", "Docker", "Linux", "Postgres", "Kubernetes", "Git",
];

#[derive(Error, Debug)]
pub enum FixtureError {
    #[error("Fixture error: {0}")]
    Config(#[from] config::ConfigError),
    #[error(transparent)]
    Host(#[from] HostError),
    #[error("selector '{0}' is not a class selector")]
    UnsupportedSelector(Selector),
}

#[derive(Debug, Clone, Default, Deserialize, Serialize, PartialEq)]
pub struct SlideFixture {
    pub text: Option<String>,
    pub alt: Option<String>,
}

#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(default)]
pub struct PageFixture {
    pub carousel: bool,
    pub back_to_top: bool,
    pub slide_width: f64,
    pub scroll_y: f64,
    pub slides: Vec<SlideFixture>,
}

impl Default for PageFixture {
    fn default() -> Self {
        Self::with_skills(5)
    }
}

impl PageFixture {
    /// A page whose slides carry a logo and a name from a fixed skill list,
    /// cycling once the list runs out.
    pub fn with_skills(count: usize) -> Self {
        let slides = SKILLS
            .iter()
            .cycle()
            .take(count)
            .map(|name| SlideFixture {
                text: Some(name.to_string()),
                alt: Some(format!("{name} logo")),
            })
            .collect();

        Self {
            carousel: true,
            back_to_top: true,
            slide_width: 200.0,
            scroll_y: 0.0,
            slides,
        }
    }

    pub fn load(path: &Path) -> Result<Self, FixtureError> {
        let s = config::Config::builder()
            .add_source(config::File::from(path))
            .build()?;
        Ok(s.try_deserialize()?)
    }

    pub fn build<S>(&self, config: &Config, timers: S) -> Result<MemoryDom<S>, FixtureError> {
        let mut dom = MemoryDom::with_timers(timers);
        let body = dom.body();

        if self.carousel {
            let c = &config.carousel;
            let root = dom.append(body, element("section", &c.root)?)?;
            dom.append(root, element("button", &c.prev)?.attr("aria-label", "Previous"))?;
            let viewport = dom.append(root, element("div", &c.viewport)?.attr("tabindex", "0"))?;
            let track = dom.append(viewport, element("div", &c.track)?)?;

            for slide in &self.slides {
                let node = dom.append(track, element("div", &c.slide)?.width(self.slide_width))?;
                if let Some(alt) = &slide.alt {
                    dom.append(node, ElementSpec::new("img").attr("alt", alt))?;
                }
                if let Some(text) = &slide.text {
                    dom.append(node, ElementSpec::new("span").text(text))?;
                }
            }

            dom.append(root, element("button", &c.next)?.attr("aria-label", "Next"))?;
            dom.append(root, element("div", &c.dots)?)?;
        }

        if self.back_to_top {
            dom.append(
                body,
                ElementSpec::new("button")
                    .id(config.back_to_top.button_id.clone())
                    .attr("aria-label", "Back to top"),
            )?;
        }

        dom.set_scroll_y(self.scroll_y);
        dom.take_scroll_change();
        Ok(dom)
    }
}

fn element(tag: &str, selector: &Selector) -> Result<ElementSpec, FixtureError> {
    let class = selector
        .class_name()
        .ok_or_else(|| FixtureError::UnsupportedSelector(selector.clone()))?;
    Ok(ElementSpec::new(tag).class(class))
}

#[cfg(test)]
mod tests {
    use super::*;
    use pagehost::{Dom, VirtualClock, Window};

    #[test]
    fn test_build_matches_configured_selectors() {
        let config = Config::default();
        let dom = PageFixture::with_skills(4)
            .build(&config, VirtualClock::new())
            .unwrap();
        let c = &config.carousel;

        let root = dom.query(None, &c.root).unwrap();
        assert_eq!(dom.query_all(Some(root), &c.slide).len(), 4);
        for selector in [&c.track, &c.prev, &c.next, &c.dots, &c.viewport] {
            assert!(dom.query(Some(root), selector).is_some(), "{selector}");
        }
        assert!(dom.element_by_id(&config.back_to_top.button_id).is_some());
    }

    #[test]
    fn test_skills_cycle() {
        let fixture = PageFixture::with_skills(10);
        assert_eq!(fixture.slides[8].text.as_deref(), Some("Rust"));
        assert_eq!(fixture.slides[1].alt.as_deref(), Some("Go logo"));
    }

    #[test]
    fn test_toggles_and_initial_scroll() {
        let fixture = PageFixture {
            carousel: false,
            scroll_y: 640.0,
            ..PageFixture::default()
        };
        let config = Config::default();
        let mut dom = fixture.build(&config, VirtualClock::new()).unwrap();

        assert!(dom.query(None, &config.carousel.root).is_none());
        assert_eq!(dom.scroll_y(), 640.0);
        assert!(!dom.take_scroll_change());
    }

    #[test]
    fn test_non_class_selector_is_rejected() {
        let mut config = Config::default();
        config.carousel.track = Selector::from("#track");
        let err = PageFixture::default()
            .build(&config, VirtualClock::new())
            .unwrap_err();
        assert!(matches!(err, FixtureError::UnsupportedSelector(_)));
    }

    #[test]
    fn test_deserialize_from_toml() {
        let src = r#"
            slide_width = 150.0
            back_to_top = false

            [[slides]]
            text = "Rust"

            [[slides]]
            alt = "Ferris"
        "#;
        let s = config::Config::builder()
            .add_source(config::File::from_str(src, config::FileFormat::Toml))
            .build()
            .unwrap();
        let fixture: PageFixture = s.try_deserialize().unwrap();

        assert_eq!(fixture.slide_width, 150.0);
        assert!(fixture.carousel);
        assert!(!fixture.back_to_top);
        assert_eq!(fixture.slides.len(), 2);
        assert_eq!(fixture.slides[1].alt.as_deref(), Some("Ferris"));
        assert_eq!(fixture.slides[1].text, None);
    }

    #[test]
    fn test_demo_fixture_loads() {
        let path = Path::new(env!("CARGO_MANIFEST_DIR")).join("../../demos/skills.toml");
        let fixture = PageFixture::load(&path).unwrap();
        assert_eq!(fixture.slides.len(), 7);
        assert_eq!(fixture.slides[3].text, None);

        let config = Config::default();
        let dom = fixture.build(&config, VirtualClock::new()).unwrap();
        assert_eq!(dom.scroll_y(), 800.0);
    }
}
