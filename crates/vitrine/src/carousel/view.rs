use super::CarouselParts;
use super::model::CarouselState;
use crate::config::CarouselConfig;
use pagehost::{ClassName, Dom, NodeId, Selector, TagName, translate_x};

const LABEL_TEXT: &str = "span";
const LABEL_IMAGE: &str = "img";

/// Readable name for a slide: its text span, else its image alt text, else
/// the fallback.
pub fn slide_label<D: Dom + ?Sized>(dom: &D, slide: NodeId, fallback: &str) -> String {
    let text = dom
        .query(Some(slide), &Selector::from(LABEL_TEXT))
        .map(|span| dom.text_content(span).trim().to_string())
        .filter(|t| !t.is_empty());

    let alt = || {
        dom.query(Some(slide), &Selector::from(LABEL_IMAGE))
            .and_then(|img| dom.attribute(img, "alt"))
            .map(|a| a.trim().to_string())
            .filter(|a| !a.is_empty())
    };

    text.or_else(alt).unwrap_or_else(|| fallback.to_string())
}

pub fn dot_label(slide_label: &str) -> String {
    format!("Go to {slide_label} slide")
}

/// Empties the dot container and appends one button per slide, in slide
/// order.
pub fn build_dots<D: Dom + ?Sized>(
    dom: &mut D,
    parts: &CarouselParts,
    config: &CarouselConfig,
) -> Vec<NodeId> {
    dom.clear_children(parts.dots);

    let button = TagName::from("button");
    parts
        .slides
        .iter()
        .map(|&slide| {
            let label = slide_label(dom, slide, &config.fallback_label);
            let dot = dom.create_element(parts.dots, &button);
            dom.toggle_class(dot, &config.dot_class, true);
            dom.set_attribute(dot, "type", "button");
            dom.set_attribute(dot, "aria-label", &dot_label(&label));
            dot
        })
        .collect()
}

/// Positions the track at the current index using the live width of the
/// first slide and marks exactly the matching dot active.
pub fn render<D: Dom + ?Sized>(
    dom: &mut D,
    parts: &CarouselParts,
    dots: &[NodeId],
    state: &CarouselState,
    active: &ClassName,
) {
    let width = parts
        .slides
        .first()
        .map(|&s| dom.bounding_width(s))
        .unwrap_or_default();
    dom.set_style(parts.track, "transform", &translate_x(state.offset(width)));

    for (i, &dot) in dots.iter().enumerate() {
        dom.toggle_class(dot, active, i == state.index());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pagehost::{ElementSpec, MemoryDom};

    fn slide(dom: &mut MemoryDom, text: Option<&str>, alt: Option<&str>) -> NodeId {
        let s = dom
            .append(dom.body(), ElementSpec::new("div").class("sc-slide"))
            .unwrap();
        if let Some(alt) = alt {
            dom.append(s, ElementSpec::new("img").attr("alt", alt))
                .unwrap();
        }
        if let Some(text) = text {
            dom.append(s, ElementSpec::new("span").text(text)).unwrap();
        }
        s
    }

    #[test]
    fn test_label_prefers_text_then_alt_then_fallback() {
        let mut dom = MemoryDom::new();
        let both = slide(&mut dom, Some("  Rust "), Some("Rust logo"));
        let alt_only = slide(&mut dom, None, Some(" Docker logo "));
        let blank_text = slide(&mut dom, Some("   "), Some("Go"));
        let nothing = slide(&mut dom, Some(""), Some("  "));

        assert_eq!(slide_label(&dom, both, "skill"), "Rust");
        assert_eq!(slide_label(&dom, alt_only, "skill"), "Docker logo");
        assert_eq!(slide_label(&dom, blank_text, "skill"), "Go");
        assert_eq!(slide_label(&dom, nothing, "skill"), "skill");
    }

    #[test]
    fn test_dot_label_format() {
        assert_eq!(dot_label("Rust"), "Go to Rust slide");
    }
}
