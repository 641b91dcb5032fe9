//! Subtree synthesizer: default-populated definitions per component kind.
//!
//! Containers that need at least one child get it; composites get their
//! mandatory sub-elements; leaves get placeholder content or a placeholder
//! attribute. Every template already satisfies the containment schema.

#[cfg(test)]
#[path = "synth_test.rs"]
mod synth_test;

use crate::doc::ComponentDef;
use crate::kind::{ComponentKind, Tag};

pub const PLACEHOLDER_HREF: &str = "#";
pub const PLACEHOLDER_IMAGE_SRC: &str = "https://via.placeholder.com/600x200";
pub const PLACEHOLDER_HERO_BACKGROUND: &str = "https://images.unsplash.com/photo-1500530855697-b586d89ba3ee?w=1200";
pub const PLACEHOLDER_SLIDE_SRCS: [&str; 2] = [
    "https://via.placeholder.com/600x300?text=Slide+1",
    "https://via.placeholder.com/600x300?text=Slide+2",
];
pub const PLACEHOLDER_SOCIAL_NAMES: [&str; 2] = ["facebook", "twitter"];

/// Build the default subtree for `tag`.
///
/// Unknown tags produce an empty instance of the requested tag. That is a
/// permissive default rather than an error so gaps in the schema never block
/// the user.
#[must_use]
pub fn instantiate(tag: &Tag) -> ComponentDef {
    match tag {
        Tag::Known(kind) => instantiate_kind(*kind),
        Tag::Other(_) => ComponentDef::new(tag.clone()),
    }
}

/// Build the default subtree for a schema kind.
#[must_use]
pub fn instantiate_kind(kind: ComponentKind) -> ComponentDef {
    match kind {
        ComponentKind::Body => ComponentDef::new(kind),
        ComponentKind::Wrapper => ComponentDef::new(kind).with_child(instantiate_kind(ComponentKind::Section)),
        // Columns nested by a layout template start empty; only a directly
        // inserted column gets placeholder text.
        ComponentKind::Section => ComponentDef::new(kind).with_child(ComponentDef::new(ComponentKind::Column)),
        ComponentKind::Group => ComponentDef::new(kind)
            .with_child(ComponentDef::new(ComponentKind::Column))
            .with_child(ComponentDef::new(ComponentKind::Column)),
        ComponentKind::Column => {
            ComponentDef::new(kind).with_child(ComponentDef::new(ComponentKind::Text).with_content("Column"))
        }
        ComponentKind::Hero => ComponentDef::new(kind)
            .with_attr("background-url", PLACEHOLDER_HERO_BACKGROUND)
            .with_attr("background-width", "600px")
            .with_attr("background-height", "200px")
            .with_child(ComponentDef::new(ComponentKind::Text).with_content("Your hero text")),
        ComponentKind::Navbar => ComponentDef::new(kind).with_child(
            ComponentDef::new(ComponentKind::NavbarLink)
                .with_content("Home")
                .with_attr("href", PLACEHOLDER_HREF),
        ),
        ComponentKind::Social => PLACEHOLDER_SOCIAL_NAMES
            .iter()
            .fold(ComponentDef::new(kind), |def, name| def.with_child(social_element(name))),
        ComponentKind::Accordion => ComponentDef::new(kind).with_child(instantiate_kind(ComponentKind::AccordionElement)),
        ComponentKind::AccordionElement => ComponentDef::new(kind)
            .with_child(instantiate_kind(ComponentKind::AccordionTitle))
            .with_child(instantiate_kind(ComponentKind::AccordionText)),
        ComponentKind::Carousel => PLACEHOLDER_SLIDE_SRCS
            .iter()
            .fold(ComponentDef::new(kind), |def, src| {
                def.with_child(ComponentDef::new(ComponentKind::CarouselImage).with_attr("src", *src))
            }),
        ComponentKind::Text => ComponentDef::new(kind).with_content("New text"),
        ComponentKind::Button => ComponentDef::new(kind)
            .with_content("Click me")
            .with_attr("href", PLACEHOLDER_HREF),
        ComponentKind::Image => ComponentDef::new(kind).with_attr("src", PLACEHOLDER_IMAGE_SRC),
        ComponentKind::Divider => ComponentDef::new(kind).with_attr("border-width", "1px"),
        ComponentKind::Spacer => ComponentDef::new(kind).with_attr("height", "20px"),
        ComponentKind::Table => ComponentDef::new(kind).with_content("<tr><td>Cell</td></tr>"),
        ComponentKind::Raw => ComponentDef::new(kind).with_content("<!-- raw html -->"),
        ComponentKind::NavbarLink => ComponentDef::new(kind)
            .with_content("Link")
            .with_attr("href", PLACEHOLDER_HREF),
        ComponentKind::SocialElement => social_element(PLACEHOLDER_SOCIAL_NAMES[0]),
        ComponentKind::AccordionTitle => ComponentDef::new(kind).with_content("Title"),
        ComponentKind::AccordionText => ComponentDef::new(kind).with_content("<p>Accordion content</p>"),
        ComponentKind::CarouselImage => ComponentDef::new(kind).with_attr("src", PLACEHOLDER_SLIDE_SRCS[0]),
    }
}

fn social_element(name: &str) -> ComponentDef {
    ComponentDef::new(ComponentKind::SocialElement)
        .with_attr("name", name)
        .with_attr("href", PLACEHOLDER_HREF)
}
