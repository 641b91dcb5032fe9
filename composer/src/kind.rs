//! Component kinds and the containment schema.
//!
//! Every MJML body element the editor understands is a variant of
//! [`ComponentKind`]. The schema ([`ComponentKind::child_kinds`]) is a static
//! adjacency table: for each kind, the ordered list of kinds it may directly
//! contain. Kinds with an empty list are leaves.
//!
//! Nodes carry a [`Tag`] rather than a bare `ComponentKind` so that documents
//! containing tags outside the schema (imported or hand-edited markup) can
//! still be represented. Unknown tags are always leaves.

#[cfg(test)]
#[path = "kind_test.rs"]
mod kind_test;

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// An MJML body component kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ComponentKind {
    /// Document root. Accepts only top-level layout kinds.
    #[serde(rename = "mj-body")]
    Body,
    /// Groups several sections under a shared background.
    #[serde(rename = "mj-wrapper")]
    Wrapper,
    /// Row container.
    #[serde(rename = "mj-section")]
    Section,
    /// Row of columns that does not stack on mobile.
    #[serde(rename = "mj-group")]
    Group,
    /// Item container holding content leaves.
    #[serde(rename = "mj-column")]
    Column,
    /// Full-width hero, a section with a single column.
    #[serde(rename = "mj-hero")]
    Hero,
    #[serde(rename = "mj-text")]
    Text,
    #[serde(rename = "mj-image")]
    Image,
    #[serde(rename = "mj-button")]
    Button,
    #[serde(rename = "mj-divider")]
    Divider,
    #[serde(rename = "mj-spacer")]
    Spacer,
    #[serde(rename = "mj-table")]
    Table,
    /// Icon row.
    #[serde(rename = "mj-social")]
    Social,
    #[serde(rename = "mj-social-element")]
    SocialElement,
    /// Menu bar.
    #[serde(rename = "mj-navbar")]
    Navbar,
    #[serde(rename = "mj-navbar-link")]
    NavbarLink,
    /// Toggle list.
    #[serde(rename = "mj-accordion")]
    Accordion,
    #[serde(rename = "mj-accordion-element")]
    AccordionElement,
    #[serde(rename = "mj-accordion-title")]
    AccordionTitle,
    #[serde(rename = "mj-accordion-text")]
    AccordionText,
    /// Image slider.
    #[serde(rename = "mj-carousel")]
    Carousel,
    #[serde(rename = "mj-carousel-image")]
    CarouselImage,
    /// Passthrough markup, emitted unprocessed.
    #[serde(rename = "mj-raw")]
    Raw,
}

#[allow(clippy::enum_glob_use)]
use ComponentKind::*;

const BODY_CHILDREN: &[ComponentKind] = &[Section, Wrapper, Hero];
const WRAPPER_CHILDREN: &[ComponentKind] = &[Section];
const SECTION_CHILDREN: &[ComponentKind] = &[Column, Group, Raw];
const GROUP_CHILDREN: &[ComponentKind] = &[Column];
const COLUMN_CHILDREN: &[ComponentKind] =
    &[Text, Image, Button, Divider, Spacer, Social, Navbar, Table, Accordion, Carousel, Raw];
// Hero behaves like a single column but cannot hold a carousel.
const HERO_CHILDREN: &[ComponentKind] = &[Text, Image, Button, Divider, Spacer, Social, Navbar, Table, Accordion, Raw];
const NAVBAR_CHILDREN: &[ComponentKind] = &[NavbarLink];
const SOCIAL_CHILDREN: &[ComponentKind] = &[SocialElement];
const ACCORDION_CHILDREN: &[ComponentKind] = &[AccordionElement];
const ACCORDION_ELEMENT_CHILDREN: &[ComponentKind] = &[AccordionTitle, AccordionText];
const CAROUSEL_CHILDREN: &[ComponentKind] = &[CarouselImage];

impl ComponentKind {
    /// Every kind, in declaration order.
    pub const ALL: [ComponentKind; 23] = [
        Body,
        Wrapper,
        Section,
        Group,
        Column,
        Hero,
        Text,
        Image,
        Button,
        Divider,
        Spacer,
        Table,
        Social,
        SocialElement,
        Navbar,
        NavbarLink,
        Accordion,
        AccordionElement,
        AccordionTitle,
        AccordionText,
        Carousel,
        CarouselImage,
        Raw,
    ];

    /// The MJML tag name, e.g. `"mj-section"`.
    #[must_use]
    pub fn tag(self) -> &'static str {
        match self {
            Body => "mj-body",
            Wrapper => "mj-wrapper",
            Section => "mj-section",
            Group => "mj-group",
            Column => "mj-column",
            Hero => "mj-hero",
            Text => "mj-text",
            Image => "mj-image",
            Button => "mj-button",
            Divider => "mj-divider",
            Spacer => "mj-spacer",
            Table => "mj-table",
            Social => "mj-social",
            SocialElement => "mj-social-element",
            Navbar => "mj-navbar",
            NavbarLink => "mj-navbar-link",
            Accordion => "mj-accordion",
            AccordionElement => "mj-accordion-element",
            AccordionTitle => "mj-accordion-title",
            AccordionText => "mj-accordion-text",
            Carousel => "mj-carousel",
            CarouselImage => "mj-carousel-image",
            Raw => "mj-raw",
        }
    }

    /// Ordered list of kinds this kind may directly contain. Empty for leaves.
    #[must_use]
    pub fn child_kinds(self) -> &'static [ComponentKind] {
        match self {
            Body => BODY_CHILDREN,
            Wrapper => WRAPPER_CHILDREN,
            Section => SECTION_CHILDREN,
            Group => GROUP_CHILDREN,
            Column => COLUMN_CHILDREN,
            Hero => HERO_CHILDREN,
            Navbar => NAVBAR_CHILDREN,
            Social => SOCIAL_CHILDREN,
            Accordion => ACCORDION_CHILDREN,
            AccordionElement => ACCORDION_ELEMENT_CHILDREN,
            Carousel => CAROUSEL_CHILDREN,
            Text | Image | Button | Divider | Spacer | Table | SocialElement | NavbarLink | AccordionTitle
            | AccordionText | CarouselImage | Raw => &[],
        }
    }

    /// Whether this kind accepts any children at all.
    #[must_use]
    pub fn is_container(self) -> bool {
        !self.child_kinds().is_empty()
    }

    /// Whether `child` may appear directly under this kind.
    #[must_use]
    pub fn accepts(self, child: ComponentKind) -> bool {
        self.child_kinds().contains(&child)
    }

    /// Menu display name.
    #[must_use]
    pub fn display_name(self) -> &'static str {
        self.label().0
    }

    /// Menu description line.
    #[must_use]
    pub fn description(self) -> &'static str {
        self.label().1
    }

    fn label(self) -> (&'static str, &'static str) {
        match self {
            Body => ("Body", "Email body"),
            Wrapper => ("Wrapper", "Wrap multiple sections"),
            Section => ("Section", "Row container"),
            Group => ("Group", "Row that prevents stacking"),
            Column => ("Column", "Place content inside"),
            Hero => ("Hero", "Full-width hero"),
            Text => ("Text", "Paragraph or headings"),
            Image => ("Image", "Responsive image"),
            Button => ("Button", "Call to action"),
            Divider => ("Divider", "Horizontal rule"),
            Spacer => ("Spacer", "Vertical space"),
            Table => ("Table", "Tabular content"),
            Social => ("Social", "Social icon row"),
            SocialElement => ("Social item", "Icon + link"),
            Navbar => ("Navbar", "Menu bar"),
            NavbarLink => ("Navbar link", "Menu item"),
            Accordion => ("Accordion", "Toggle content"),
            AccordionElement => ("Accordion item", "One toggle"),
            AccordionTitle => ("Accordion title", "Clickable header"),
            AccordionText => ("Accordion text", "HTML content"),
            Carousel => ("Carousel", "Image slider"),
            CarouselImage => ("Carousel image", "Slide image"),
            Raw => ("Raw HTML", "Unprocessed area"),
        }
    }

    /// Whether the element's inner markup is an opaque payload rather than
    /// nested components. Used by export and import.
    #[must_use]
    pub fn has_content(self) -> bool {
        matches!(
            self,
            Text | Button | Table | Raw | NavbarLink | SocialElement | AccordionTitle | AccordionText
        )
    }
}

impl fmt::Display for ComponentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.tag())
    }
}

/// Error returned when a string is not a known MJML tag.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown component kind: {0}")]
pub struct UnknownKind(pub String);

impl FromStr for ComponentKind {
    type Err = UnknownKind;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .iter()
            .copied()
            .find(|k| k.tag() == s)
            .ok_or_else(|| UnknownKind(s.to_owned()))
    }
}

/// A node's kind identifier: a schema kind, or a tag the schema does not know.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Tag {
    Known(ComponentKind),
    Other(String),
}

impl Tag {
    /// The tag name as written in markup.
    #[must_use]
    pub fn as_str(&self) -> &str {
        match self {
            Self::Known(kind) => kind.tag(),
            Self::Other(name) => name,
        }
    }

    /// The schema kind, if known.
    #[must_use]
    pub fn kind(&self) -> Option<ComponentKind> {
        match self {
            Self::Known(kind) => Some(*kind),
            Self::Other(_) => None,
        }
    }

    /// Child kinds for this tag; empty for unknown tags.
    #[must_use]
    pub fn child_kinds(&self) -> &'static [ComponentKind] {
        self.kind().map_or(&[], ComponentKind::child_kinds)
    }

    #[must_use]
    pub fn is_container(&self) -> bool {
        !self.child_kinds().is_empty()
    }

    /// Whether `child` may appear directly under this tag. Unknown children are
    /// never accepted.
    #[must_use]
    pub fn accepts(&self, child: &Tag) -> bool {
        child.kind().is_some_and(|c| self.child_kinds().contains(&c))
    }
}

impl From<ComponentKind> for Tag {
    fn from(kind: ComponentKind) -> Self {
        Self::Known(kind)
    }
}

impl From<&str> for Tag {
    fn from(s: &str) -> Self {
        s.parse().map_or_else(|_| Self::Other(s.to_owned()), Self::Known)
    }
}

impl From<String> for Tag {
    fn from(s: String) -> Self {
        match s.parse() {
            Ok(kind) => Self::Known(kind),
            Err(_) => Self::Other(s),
        }
    }
}

impl From<Tag> for String {
    fn from(tag: Tag) -> Self {
        match tag {
            Tag::Known(kind) => kind.tag().to_owned(),
            Tag::Other(name) => name,
        }
    }
}

impl fmt::Display for Tag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
