//! Click events on anchors, as reported by the host

/// Modifier keys held during a click
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Modifiers {
    pub ctrl: bool,
    pub meta: bool,
    pub shift: bool,
    pub alt: bool,
}

impl Modifiers {
    pub fn any(&self) -> bool {
        self.ctrl || self.meta || self.shift || self.alt
    }
}

/// A click somewhere in the document
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LinkClick {
    /// `href` of the closest enclosing anchor, if any
    pub href: Option<String>,
    /// Anchor `target` attribute
    pub target: Option<String>,
    /// Mouse button, 0 being the primary one
    pub button: u16,
    pub modifiers: Modifiers,
    /// Anchor carries a `download` attribute
    pub download: bool,
}

impl LinkClick {
    /// Plain primary-button click on a link
    pub fn primary(href: impl Into<String>) -> Self {
        Self {
            href: Some(href.into()),
            ..Self::default()
        }
    }

    /// Whether the browser would open the link in place of the current page
    pub fn opens_in_place(&self) -> bool {
        let same_frame = match self.target.as_deref().map(str::trim) {
            None | Some("") => true,
            Some(target) => target.eq_ignore_ascii_case("_self"),
        };
        self.button == 0 && !self.modifiers.any() && !self.download && same_frame
    }
}
