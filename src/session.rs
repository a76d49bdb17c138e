use crate::config::{FragmentLayout, ViewerConfig};
use crate::error::ViewerError;
use crate::state::{fit_within, parse_query, scan_group, ContentKind, Direction, Neighbor, ScanResult, Size, Trigger};
use std::collections::HashMap;
use uuid::Uuid;

/// Identity of one `show` call. Async continuations carry it so a result
/// arriving after the session was replaced can be dropped.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct SessionId(Uuid);

impl SessionId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for SessionId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for SessionId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Lifecycle of an open session. A closed viewer has no session at all.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Phase {
    /// Waiting for the image to preload.
    Opening,
    /// Content is in the frame but the frame is not revealed yet.
    Rendering,
    Open,
    Closing,
}

#[derive(Clone, Debug, PartialEq)]
pub struct ImageContent {
    pub scan: ScanResult,
    pub display: Option<Size>,
}

#[derive(Clone, Debug, PartialEq)]
pub struct FragmentContent {
    pub layout: FragmentLayout,
    pub params: HashMap<String, String>,
    pub markup: Option<String>,
}

#[derive(Clone, Debug, PartialEq)]
pub enum Content {
    Image(ImageContent),
    Fragment(FragmentContent),
    Unrecognized,
}

#[derive(Clone, Debug, PartialEq)]
pub struct Session {
    pub id: SessionId,
    pub caption: String,
    pub url: String,
    pub phase: Phase,
    pub content: Content,
}

impl Session {
    /// Work out everything `show` needs before any async work starts.
    pub fn plan(triggers: &[Trigger], caption: &str, url: &str, config: &ViewerConfig) -> Result<Self, ViewerError> {
        let (phase, content) = match ContentKind::classify(url) {
            ContentKind::Image => (
                Phase::Opening,
                Content::Image(ImageContent {
                    scan: scan_group(triggers, url),
                    display: None,
                }),
            ),
            ContentKind::Fragment => {
                let params = parse_query(url);
                let layout = config.fragment_layout(&params)?;
                (
                    Phase::Rendering,
                    Content::Fragment(FragmentContent {
                        layout,
                        params,
                        markup: None,
                    }),
                )
            }
            ContentKind::Unrecognized => (Phase::Open, Content::Unrecognized),
        };

        Ok(Self {
            id: SessionId::new(),
            caption: caption.to_string(),
            url: url.to_string(),
            phase,
            content,
        })
    }

    pub fn kind(&self) -> ContentKind {
        match self.content {
            Content::Image(_) => ContentKind::Image,
            Content::Fragment(_) => ContentKind::Fragment,
            Content::Unrecognized => ContentKind::Unrecognized,
        }
    }

    /// Outer size of the content frame, once it is known.
    pub fn frame_size(&self, config: &ViewerConfig) -> Option<Size> {
        match &self.content {
            Content::Image(image) => image.display.map(|d| config.image_frame(d)),
            Content::Fragment(fragment) => Some(fragment.layout.frame),
            Content::Unrecognized => None,
        }
    }

    pub fn neighbor(&self, direction: Direction) -> Option<&Neighbor> {
        match &self.content {
            Content::Image(image) => image.scan.neighbor(direction),
            _ => None,
        }
    }

    pub fn shows_loading(&self) -> bool {
        matches!(self.phase, Phase::Opening | Phase::Rendering)
    }

    /// Record the preloaded image and size it for the viewport.
    pub fn image_loaded(&mut self, natural: Size, viewport: Size, config: &ViewerConfig) -> bool {
        if self.phase != Phase::Opening {
            return false;
        }
        let Content::Image(image) = &mut self.content else {
            return false;
        };
        image.display = Some(fit_within(natural, config.image_bounds(viewport)));
        self.phase = Phase::Rendering;
        true
    }

    pub fn fragment_loaded(&mut self, markup: String) -> bool {
        if self.phase != Phase::Rendering {
            return false;
        }
        let Content::Fragment(fragment) = &mut self.content else {
            return false;
        };
        if fragment.markup.is_some() {
            return false;
        }
        fragment.markup = Some(markup);
        true
    }

    /// Rendering -> Open. Fragments only reveal once their markup arrived.
    pub fn reveal(&mut self) -> bool {
        if self.phase != Phase::Rendering {
            return false;
        }
        if let Content::Fragment(fragment) = &self.content {
            if fragment.markup.is_none() {
                return false;
            }
        }
        self.phase = Phase::Open;
        true
    }

    pub fn begin_close(&mut self) -> bool {
        if self.phase == Phase::Closing {
            return false;
        }
        self.phase = Phase::Closing;
        true
    }
}
