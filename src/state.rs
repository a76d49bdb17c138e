use serde::{Deserialize, Serialize};
use std::collections::HashMap;

pub const IMAGE_EXTENSIONS: [&str; 4] = ["jpg", "jpeg", "png", "gif"];
pub const FRAGMENT_EXTENSIONS: [&str; 10] = [
    "htm", "html", "php", "cfm", "asp", "aspx", "jsp", "jst", "rb", "txt",
];

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ContentKind {
    Image,
    Fragment,
    Unrecognized,
}

impl ContentKind {
    /// Classify a URL by the extension of its path, ignoring case, the query
    /// string and any `#fragment`.
    pub fn classify(url: &str) -> Self {
        let path = url.split(['?', '#']).next().unwrap_or_default();
        let last_segment = path.rsplit('/').next().unwrap_or_default();
        let Some((_, extension)) = last_segment.rsplit_once('.') else {
            return ContentKind::Unrecognized;
        };
        let extension = extension.to_lowercase();

        if IMAGE_EXTENSIONS.contains(&extension.as_str()) {
            ContentKind::Image
        } else if FRAGMENT_EXTENSIONS.contains(&extension.as_str()) {
            ContentKind::Fragment
        } else {
            ContentKind::Unrecognized
        }
    }
}

#[derive(Serialize, Deserialize, Clone, Copy, Debug, Default, PartialEq)]
pub struct Size {
    pub width: f64,
    pub height: f64,
}

impl Size {
    pub fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }
}

/// An element on the page that opens the viewer when clicked.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct Trigger {
    pub url: String,
    pub caption: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub group: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub caption_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub printable: Option<String>,
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

impl Trigger {
    pub fn new(url: impl Into<String>, caption: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            caption: caption.into(),
            group: None,
            caption_id: None,
            printable: None,
        }
    }

    /// Build a trigger from raw anchor attributes. The caption falls back from
    /// `title` to the element text and finally to the url itself.
    pub fn from_attributes(
        href: String,
        title: Option<String>,
        text: Option<String>,
        rel: Option<String>,
        id: Option<String>,
        name: Option<String>,
    ) -> Self {
        let caption = non_empty(title)
            .or_else(|| non_empty(text).map(|t| t.trim().to_string()))
            .unwrap_or_else(|| href.clone());

        Self {
            url: href,
            caption,
            group: non_empty(rel),
            caption_id: non_empty(id),
            printable: non_empty(name),
        }
    }

    pub fn with_group(mut self, group: impl Into<String>) -> Self {
        self.group = Some(group.into());
        self
    }

    pub fn kind(&self) -> ContentKind {
        ContentKind::classify(&self.url)
    }
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct Neighbor {
    pub caption: String,
    pub url: String,
}

impl From<&Trigger> for Neighbor {
    fn from(trigger: &Trigger) -> Self {
        Self {
            caption: trigger.caption.clone(),
            url: trigger.url.clone(),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Direction {
    Previous,
    Next,
}

/// What the group scan learned about the requested url.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ScanResult {
    pub previous: Option<Neighbor>,
    pub next: Option<Neighbor>,
    pub printable: Option<String>,
    pub caption_id: Option<String>,
}

impl ScanResult {
    pub fn neighbor(&self, direction: Direction) -> Option<&Neighbor> {
        match direction {
            Direction::Previous => self.previous.as_ref(),
            Direction::Next => self.next.as_ref(),
        }
    }
}

/// Find the prev/next chain around the first trigger whose url equals `url`.
///
/// Only image triggers with a different url are candidates. The nearest
/// preceding candidate is dropped when it belongs to another group; the next
/// one is the first following candidate in the same group.
pub fn scan_group(triggers: &[Trigger], url: &str) -> ScanResult {
    let Some(index) = triggers.iter().position(|t| t.url == url) else {
        return ScanResult::default();
    };
    let current = &triggers[index];
    let is_candidate = |t: &&Trigger| t.url != url && t.kind() == ContentKind::Image;

    let previous = triggers[..index]
        .iter()
        .rev()
        .find(is_candidate)
        .filter(|t| t.group == current.group)
        .map(Neighbor::from);

    let next = triggers[index + 1..]
        .iter()
        .filter(is_candidate)
        .find(|t| t.group == current.group)
        .map(Neighbor::from);

    ScanResult {
        previous,
        next,
        printable: current.printable.clone(),
        caption_id: current.caption_id.clone(),
    }
}

/// Shrink `natural` into `bounds` keeping its aspect ratio. Never upscales.
pub fn fit_within(natural: Size, bounds: Size) -> Size {
    let Size { mut width, mut height } = natural;
    if width <= 0.0 || height <= 0.0 {
        return natural;
    }
    let max_w = bounds.width.max(0.0);
    let max_h = bounds.height.max(0.0);

    if width > max_w {
        height *= max_w / width;
        width = max_w;
        if height > max_h {
            width *= max_h / height;
            height = max_h;
        }
    } else if height > max_h {
        width *= max_h / height;
        height = max_h;
        if width > max_w {
            height *= max_w / width;
            width = max_w;
        }
    }

    Size::new(width, height)
}

/// Parse the query part of `url` into key/value pairs.
///
/// Pairs are separated by `&` or `;`; anything that is not exactly
/// `key=value` is skipped. Values are percent-decoded before `+` becomes a
/// space, so an escaped `%2B` also ends up as a space.
pub fn parse_query(url: &str) -> HashMap<String, String> {
    let mut params = HashMap::new();
    let Some((_, query)) = url.split_once('?') else {
        return params;
    };
    let query = query.split('#').next().unwrap_or_default();

    for pair in query.split(['&', ';']) {
        let parts: Vec<&str> = pair.split('=').collect();
        if parts.len() != 2 {
            continue;
        }
        params.insert(decode_component(parts[0]), decode_component(parts[1]).replace('+', " "));
    }
    params
}

fn decode_component(raw: &str) -> String {
    urlencoding::decode(raw)
        .map(|decoded| decoded.into_owned())
        .unwrap_or_else(|_| raw.to_string())
}

#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct PageMetrics {
    pub viewport: Size,
    pub scroll_y: f64,
    pub document_height: f64,
}

impl PageMetrics {
    /// The backdrop covers the whole document, or the viewport on short pages.
    pub fn backdrop_height(&self) -> f64 {
        self.document_height.max(self.viewport.height)
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct FramePlacement {
    pub left: f64,
    pub top: f64,
    pub width: f64,
    pub height: f64,
    pub backdrop_height: f64,
}

/// Center a frame in the visible part of the page and stretch the backdrop
/// over the whole document.
pub fn place_frame(page: &PageMetrics, frame: Size) -> FramePlacement {
    FramePlacement {
        left: (page.viewport.width - frame.width) / 2.0,
        top: page.scroll_y + (page.viewport.height - frame.height) / 2.0,
        width: frame.width,
        height: frame.height,
        backdrop_height: page.backdrop_height(),
    }
}
