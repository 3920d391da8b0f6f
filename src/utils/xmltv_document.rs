//! Quick-XML based XMLTV guide document
//!
//! The enrichment run has to write the guide back out untouched apart from
//! the icons it adds, so the document is kept as the full list of parsed
//! events. Programmes are indexed on top of that list: for each one we record
//! the fields the pipeline reads (title, categories, existing icon) and the
//! event position where a new `<icon>` element belongs.

use quick_xml::Reader;
use quick_xml::Writer;
use quick_xml::events::{BytesDecl, BytesStart, BytesText, Event};
use std::path::Path;
use tracing::debug;

use crate::errors::{AppError, AppResult};
use crate::utils::fs::write_atomic;

const PROGRAMME: &[u8] = b"programme";
const TITLE: &[u8] = b"title";
const CATEGORY: &[u8] = b"category";
const ICON: &[u8] = b"icon";

/// One `<programme>` entry as seen by the enrichment pipeline
#[derive(Debug, Clone, Default)]
pub struct Programme {
    title: Option<String>,
    categories: Vec<String>,
    has_existing_icon: bool,
    added_icon: Option<String>,
    /// Event index the added icon is written in front of
    insert_at: usize,
    /// Whitespace that precedes the programme's children, reused for the icon
    child_indent: Option<String>,
}

impl Programme {
    /// Text of the first `<title>` child; `None` when there is no title element
    pub fn title(&self) -> Option<&str> {
        self.title.as_deref()
    }

    /// Text of every `<category>` child, in document order
    pub fn categories(&self) -> &[String] {
        &self.categories
    }

    /// Whether the programme carries an icon, either from the source or added this run
    pub fn has_icon(&self) -> bool {
        self.has_existing_icon || self.added_icon.is_some()
    }

    /// Icon added during this run
    pub fn added_icon(&self) -> Option<&str> {
        self.added_icon.as_deref()
    }

    /// Attach an icon. Programmes that already have one are left alone and
    /// `false` is returned.
    pub fn set_icon(&mut self, src: impl Into<String>) -> bool {
        if self.has_icon() {
            return false;
        }
        self.added_icon = Some(src.into());
        true
    }
}

/// Partially built programme plus the capture state of its children
#[derive(Default)]
struct ProgrammeBuilder {
    programme: Programme,
    capture: Option<Capture>,
}

enum Capture {
    Title(String),
    Category(String),
}

/// An XMLTV guide held as its event stream plus a programme index
#[derive(Debug, Clone)]
pub struct GuideDocument {
    events: Vec<Event<'static>>,
    programmes: Vec<Programme>,
}

impl GuideDocument {
    /// Read and parse a guide from disk, decoding it by its declared encoding
    pub fn load(path: &Path) -> AppResult<Self> {
        let bytes = std::fs::read(path).map_err(|e| AppError::file_access(path, e))?;
        decode_guide(&bytes)
            .and_then(|content| Self::parse(&content))
            .map_err(|e| match e {
                AppError::Xml { message, .. } => {
                    AppError::xml(path.display().to_string(), message)
                }
                other => other,
            })
    }

    /// Parse XMLTV content, keeping every event for a faithful rewrite.
    ///
    /// The content is already UTF-8, so a declaration naming another encoding
    /// is rewritten to say UTF-8.
    pub fn parse(content: &str) -> AppResult<Self> {
        let mut reader = Reader::from_str(content);
        reader.config_mut().trim_text(false);

        let mut events: Vec<Event<'static>> = Vec::new();
        let mut programmes = Vec::new();
        let mut current: Option<ProgrammeBuilder> = None;
        let mut depth = 0usize;
        let mut seen_root = false;

        loop {
            let event = match reader.read_event().map_err(|e| {
                AppError::xml(
                    "guide document",
                    format!("{e} at position {}", reader.buffer_position()),
                )
            })? {
                Event::Decl(decl) => Event::Decl(utf8_declaration(decl)?),
                other => other,
            };

            match &event {
                Event::Start(e) => {
                    if depth == 0 {
                        seen_root = true;
                    }
                    if depth == 1 && e.name().as_ref() == PROGRAMME {
                        current = Some(ProgrammeBuilder::default());
                    } else if depth == 2 {
                        if let Some(builder) = current.as_mut() {
                            builder.note_child_indent(&events);
                            match e.name().as_ref() {
                                TITLE if builder.programme.title.is_none() => {
                                    builder.capture = Some(Capture::Title(String::new()));
                                }
                                CATEGORY => {
                                    builder.capture = Some(Capture::Category(String::new()));
                                }
                                ICON => builder.programme.has_existing_icon = true,
                                _ => {}
                            }
                        }
                    }
                    depth += 1;
                }

                Event::Empty(e) => {
                    if depth == 0 {
                        seen_root = true;
                    }
                    if depth == 1 && e.name().as_ref() == PROGRAMME {
                        // Self-closing programme: no title, never enriched
                        programmes.push(Programme {
                            insert_at: events.len(),
                            ..Programme::default()
                        });
                    } else if depth == 2 {
                        if let Some(builder) = current.as_mut() {
                            builder.note_child_indent(&events);
                            match e.name().as_ref() {
                                TITLE if builder.programme.title.is_none() => {
                                    builder.programme.title = Some(String::new());
                                }
                                CATEGORY => builder.programme.categories.push(String::new()),
                                ICON => builder.programme.has_existing_icon = true,
                                _ => {}
                            }
                        }
                    }
                }

                Event::End(e) => {
                    depth = depth.checked_sub(1).ok_or_else(|| {
                        AppError::document("closing tag without matching opening tag")
                    })?;
                    if depth == 2 {
                        if let Some(builder) = current.as_mut() {
                            builder.finish_capture();
                        }
                    } else if depth == 1 && e.name().as_ref() == PROGRAMME {
                        if let Some(builder) = current.take() {
                            let mut programme = builder.programme;
                            // The End event is about to be pushed at events.len()
                            programme.insert_at = match events.last() {
                                Some(Event::Text(text)) if is_whitespace(text) => events.len() - 1,
                                _ => events.len(),
                            };
                            programmes.push(programme);
                        }
                    }
                }

                Event::Text(e) => {
                    if let Some(capture) = current.as_mut().and_then(|b| b.capture.as_mut()) {
                        let text = e
                            .unescape()
                            .map_err(|err| AppError::xml("guide document", err))?;
                        capture.push_str(&text);
                    }
                }

                Event::CData(e) => {
                    if let Some(capture) = current.as_mut().and_then(|b| b.capture.as_mut()) {
                        capture.push_str(&String::from_utf8_lossy(e));
                    }
                }

                Event::Eof => break,

                _ => {} // Declarations, comments, doctype and PIs pass straight through
            }

            events.push(event.into_owned());
        }

        if depth != 0 {
            return Err(AppError::document("unexpected end of document: unclosed elements"));
        }
        if !seen_root {
            return Err(AppError::document("document has no root element"));
        }

        debug!(
            "Parsed guide with {} events and {} programmes",
            events.len(),
            programmes.len()
        );

        Ok(Self { events, programmes })
    }

    pub fn programmes(&self) -> &[Programme] {
        &self.programmes
    }

    pub fn programmes_mut(&mut self) -> &mut [Programme] {
        &mut self.programmes
    }

    /// Serialize the document with every added icon, prefixed by an XML
    /// declaration when the source had none.
    pub fn to_xml_bytes(&self) -> AppResult<Vec<u8>> {
        let mut writer = Writer::new(Vec::new());

        if !matches!(self.events.first(), Some(Event::Decl(_))) {
            writer
                .write_event(Event::Decl(BytesDecl::new("1.0", Some("utf-8"), None)))
                .map_err(|e| AppError::xml("guide output", e))?;
            writer
                .write_event(Event::Text(BytesText::from_escaped("\n")))
                .map_err(|e| AppError::xml("guide output", e))?;
        }

        let mut insertions = self
            .programmes
            .iter()
            .filter_map(|p| p.added_icon.as_deref().map(|src| (p.insert_at, p, src)))
            .peekable();

        for (index, event) in self.events.iter().enumerate() {
            while let Some((_, programme, src)) = insertions.next_if(|(at, _, _)| *at == index) {
                if let Some(indent) = &programme.child_indent {
                    writer
                        .write_event(Event::Text(BytesText::from_escaped(indent.as_str())))
                        .map_err(|e| AppError::xml("guide output", e))?;
                }
                let mut icon = BytesStart::new("icon");
                icon.push_attribute(("src", src));
                writer
                    .write_event(Event::Empty(icon))
                    .map_err(|e| AppError::xml("guide output", e))?;
            }

            writer
                .write_event(event.borrow())
                .map_err(|e| AppError::xml("guide output", e))?;
        }

        Ok(writer.into_inner())
    }

    /// Write the document to `path`, replacing whatever was there
    pub fn save(&self, path: &Path) -> AppResult<()> {
        let bytes = self.to_xml_bytes()?;
        write_atomic(path, &bytes)?;
        debug!("Wrote guide document to {}", path.display());
        Ok(())
    }
}

impl ProgrammeBuilder {
    /// Remember the indentation in front of the first child element
    fn note_child_indent(&mut self, events: &[Event<'static>]) {
        if self.programme.child_indent.is_some() {
            return;
        }
        if let Some(Event::Text(text)) = events.last() {
            if is_whitespace(text) {
                self.programme.child_indent = Some(String::from_utf8_lossy(text).into_owned());
            }
        }
    }

    fn finish_capture(&mut self) {
        match self.capture.take() {
            Some(Capture::Title(text)) => self.programme.title = Some(text),
            Some(Capture::Category(text)) => self.programme.categories.push(text),
            None => {}
        }
    }
}

impl Capture {
    fn push_str(&mut self, text: &str) {
        match self {
            Capture::Title(buf) | Capture::Category(buf) => buf.push_str(text),
        }
    }
}

/// Decode raw guide bytes to UTF-8 using the encoding named in the XML
/// declaration (UTF-8 when there is none). A byte order mark is dropped.
fn decode_guide(bytes: &[u8]) -> AppResult<String> {
    let mut reader = Reader::from_reader(bytes);
    // The declaration, when present, is the first event and settles the decoder
    reader
        .read_event()
        .map_err(|e| AppError::xml("guide document", e))?;
    let decoder = reader.decoder();

    let content = decoder.decode(bytes).map_err(|e| {
        AppError::xml(
            "guide document",
            format!("{e} (declared {})", decoder.encoding().name()),
        )
    })?;
    Ok(content
        .strip_prefix('\u{feff}')
        .unwrap_or(&content)
        .to_string())
}

/// Declaration with its encoding replaced by UTF-8, unless it already says so
fn utf8_declaration(decl: BytesDecl<'_>) -> AppResult<BytesDecl<'_>> {
    let declared = match decl.encoding() {
        Some(Ok(label)) => Some(label.into_owned()),
        Some(Err(e)) => return Err(AppError::xml("guide declaration", e)),
        None => None,
    };
    match declared {
        Some(label) if !label.eq_ignore_ascii_case(b"utf-8") => {}
        _ => return Ok(decl),
    }

    let version = decl
        .version()
        .map_err(|e| AppError::xml("guide declaration", e))?
        .into_owned();
    let standalone = match decl.standalone() {
        Some(Ok(value)) => Some(String::from_utf8_lossy(&value).into_owned()),
        Some(Err(e)) => return Err(AppError::xml("guide declaration", e)),
        None => None,
    };

    Ok(BytesDecl::new(
        &String::from_utf8_lossy(&version),
        Some("UTF-8"),
        standalone.as_deref(),
    ))
}

fn is_whitespace(text: &BytesText) -> bool {
    text.iter().all(u8::is_ascii_whitespace)
}
