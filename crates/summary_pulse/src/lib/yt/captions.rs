//! Caption track selection and srv1 XML parsing.

use quick_xml::events::Event;
use quick_xml::Reader;

use crate::yt::CaptionTrack;

/// Picks the best caption track: manually-authored tracks are tried across
/// the whole language preference order before any auto-generated track is
/// considered, so a manual track in a less-preferred language still beats
/// an auto-generated one in the most-preferred.
pub(crate) fn pick_track<'a>(
    tracks: &'a [CaptionTrack],
    languages: &[String],
) -> Option<&'a CaptionTrack> {
    for lang in languages {
        if let Some(manual) = tracks
            .iter()
            .find(|t| &t.language == lang && !t.auto_generated)
        {
            return Some(manual);
        }
    }
    for lang in languages {
        if let Some(auto) = tracks.iter().find(|t| &t.language == lang) {
            return Some(auto);
        }
    }
    None
}

/// Parses a srv1 caption document (`<transcript><text ...>..</text>...`)
/// into plain text, one caption segment per line. Entities are decoded
/// twice because auto-generated tracks double-escape them.
pub(crate) fn parse_caption_xml(xml: &str) -> Result<String, quick_xml::Error> {
    let mut reader = Reader::from_str(xml);
    let mut lines: Vec<String> = Vec::new();
    let mut in_text = false;

    loop {
        match reader.read_event()? {
            Event::Start(ref e) if e.name().as_ref() == b"text" => {
                in_text = true;
            }
            Event::End(ref e) if e.name().as_ref() == b"text" => {
                in_text = false;
            }
            Event::Text(ref e) if in_text => {
                let raw = e.unescape().unwrap_or_default().to_string();
                let text = html_escape::decode_html_entities(&raw).trim().to_string();
                if !text.is_empty() {
                    lines.push(text);
                }
            }
            Event::Eof => break,
            _ => {}
        }
    }

    Ok(lines.join("\n"))
}
