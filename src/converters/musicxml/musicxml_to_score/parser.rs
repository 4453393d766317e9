//! MusicXML parser implementation
//!
//! Converts MusicXML into the analysis score model using roxmltree.

use std::collections::HashMap;

use num_rational::Ratio;
use roxmltree::{Document as XmlDocument, Node};

use super::model::{MeasureInfo, MeasureMap, Part, Score};
use super::{ScoreParseError, ScoreParseResult};
use crate::models::{KeySignature, Letter, MelodyNote, Pitch, QuarterLength};

/// Parse a MusicXML string into a [`Score`]
///
/// # Example
///
/// ```
/// let xml = r#"<?xml version="1.0"?>
/// <score-partwise version="3.1">
///   <part-list>
///     <score-part id="P1"><part-name>Soprano</part-name></score-part>
///   </part-list>
///   <part id="P1">
///     <measure number="1">
///       <note><pitch><step>C</step><octave>4</octave></pitch><duration>1</duration></note>
///     </measure>
///   </part>
/// </score-partwise>"#;
///
/// let score = musicau::converters::parse_score(xml).unwrap();
/// assert_eq!(score.parts[0].notes.len(), 1);
/// ```
pub fn parse_score(xml: &str) -> ScoreParseResult<Score> {
    let doc = XmlDocument::parse(xml).map_err(|e| ScoreParseError::Xml(e.to_string()))?;
    let root = doc.root_element();

    match root.tag_name().name() {
        "score-partwise" => parse_score_partwise(root),
        "score-timewise" => Err(ScoreParseError::UnsupportedFormat(
            "score-timewise format (use score-partwise instead)".to_string(),
        )),
        other => Err(ScoreParseError::InvalidValue {
            element: "root".to_string(),
            value: other.to_string(),
        }),
    }
}

/// Composer named in a score's `<identification>` block
///
/// Catalogue metadata files carry the composer this way.
pub fn read_composer(xml: &str) -> ScoreParseResult<Option<String>> {
    let doc = XmlDocument::parse(xml).map_err(|e| ScoreParseError::Xml(e.to_string()))?;
    Ok(composer_of(doc.root_element()))
}

fn composer_of(root: Node) -> Option<String> {
    root.children()
        .find(|n| n.has_tag_name("identification"))?
        .children()
        .find(|n| n.has_tag_name("creator") && n.attribute("type") == Some("composer"))
        .and_then(|n| n.text())
        .map(|t| t.trim().to_string())
        .filter(|t| !t.is_empty())
}

fn title_of(root: Node) -> Option<String> {
    let work_title = root
        .children()
        .find(|n| n.has_tag_name("work"))
        .and_then(|work| child_text(work, "work-title"));
    work_title
        .or_else(|| child_text(root, "movement-title"))
        .map(|t| t.trim().to_string())
}

/// Parse <score-partwise> structure
fn parse_score_partwise(root: Node) -> ScoreParseResult<Score> {
    let part_list = root
        .children()
        .find(|n| n.has_tag_name("part-list"))
        .ok_or_else(|| ScoreParseError::MissingElement("part-list".to_string()))?;
    let part_names = parse_part_list(part_list);

    let mut score = Score {
        title: title_of(root),
        composer: composer_of(root),
        ..Score::default()
    };

    for (index, part_node) in root.children().filter(|n| n.has_tag_name("part")).enumerate() {
        let id = part_node
            .attribute("id")
            .ok_or_else(|| ScoreParseError::MissingElement("part id attribute".to_string()))?;
        let name = part_names
            .get(id)
            .cloned()
            .unwrap_or_else(|| format!("Part {}", index + 1));

        let (part, measures) = parse_part(part_node, id, &name)?;
        if index == 0 {
            score.measures = MeasureMap::new(measures);
        }
        score.parts.push(part);
    }

    log::debug!(
        "Parsed score {:?}: {} parts, {} measures",
        score.title,
        score.parts.len(),
        score.measures.len()
    );

    Ok(score)
}

/// Parse <part-list> to extract part names
fn parse_part_list(part_list: Node) -> HashMap<String, String> {
    part_list
        .children()
        .filter(|n| n.has_tag_name("score-part"))
        .filter_map(|score_part| {
            let id = score_part.attribute("id")?;
            let name = child_text(score_part, "part-name").unwrap_or("Unnamed Part");
            Some((id.to_string(), name.to_string()))
        })
        .collect()
}

/// Attribute state carried from measure to measure
struct PartState {
    divisions: i64,
    key: KeySignature,
    beats: i64,
    beat_type: i64,
}

impl Default for PartState {
    fn default() -> Self {
        PartState {
            divisions: 1,
            key: KeySignature::default(),
            beats: 4,
            beat_type: 4,
        }
    }
}

impl PartState {
    fn quarters(&self, divs: i64) -> QuarterLength {
        Ratio::new(divs, self.divisions)
    }

    /// Length of one beat; compound meters (6/8, 9/8, 12/16, ...) beat in
    /// dotted values
    fn beat_length(&self) -> QuarterLength {
        let unit = Ratio::new(4, self.beat_type);
        if self.beats > 3 && self.beats % 3 == 0 && self.beat_type >= 8 {
            unit * 3
        } else {
            unit
        }
    }

    fn position_label(&self, measure_name: &str, measure_offset: QuarterLength) -> String {
        let beat = Ratio::from_integer(1) + measure_offset / self.beat_length();
        format!("{}, {}", measure_name, format_beat(beat))
    }
}

/// Format a beat as a float with at least one decimal: `1.0`, `2.5`
fn format_beat(beat: QuarterLength) -> String {
    if beat.is_integer() {
        format!("{}.0", beat.to_integer())
    } else {
        format!("{}", *beat.numer() as f64 / *beat.denom() as f64)
    }
}

/// Unique name for a measure number, suffixing repeats with ` (n)`
fn unique_measure_name(number: &str, used: &mut HashMap<String, usize>) -> String {
    match used.get_mut(number) {
        None => {
            used.insert(number.to_string(), 1);
            number.to_string()
        }
        Some(count) => {
            let name = format!("{} ({})", number, count);
            *count += 1;
            name
        }
    }
}

/// Parse a single <part> element
fn parse_part(part_node: Node, id: &str, name: &str) -> ScoreParseResult<(Part, Vec<MeasureInfo>)> {
    let mut state = PartState::default();
    let mut used_names = HashMap::new();
    let mut measures = Vec::new();
    let mut notes = Vec::new();
    let mut measure_start = Ratio::from_integer(0);

    for (index, measure_node) in part_node.children().filter(|n| n.has_tag_name("measure")).enumerate() {
        let number = measure_node
            .attribute("number")
            .map(str::to_string)
            .unwrap_or_else(|| (index + 1).to_string());
        let measure_name = unique_measure_name(&number, &mut used_names);

        let mut cursor: QuarterLength = Ratio::from_integer(0);
        let mut extent: QuarterLength = Ratio::from_integer(0);

        for child in measure_node.children().filter(|n| n.is_element()) {
            match child.tag_name().name() {
                "attributes" => parse_attributes(child, &mut state)?,
                "note" => match parse_note(child, &state)? {
                    NoteEvent::Sounding {
                        pitch,
                        duration,
                        has_fermata,
                    } => {
                        notes.push(MelodyNote {
                            pitch,
                            duration,
                            offset: measure_start + cursor,
                            measure_offset: cursor,
                            position: state.position_label(&measure_name, cursor),
                            has_cadence_marker: has_fermata,
                            key: state.key,
                        });
                        cursor += duration;
                    }
                    NoteEvent::Silent(duration) => cursor += duration,
                    NoteEvent::Skip => {}
                },
                "backup" => {
                    let duration = state.quarters(parse_duration(child)?);
                    cursor = (cursor - duration).max(Ratio::from_integer(0));
                }
                "forward" => {
                    cursor += state.quarters(parse_duration(child)?);
                }
                _ => {
                    // Ignore other elements (print, sound, barline, direction, etc.)
                }
            }
            extent = extent.max(cursor);
        }

        measures.push(MeasureInfo {
            number,
            name: measure_name,
            offset: measure_start,
            length: extent,
        });
        measure_start += extent;
    }

    let part = Part {
        id: id.to_string(),
        name: name.to_string(),
        notes,
    };
    Ok((part, measures))
}

/// Parse <attributes> element
fn parse_attributes(attr_node: Node, state: &mut PartState) -> ScoreParseResult<()> {
    for child in attr_node.children().filter(|n| n.is_element()) {
        match child.tag_name().name() {
            "divisions" => {
                let text = child.text().unwrap_or("").trim();
                state.divisions = text
                    .parse::<i64>()
                    .ok()
                    .filter(|d| *d > 0)
                    .ok_or_else(|| invalid("divisions", text))?;
            }
            "key" => {
                if let Some(text) = child_text(child, "fifths") {
                    let fifths: i32 = text.trim().parse().map_err(|_| invalid("fifths", text))?;
                    state.key = KeySignature::new(fifths);
                }
            }
            "time" => {
                let beats = child_text(child, "beats").and_then(|t| t.trim().parse::<i64>().ok());
                let beat_type = child_text(child, "beat-type").and_then(|t| t.trim().parse::<i64>().ok());
                // Additive meters like "3+2" are left at the previous signature
                if let (Some(b), Some(bt)) = (beats, beat_type) {
                    if b > 0 && bt > 0 {
                        state.beats = b;
                        state.beat_type = bt;
                    }
                }
            }
            _ => {}
        }
    }
    Ok(())
}

enum NoteEvent {
    Sounding {
        pitch: Pitch,
        duration: QuarterLength,
        has_fermata: bool,
    },
    /// Rests, cue and unpitched notes: time passes, nothing is recorded
    Silent(QuarterLength),
    /// Grace notes and secondary chord tones
    Skip,
}

/// Parse a <note> element
fn parse_note(note_node: Node, state: &PartState) -> ScoreParseResult<NoteEvent> {
    let has_child = |name: &str| note_node.children().any(|n| n.has_tag_name(name));

    if has_child("grace") || has_child("chord") {
        return Ok(NoteEvent::Skip);
    }

    let duration = state.quarters(parse_duration(note_node)?);

    if has_child("rest") || has_child("cue") || has_child("unpitched") {
        return Ok(NoteEvent::Silent(duration));
    }

    let pitch_node = note_node
        .children()
        .find(|n| n.has_tag_name("pitch"))
        .ok_or_else(|| ScoreParseError::MissingElement("pitch".to_string()))?;
    let pitch = parse_pitch(pitch_node)?;

    let has_fermata = note_node
        .children()
        .filter(|n| n.has_tag_name("notations"))
        .any(|notations| notations.children().any(|n| n.has_tag_name("fermata")));

    Ok(NoteEvent::Sounding {
        pitch,
        duration,
        has_fermata,
    })
}

/// Parse <pitch> element
fn parse_pitch(pitch_node: Node) -> ScoreParseResult<Pitch> {
    let step = child_text(pitch_node, "step")
        .ok_or_else(|| ScoreParseError::MissingElement("step".to_string()))?
        .trim();
    let letter = match step.len() {
        1 => step.chars().next().and_then(Letter::from_char),
        _ => None,
    }
    .ok_or_else(|| invalid("step", step))?;

    // <alter> may be fractional for microtones; those round to the nearest semitone
    let alteration = match child_text(pitch_node, "alter") {
        Some(text) => text
            .trim()
            .parse::<f64>()
            .map(|a| a.round() as i8)
            .map_err(|_| invalid("alter", text))?,
        None => 0,
    };

    let octave_text = child_text(pitch_node, "octave")
        .ok_or_else(|| ScoreParseError::MissingElement("octave".to_string()))?;
    let octave = octave_text
        .trim()
        .parse::<i32>()
        .map_err(|_| invalid("octave", octave_text))?;

    Ok(Pitch::new(letter, alteration, octave))
}

/// <duration> of a note, backup or forward, in divisions
fn parse_duration(node: Node) -> ScoreParseResult<i64> {
    let text = child_text(node, "duration")
        .ok_or_else(|| ScoreParseError::MissingElement("duration".to_string()))?;
    text.trim()
        .parse::<i64>()
        .ok()
        .filter(|d| *d >= 0)
        .ok_or_else(|| invalid("duration", text))
}

fn child_text<'a>(node: Node<'a, '_>, name: &str) -> Option<&'a str> {
    node.children().find(|n| n.has_tag_name(name)).and_then(|n| n.text())
}

fn invalid(element: &str, value: &str) -> ScoreParseError {
    ScoreParseError::InvalidValue {
        element: element.to_string(),
        value: value.to_string(),
    }
}

#[cfg(test)]
mod unit_tests {
    use super::*;
    use crate::models::ql;

    #[test]
    fn test_format_beat() {
        assert_eq!(format_beat(ql(1, 1)), "1.0");
        assert_eq!(format_beat(ql(5, 2)), "2.5");
        assert_eq!(format_beat(ql(9, 4)), "2.25");
    }

    #[test]
    fn test_unique_measure_name() {
        let mut used = HashMap::new();
        assert_eq!(unique_measure_name("1", &mut used), "1");
        assert_eq!(unique_measure_name("2", &mut used), "2");
        assert_eq!(unique_measure_name("2", &mut used), "2 (1)");
        assert_eq!(unique_measure_name("2", &mut used), "2 (2)");
    }

    #[test]
    fn test_beat_length() {
        let mut state = PartState::default();
        assert_eq!(state.beat_length(), ql(1, 1));
        state.beats = 6;
        state.beat_type = 8;
        assert_eq!(state.beat_length(), ql(3, 2));
        state.beats = 3;
        assert_eq!(state.beat_length(), ql(1, 2));
        state.beats = 2;
        state.beat_type = 2;
        assert_eq!(state.beat_length(), ql(2, 1));
    }
}
