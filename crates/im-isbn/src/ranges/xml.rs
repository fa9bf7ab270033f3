//! RangeMessage.xml parsing
//!
//! Document layout (abridged):
//!
//! ```xml
//! <ISBNRangeMessage>
//!   <EAN.UCCPrefixes>
//!     <EAN.UCC>
//!       <Prefix>978</Prefix>
//!       <Rules>
//!         <Rule><Range>0000000-5999999</Range><Length>1</Length></Rule>
//!       </Rules>
//!     </EAN.UCC>
//!   </EAN.UCCPrefixes>
//!   <RegistrationGroups>
//!     <Group>
//!       <Prefix>978-2</Prefix>
//!       <Rules>...</Rules>
//!     </Group>
//!   </RegistrationGroups>
//! </ISBNRangeMessage>
//! ```

use quick_xml::events::Event;
use quick_xml::Reader;

use super::data::{RangeData, RangeGroup, RangeRule};
use crate::error::RangeDataError;

#[derive(Clone, Copy, PartialEq, Eq)]
enum GroupKind {
    EanUcc,
    Registration,
}

impl GroupKind {
    fn element(self) -> &'static str {
        match self {
            GroupKind::EanUcc => "EAN.UCC",
            GroupKind::Registration => "Group",
        }
    }
}

#[derive(Default)]
struct PendingRule {
    range: Option<String>,
    length: Option<usize>,
}

impl RangeData {
    /// Parse a RangeMessage document
    pub fn from_xml(xml: &str) -> Result<Self, RangeDataError> {
        let mut reader = Reader::from_str(xml);
        reader.trim_text(true);

        let mut data = RangeData::default();
        let mut buf = Vec::new();

        let mut current_element = String::new();
        let mut group: Option<(GroupKind, Option<String>, Vec<RangeRule>)> = None;
        let mut rule: Option<PendingRule> = None;

        loop {
            match reader.read_event_into(&mut buf)? {
                Event::Start(ref e) => {
                    let name = String::from_utf8_lossy(e.name().as_ref()).to_string();
                    match name.as_str() {
                        "EAN.UCC" => group = Some((GroupKind::EanUcc, None, Vec::new())),
                        "Group" => group = Some((GroupKind::Registration, None, Vec::new())),
                        "Rule" if group.is_some() => rule = Some(PendingRule::default()),
                        _ => {}
                    }
                    current_element = name;
                }
                Event::Text(e) => {
                    let text = e.unescape()?.trim().to_string();
                    if let Some(pending) = rule.as_mut() {
                        match current_element.as_str() {
                            "Range" => pending.range = Some(text),
                            "Length" => {
                                let length = text.parse().map_err(|_| {
                                    RangeDataError::Xml(format!("invalid <Length> {:?}", text))
                                })?;
                                pending.length = Some(length);
                            }
                            _ => {}
                        }
                    } else if let Some((_, prefix, _)) = group.as_mut() {
                        if current_element == "Prefix" {
                            *prefix = Some(text);
                        }
                    }
                }
                Event::End(ref e) => {
                    let name = String::from_utf8_lossy(e.name().as_ref()).to_string();
                    match name.as_str() {
                        "Rule" => {
                            if let (Some(pending), Some((kind, _, rules))) = (rule.take(), group.as_mut()) {
                                rules.push(finish_rule(pending, *kind)?);
                            }
                        }
                        "EAN.UCC" | "Group" => {
                            if let Some((kind, prefix, rules)) = group.take() {
                                let prefix = prefix.ok_or_else(|| RangeDataError::MissingField {
                                    element: kind.element().to_string(),
                                    field: "Prefix".to_string(),
                                })?;
                                let entry = RangeGroup { prefix, rules };
                                match kind {
                                    GroupKind::EanUcc => data.prefixes.push(entry),
                                    GroupKind::Registration => data.groups.push(entry),
                                }
                            }
                        }
                        _ => {}
                    }
                    current_element.clear();
                }
                Event::Eof => break,
                _ => {}
            }
            buf.clear();
        }

        if data.prefixes.is_empty() {
            return Err(RangeDataError::MissingField {
                element: "ISBNRangeMessage".to_string(),
                field: "EAN.UCC".to_string(),
            });
        }

        Ok(data)
    }
}

fn finish_rule(pending: PendingRule, kind: GroupKind) -> Result<RangeRule, RangeDataError> {
    let missing = |field: &str| RangeDataError::MissingField {
        element: format!("{}/Rule", kind.element()),
        field: field.to_string(),
    };

    let range = pending.range.ok_or_else(|| missing("Range"))?;
    let length = pending.length.ok_or_else(|| missing("Length"))?;

    let (low, high) = range
        .split_once('-')
        .ok_or_else(|| RangeDataError::InvalidRange {
            range: range.clone(),
            length,
        })?;

    Ok(RangeRule {
        range_low: low.to_string(),
        range_high: high.to_string(),
        length,
    })
}
