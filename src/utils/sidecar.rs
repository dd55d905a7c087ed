use std::fs;
use std::path::Path;

use quick_xml::se::Serializer;
use serde::{Deserialize, Serialize};

use crate::{AudioBookRecord, Result};

const XML_DECLARATION: &str = "<?xml version=\"1.0\" encoding=\"utf-8\"?>\n";

// Early sidecars wrapped the record in a document element.
#[derive(Debug, Deserialize)]
struct LegacyDocument {
    #[serde(rename = "Mp3Meta")]
    record: AudioBookRecord,
}

/// Serializes the record and moves it into place, so a crashed run never
/// leaves a partially written sidecar behind.
pub fn write(path: &Path, record: &AudioBookRecord) -> Result<()> {
    let mut xml = String::from(XML_DECLARATION);

    let mut serializer = Serializer::with_root(&mut xml, Some("AudioBookMeta"))?;
    serializer.indent(' ', 2);
    record.serialize(serializer)?;
    xml.push('\n');

    let tmp = path.with_extension("xml.tmp");
    fs::write(&tmp, &xml)?;
    fs::rename(&tmp, path)?;

    Ok(())
}

pub fn read(path: &Path) -> Result<AudioBookRecord> {
    let xml = fs::read_to_string(path)?;
    Ok(quick_xml::de::from_str(&xml)?)
}

/// Accepts the current schema as well as the legacy `Mp3Meta` root element
/// and the legacy wrapper document.
pub fn read_compat(path: &Path) -> Result<AudioBookRecord> {
    let xml = fs::read_to_string(path)?;

    // Field names are shared between the schemas, so a flat legacy record
    // parses directly regardless of its root element name.
    if let Ok(record) = quick_xml::de::from_str::<AudioBookRecord>(&xml) {
        return Ok(record);
    }

    let document: LegacyDocument = quick_xml::de::from_str(&xml)?;

    Ok(document.record)
}
