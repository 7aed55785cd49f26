use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use plist::Value;

/// Raw key/value pairs for one manifest entry. Keys are left exactly
/// as the manifest spells them; the scan orchestrator normalizes them.
pub type ManifestRecord = BTreeMap<String, String>;

#[derive(Debug)]
pub enum ManifestError {
    Io(std::io::Error),
    Plist(plist::Error),
    Format(String),
}

impl std::fmt::Display for ManifestError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ManifestError::Io(err) => write!(f, "io error: {}", err),
            ManifestError::Plist(err) => write!(f, "plist error: {}", err),
            ManifestError::Format(msg) => write!(f, "manifest format error: {}", msg),
        }
    }
}

impl std::error::Error for ManifestError {}

impl From<std::io::Error> for ManifestError {
    fn from(err: std::io::Error) -> Self {
        ManifestError::Io(err)
    }
}

impl From<plist::Error> for ManifestError {
    fn from(err: plist::Error) -> Self {
        ManifestError::Plist(err)
    }
}

/// Manifest-parser seam. The catalog only sees record maps; the wire
/// format stays behind this trait.
pub trait ManifestParser: Send + Sync {
    fn parse(&self, path: &Path) -> Result<Vec<ManifestRecord>, ManifestError>;
}

/// iTunes-style library manifest: an XML property list whose top-level
/// dict holds a `Tracks` dict of per-track record dicts.
pub struct PlistManifest;

impl ManifestParser for PlistManifest {
    fn parse(&self, path: &Path) -> Result<Vec<ManifestRecord>, ManifestError> {
        let root = Value::from_file(path)?;
        let dict = root
            .as_dictionary()
            .ok_or_else(|| ManifestError::Format("top-level value is not a dict".to_string()))?;
        let tracks = dict
            .get("Tracks")
            .and_then(Value::as_dictionary)
            .ok_or_else(|| ManifestError::Format("missing Tracks dict".to_string()))?;

        let mut records = Vec::with_capacity(tracks.len());
        for entry in tracks.values() {
            let fields = match entry.as_dictionary() {
                Some(fields) => fields,
                None => continue,
            };
            let mut record = ManifestRecord::new();
            for (key, value) in fields {
                if let Some(text) = scalar_to_string(value) {
                    record.insert(key.clone(), text);
                }
            }
            records.push(record);
        }
        Ok(records)
    }
}

fn scalar_to_string(value: &Value) -> Option<String> {
    match value {
        Value::String(text) => Some(text.clone()),
        Value::Integer(num) => Some(num.to_string()),
        Value::Real(num) => Some(num.to_string()),
        Value::Boolean(flag) => Some(flag.to_string()),
        Value::Date(date) => Some(date.to_xml_format()),
        _ => None,
    }
}

/// Converts a `file://` URI to a local path, percent-decoding as it
/// goes. Returns None for non-file URIs.
pub fn file_uri_to_path(uri: &str) -> Option<PathBuf> {
    let rest = uri
        .strip_prefix("file://localhost")
        .or_else(|| uri.strip_prefix("file://"))?;
    if rest.is_empty() || !rest.starts_with('/') {
        return None;
    }
    let mut bytes = Vec::with_capacity(rest.len());
    let mut chars = rest.bytes();
    while let Some(byte) = chars.next() {
        if byte == b'%' {
            let hi = chars.next()?;
            let lo = chars.next()?;
            let decoded = hex_value(hi)? << 4 | hex_value(lo)?;
            bytes.push(decoded);
        } else {
            bytes.push(byte);
        }
    }
    Some(PathBuf::from(String::from_utf8(bytes).ok()?))
}

fn hex_value(byte: u8) -> Option<u8> {
    match byte {
        b'0'..=b'9' => Some(byte - b'0'),
        b'a'..=b'f' => Some(byte - b'a' + 10),
        b'A'..=b'F' => Some(byte - b'A' + 10),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::{file_uri_to_path, ManifestParser, PlistManifest};
    use std::io::Write;
    use std::path::PathBuf;

    const SAMPLE: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<!DOCTYPE plist PUBLIC "-//Apple//DTD PLIST 1.0//EN" "http://www.apple.com/DTDs/PropertyList-1.0.dtd">
<plist version="1.0">
<dict>
    <key>Tracks</key>
    <dict>
        <key>1001</key>
        <dict>
            <key>Track ID</key><integer>1001</integer>
            <key>Name</key><string>Opening</string>
            <key>Artist</key><string>The Band</string>
            <key>Location</key><string>file:///music/a%20song.mp3</string>
        </dict>
        <key>1002</key>
        <dict>
            <key>Track ID</key><integer>1002</integer>
            <key>Name</key><string>Closing</string>
            <key>Location</key><string>file://localhost/music/b.mp3</string>
        </dict>
    </dict>
</dict>
</plist>
"#;

    #[test]
    fn parses_tracks_dict_into_records() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(SAMPLE.as_bytes()).unwrap();

        let records = PlistManifest.parse(file.path()).unwrap();
        assert_eq!(records.len(), 2);

        let first = records
            .iter()
            .find(|r| r.get("Name").map(String::as_str) == Some("Opening"))
            .unwrap();
        assert_eq!(first.get("Artist").unwrap(), "The Band");
        assert_eq!(first.get("Track ID").unwrap(), "1001");
        assert_eq!(first.get("Location").unwrap(), "file:///music/a%20song.mp3");
    }

    #[test]
    fn missing_tracks_dict_is_a_format_error() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(
            br#"<?xml version="1.0"?><plist version="1.0"><dict/></plist>"#,
        )
        .unwrap();
        assert!(PlistManifest.parse(file.path()).is_err());
    }

    #[test]
    fn file_uris_decode_to_paths() {
        assert_eq!(
            file_uri_to_path("file:///music/a%20song.mp3"),
            Some(PathBuf::from("/music/a song.mp3"))
        );
        assert_eq!(
            file_uri_to_path("file://localhost/music/b.mp3"),
            Some(PathBuf::from("/music/b.mp3"))
        );
        assert_eq!(file_uri_to_path("http://example.com/a.mp3"), None);
        assert_eq!(file_uri_to_path("file://%zz"), None);
    }
}
