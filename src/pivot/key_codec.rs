//! Joins hierarchical pivot keys into the flat field identifiers used by row records.

use super::PivotError;

/// Reserved between segments of a flat identifier. Segments may never contain it.
pub const SEPARATOR: char = '|';

pub fn encode<S: AsRef<str>>(segments: &[S]) -> Result<String, PivotError> {
    if segments.is_empty() {
        return Err(PivotError::EmptyKeyPath);
    }

    if let Some(segment) = segments
        .iter()
        .map(AsRef::as_ref)
        .find(|segment| segment.contains(SEPARATOR))
    {
        return Err(PivotError::SeparatorInSegment {
            segment: segment.to_owned(),
            path: segments.iter().map(|s| s.as_ref().to_owned()).collect(),
        });
    }

    let mut flat_id = String::new();
    for (i, segment) in segments.iter().enumerate() {
        if i > 0 {
            flat_id.push(SEPARATOR);
        }
        flat_id.push_str(segment.as_ref());
    }

    Ok(flat_id)
}

#[cfg(test)]
pub fn decode(flat_id: &str) -> Vec<String> {
    flat_id.split(SEPARATOR).map(str::to_owned).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn joins_segments_with_separator() {
        assert_eq!(encode(&["US", "total"]).unwrap(), "US|total");
        assert_eq!(encode(&["2008"]).unwrap(), "2008");
    }

    #[test]
    fn decode_inverts_encode() {
        let path = vec!["2008".to_string(), String::new(), "gold".to_string()];
        let flat_id = encode(&path).unwrap();
        assert_eq!(decode(&flat_id), path);
    }

    #[test]
    fn rejects_separator_inside_segment() {
        let err = encode(&["a|b", "c"]).unwrap_err();
        assert_eq!(
            err,
            PivotError::SeparatorInSegment {
                segment: "a|b".to_string(),
                path: vec!["a|b".to_string(), "c".to_string()],
            }
        );
    }

    #[test]
    fn rejects_empty_path() {
        let empty: [&str; 0] = [];
        assert_eq!(encode(&empty).unwrap_err(), PivotError::EmptyKeyPath);
    }
}
