use std::fmt::Write;

/// Reference from a master playlist to one variant
#[derive(Debug, Clone, PartialEq)]
pub struct VariantRef {
    pub variant_id: String,
    pub uri: String,
    pub bandwidth: u64,
}

impl VariantRef {
    /// Variant addressed relative to the master as `{variant_id}.m3u8`
    pub fn for_variant(variant_id: &str, bandwidth: u64) -> Self {
        Self {
            variant_id: variant_id.to_string(),
            uri: format!("{}.m3u8", variant_id),
            bandwidth,
        }
    }
}

/// Top-level playlist listing the variants of a manifest
#[derive(Debug, Clone, PartialEq)]
pub struct MasterPlaylist {
    pub manifest_id: String,
    pub variants: Vec<VariantRef>,
}

impl MasterPlaylist {
    pub fn new(manifest_id: impl Into<String>) -> Self {
        Self {
            manifest_id: manifest_id.into(),
            variants: Vec::new(),
        }
    }

    pub fn render(&self) -> String {
        let mut out = String::from("#EXTM3U\n#EXT-X-VERSION:3\n");
        for variant in &self.variants {
            let _ = writeln!(out, "#EXT-X-STREAM-INF:BANDWIDTH={}", variant.bandwidth);
            let _ = writeln!(out, "{}", variant.uri);
        }
        out
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct SegmentRef {
    pub uri: String,
    pub duration_secs: f64,
}

/// Live (sliding window) playlist of one variant
#[derive(Debug, Clone, PartialEq, Default)]
pub struct MediaPlaylist {
    pub target_duration_secs: u64,
    pub media_sequence: u64,
    pub segments: Vec<SegmentRef>,
    /// Set once the stream has finished; renders `#EXT-X-ENDLIST`
    pub ended: bool,
}

impl MediaPlaylist {
    /// Ready for playback: at least one segment, and the first has a URI
    pub fn is_ready(&self) -> bool {
        self.segments
            .first()
            .map(|segment| !segment.uri.is_empty())
            .unwrap_or(false)
    }

    pub fn render(&self) -> String {
        let mut out = String::from("#EXTM3U\n#EXT-X-VERSION:3\n");
        let _ = writeln!(out, "#EXT-X-TARGETDURATION:{}", self.target_duration_secs);
        let _ = writeln!(out, "#EXT-X-MEDIA-SEQUENCE:{}", self.media_sequence);
        for segment in &self.segments {
            let _ = writeln!(out, "#EXTINF:{:.3},", segment.duration_secs);
            let _ = writeln!(out, "{}", segment.uri);
        }
        if self.ended {
            out.push_str("#EXT-X-ENDLIST\n");
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_master_render() {
        let mut master = MasterPlaylist::new("m-1");
        master.variants.push(VariantRef::for_variant("v1", 100));

        let text = master.render();
        assert!(text.starts_with("#EXTM3U\n"));
        assert!(text.contains("#EXT-X-STREAM-INF:BANDWIDTH=100\nv1.m3u8\n"));
    }

    #[test]
    fn test_media_readiness() {
        let mut playlist = MediaPlaylist::default();
        assert!(!playlist.is_ready());

        playlist.segments.push(SegmentRef {
            uri: String::new(),
            duration_secs: 1.0,
        });
        assert!(!playlist.is_ready(), "empty first URI is not ready");

        playlist.segments[0].uri = "v/seg0.ts".to_string();
        assert!(playlist.is_ready());
    }

    #[test]
    fn test_media_render_endlist() {
        let playlist = MediaPlaylist {
            target_duration_secs: 8,
            media_sequence: 4,
            segments: vec![SegmentRef {
                uri: "v/seg4.ts".to_string(),
                duration_secs: 8.0,
            }],
            ended: true,
        };

        let text = playlist.render();
        assert!(text.contains("#EXT-X-TARGETDURATION:8\n"));
        assert!(text.contains("#EXT-X-MEDIA-SEQUENCE:4\n"));
        assert!(text.contains("#EXTINF:8.000,\nv/seg4.ts\n"));
        assert!(text.ends_with("#EXT-X-ENDLIST\n"));
    }
}
