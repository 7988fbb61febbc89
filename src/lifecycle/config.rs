use crate::media::SegmenterOptions;

/// Settings applied to every publish
#[derive(Debug, Clone)]
pub struct PublishConfig {
    /// Options handed to the segmentation task
    pub segmenter: SegmenterOptions,

    /// Segments kept in each live playlist window
    pub playlist_length: usize,

    /// Bandwidth advertised for the single variant in the master playlist
    pub variant_bandwidth: u64,
}

impl Default for PublishConfig {
    fn default() -> Self {
        Self {
            segmenter: SegmenterOptions::default(),
            playlist_length: 3,
            variant_bandwidth: 100,
        }
    }
}
