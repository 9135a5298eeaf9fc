// Domain rules - Encoder parameter selection

use crate::domain::model::*;

/// Fallbacks used when the source does not dictate a value
#[derive(Debug, Clone, PartialEq)]
pub struct EncodeDefaults {
    /// Quality target when the source bitrate is unknown
    pub crf: u8,
    /// Preset for x264/x265
    pub preset: String,
    /// AAC bitrate for re-encoded audio
    pub audio_bitrate: String,
}

impl Default for EncodeDefaults {
    fn default() -> Self {
        Self {
            crf: 18,
            preset: "medium".to_string(),
            audio_bitrate: "192k".to_string(),
        }
    }
}

/// Business rules for choosing encoders
///
/// Boundary segments are concatenated with the untouched middle, so their
/// final encode has to reproduce the source's codec, bitrate and pixel format.
pub struct EncoderSelector;

impl EncoderSelector {
    /// Map a probed codec name to the matching encoder; unknown codecs get x264
    pub fn encoder_for_codec(codec_name: Option<&str>) -> VideoEncoder {
        match codec_name.map(|c| c.to_ascii_lowercase()).as_deref() {
            Some("h264") => VideoEncoder::X264,
            Some("hevc") | Some("h265") => VideoEncoder::X265,
            Some("vp9") => VideoEncoder::Vp9,
            Some("av1") => VideoEncoder::SvtAv1,
            _ => VideoEncoder::X264,
        }
    }

    /// Final encode matched to the source
    pub fn matched_video(source: &SourceInfo, defaults: &EncodeDefaults) -> VideoEncoding {
        let encoder = Self::encoder_for_codec(source.codec_name.as_deref());

        let rate = match source.bit_rate {
            Some(bits) if bits > 0 => RateControl::Bitrate(bits),
            _ => RateControl::Crf(defaults.crf),
        };

        let preset = if encoder.supports_preset() {
            Some(defaults.preset.clone())
        } else {
            None
        };

        VideoEncoding {
            encoder,
            rate: Some(rate),
            preset,
            pix_fmt: source.pix_fmt.clone(),
            level: None,
        }
    }

    /// Lossless intra-only intermediate (FFV1 version 3)
    pub fn intraframe_video() -> VideoEncoding {
        VideoEncoding {
            encoder: VideoEncoder::Ffv1,
            rate: None,
            preset: None,
            pix_fmt: None,
            level: Some(3),
        }
    }

    /// Parameters for converting an extracted chunk to the intermediate
    pub fn intraframe_params(source: &SourceInfo) -> TranscodeParams {
        TranscodeParams {
            video: Self::intraframe_video(),
            audio: source.has_audio.then_some(AudioEncoding::Flac),
            trim: None,
        }
    }

    /// Parameters for the final trim and encode of a boundary segment
    pub fn cut_encode_params(
        source: &SourceInfo,
        defaults: &EncodeDefaults,
        cut: TimeRange,
    ) -> TranscodeParams {
        TranscodeParams {
            video: Self::matched_video(source, defaults),
            audio: source.has_audio.then(|| AudioEncoding::Aac {
                bitrate: defaults.audio_bitrate.clone(),
            }),
            trim: Some(cut),
        }
    }
}
