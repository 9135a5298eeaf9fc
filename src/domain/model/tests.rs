// Unit tests for domain models

#[cfg(test)]
mod tests {
    use crate::domain::errors::SliceError;
    use crate::domain::model::*;

    fn x264(rate: Option<RateControl>) -> VideoEncoding {
        VideoEncoding {
            encoder: VideoEncoder::X264,
            rate,
            preset: Some("medium".to_string()),
            pix_fmt: Some("yuv420p".to_string()),
            level: None,
        }
    }

    #[test]
    fn test_time_range_valid() {
        let range = TimeRange::new(8.0, 12.0).unwrap();
        assert_eq!(range.duration(), 4.0);
        assert_eq!(range.to_string(), "[8, 12]");
    }

    #[test]
    fn test_time_range_rejects_reversed_and_empty() {
        assert!(matches!(
            TimeRange::new(5.0, 3.0),
            Err(SliceError::InvalidRange(_))
        ));
        assert!(matches!(
            TimeRange::new(5.0, 5.0),
            Err(SliceError::InvalidRange(_))
        ));
    }

    #[test]
    fn test_time_range_rejects_negative_and_nan() {
        assert!(TimeRange::new(-1.0, 3.0).is_err());
        assert!(TimeRange::new(0.0, f64::NAN).is_err());
        assert!(TimeRange::new(0.0, f64::INFINITY).is_err());
    }

    #[test]
    fn test_plan_regions_in_order() {
        let plan = Plan {
            requested: TimeRange::new(10.0, 15.0).unwrap(),
            margin: 2.0,
            layout: PlanLayout::ThreeRegion {
                lead_in: TimeRange::new(8.0, 12.0).unwrap(),
                middle: Some(TimeRange::new(12.0, 13.0).unwrap()),
                lead_out: TimeRange::new(13.0, 17.0).unwrap(),
            },
        };
        let starts: Vec<f64> = plan.regions().iter().map(|r| r.start).collect();
        assert_eq!(starts, vec![8.0, 12.0, 13.0]);
        assert!(!plan.is_single_region());
    }

    #[test]
    fn test_segment_role_labels() {
        assert_eq!(SegmentRole::LeadIn.label(), "lead_in");
        assert_eq!(SegmentRole::LeadOut.to_string(), "lead_out");
    }

    #[test]
    fn test_encoder_names() {
        assert_eq!(VideoEncoder::Ffv1.ffmpeg_name(), "ffv1");
        assert_eq!(VideoEncoder::Vp9.ffmpeg_name(), "libvpx-vp9");
        assert_eq!(VideoEncoder::SvtAv1.ffmpeg_name(), "libsvtav1");
        assert!(VideoEncoder::X265.supports_preset());
        assert!(!VideoEncoder::SvtAv1.supports_preset());
    }

    #[test]
    fn test_transcode_params_validate_ok() {
        let params = TranscodeParams {
            video: x264(Some(RateControl::Crf(18))),
            audio: Some(AudioEncoding::Aac {
                bitrate: "192k".to_string(),
            }),
            trim: Some(TimeRange::new(2.0, 4.0).unwrap()),
        };
        assert!(params.validate().is_ok());
    }

    #[test]
    fn test_transcode_params_rejects_out_of_range_crf() {
        let params = TranscodeParams {
            video: x264(Some(RateControl::Crf(52))),
            audio: None,
            trim: None,
        };
        assert!(matches!(
            params.validate(),
            Err(SliceError::InvalidParameters(_))
        ));
    }

    #[test]
    fn test_transcode_params_rejects_flag_like_tokens() {
        let mut video = x264(Some(RateControl::Bitrate(4_000_000)));
        video.pix_fmt = Some("-vf".to_string());
        let params = TranscodeParams {
            video,
            audio: None,
            trim: None,
        };
        assert!(params.validate().is_err());

        let mut video = x264(None);
        video.preset = Some("medium;rm".to_string());
        let params = TranscodeParams {
            video,
            audio: None,
            trim: None,
        };
        assert!(params.validate().is_err());
    }

    #[test]
    fn test_transcode_params_rejects_zero_bitrate() {
        let params = TranscodeParams {
            video: x264(Some(RateControl::Bitrate(0))),
            audio: None,
            trim: None,
        };
        assert!(params.validate().is_err());
    }
}
