//! FFmpeg execution adapter
//!
//! Argument lists are built from typed parameters by pure functions so the
//! exact invocation can be checked without launching anything.

use std::ffi::OsString;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tracing::{debug, warn};

use crate::domain::errors::SliceResult;
use crate::domain::model::*;
use crate::ports::MediaToolPort;
use crate::utils::command::ToolRunner;
use crate::utils::time::format_seconds;

/// FFmpeg-based execution adapter
pub struct FFmpegAdapter {
    program: String,
    runner: ToolRunner,
}

impl FFmpegAdapter {
    /// Create new FFmpeg adapter
    pub fn new(program: impl Into<String>, runner: ToolRunner) -> Self {
        Self {
            program: program.into(),
            runner,
        }
    }
}

#[async_trait]
impl MediaToolPort for FFmpegAdapter {
    async fn extract(
        &self,
        input: &Path,
        params: &ExtractParams,
        output: &Path,
    ) -> SliceResult<PathBuf> {
        self.runner
            .run(&self.program, &extract_args(input, params, output))
            .await?;
        Ok(output.to_path_buf())
    }

    async fn transcode(
        &self,
        input: &Path,
        params: &TranscodeParams,
        output: &Path,
    ) -> SliceResult<PathBuf> {
        params.validate()?;
        self.runner
            .run(&self.program, &transcode_args(input, params, output))
            .await?;
        Ok(output.to_path_buf())
    }

    async fn concat(&self, inputs: &[PathBuf], output: &Path) -> SliceResult<PathBuf> {
        let list_path = output.with_extension("concat.txt");
        tokio::fs::write(&list_path, concat_list(inputs)).await?;
        debug!("Wrote concat list {} ({} entries)", list_path.display(), inputs.len());

        let result = self
            .runner
            .run(&self.program, &concat_args(&list_path, output))
            .await;
        if let Err(e) = tokio::fs::remove_file(&list_path).await {
            warn!("Could not remove concat list {}: {}", list_path.display(), e);
        }
        result?;
        Ok(output.to_path_buf())
    }
}

fn os(value: &str) -> OsString {
    OsString::from(value)
}

/// `-ss/-to` input seek with stream copy and zero-based timestamps
pub fn extract_args(input: &Path, params: &ExtractParams, output: &Path) -> Vec<OsString> {
    let mut args = vec![
        os("-y"),
        os("-ss"),
        os(&format_seconds(params.region.start)),
        os("-to"),
        os(&format_seconds(params.region.end)),
        os("-i"),
        input.as_os_str().to_owned(),
        os("-map"),
        os("0:v:0"),
    ];
    if params.include_audio {
        args.extend([os("-map"), os("0:a:0?")]);
    }
    args.extend([
        os("-c"),
        os("copy"),
        os("-avoid_negative_ts"),
        os("make_zero"),
        output.as_os_str().to_owned(),
    ]);
    args
}

/// Full re-encode; with a trim window the cut is applied by filters
pub fn transcode_args(input: &Path, params: &TranscodeParams, output: &Path) -> Vec<OsString> {
    let mut args = vec![os("-y"), os("-i"), input.as_os_str().to_owned()];
    let with_audio = params.audio.is_some();

    match &params.trim {
        Some(trim) => {
            let start = format_seconds(trim.start);
            let end = format_seconds(trim.end);
            let mut graph = format!(
                "[0:v]trim=start={start}:end={end},setpts=PTS-STARTPTS[v]",
                start = start,
                end = end
            );
            if with_audio {
                graph.push_str(&format!(
                    ";[0:a]atrim=start={start}:end={end},asetpts=PTS-STARTPTS[a]",
                    start = start,
                    end = end
                ));
            }
            args.extend([os("-filter_complex"), OsString::from(graph)]);
            args.extend([os("-map"), os("[v]")]);
            if with_audio {
                args.extend([os("-map"), os("[a]")]);
            }
        }
        None => {
            args.extend([os("-map"), os("0:v:0")]);
            if with_audio {
                args.extend([os("-map"), os("0:a:0")]);
            }
        }
    }

    args.extend(video_args(&params.video));

    match &params.audio {
        Some(AudioEncoding::Flac) => args.extend([os("-c:a"), os("flac")]),
        Some(AudioEncoding::Aac { bitrate }) => {
            args.extend([os("-c:a"), os("aac"), os("-b:a"), os(bitrate)])
        }
        None => args.push(os("-an")),
    }

    args.extend([os("-sn"), os("-dn"), output.as_os_str().to_owned()]);
    args
}

fn video_args(video: &VideoEncoding) -> Vec<OsString> {
    let mut args = vec![os("-c:v"), os(video.encoder.ffmpeg_name())];
    if let Some(level) = video.level {
        args.extend([os("-level"), os(&level.to_string())]);
    }
    match video.rate {
        Some(RateControl::Bitrate(bits)) => args.extend([os("-b:v"), os(&bits.to_string())]),
        Some(RateControl::Crf(crf)) => args.extend([os("-crf"), os(&crf.to_string())]),
        None => {}
    }
    if let Some(preset) = &video.preset {
        args.extend([os("-preset"), os(preset)]);
    }
    if let Some(pix_fmt) = &video.pix_fmt {
        args.extend([os("-pix_fmt"), os(pix_fmt)]);
    }
    args
}

/// Concat demuxer invocation; the list may hold absolute paths
pub fn concat_args(list_path: &Path, output: &Path) -> Vec<OsString> {
    vec![
        os("-y"),
        os("-f"),
        os("concat"),
        os("-safe"),
        os("0"),
        os("-i"),
        list_path.as_os_str().to_owned(),
        os("-c"),
        os("copy"),
        output.as_os_str().to_owned(),
    ]
}

/// Concat demuxer list; single quotes are closed, escaped and reopened
pub fn concat_list(inputs: &[PathBuf]) -> String {
    let mut list = String::new();
    for input in inputs {
        let escaped = input.to_string_lossy().replace('\'', r"'\''");
        list.push_str(&format!("file '{}'\n", escaped));
    }
    list
}
