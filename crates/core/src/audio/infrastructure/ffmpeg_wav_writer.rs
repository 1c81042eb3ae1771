use std::path::{Path, PathBuf};

use crate::audio::domain::audio_normalizer::NormalizeError;
use crate::audio::domain::audio_segment::AudioSegment;
use crate::audio::domain::audio_writer::AudioWriter;

/// Encodes mono f32 PCM to a 16-bit WAV file using ffmpeg-next.
///
/// Writes to a `.part` sibling first and renames on success, so a failed
/// encode leaves no partial output behind.
pub struct FfmpegWavWriter;

const ENCODE_FRAME_SIZE: usize = 4096;

impl AudioWriter for FfmpegWavWriter {
    fn write_wav(&self, path: &Path, audio: &AudioSegment) -> Result<(), NormalizeError> {
        let temp_path = temp_sibling(path);

        let result = encode_wav(&temp_path, audio);
        if let Err(e) = result {
            let _ = std::fs::remove_file(&temp_path);
            return Err(NormalizeError::Encode {
                path: path.to_path_buf(),
                reason: e.to_string(),
            });
        }

        std::fs::rename(&temp_path, path).map_err(|e| NormalizeError::Encode {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })
    }
}

fn temp_sibling(path: &Path) -> PathBuf {
    let mut name = path
        .file_name()
        .map(|n| n.to_os_string())
        .unwrap_or_default();
    name.push(".part");
    path.with_file_name(name)
}

fn encode_wav(dest: &Path, audio: &AudioSegment) -> Result<(), Box<dyn std::error::Error>> {
    ffmpeg_next::init()?;

    // Extension is ".part", so name the muxer explicitly
    let mut octx = ffmpeg_next::format::output_as(&dest, "wav")?;

    let pcm_codec = ffmpeg_next::encoder::find(ffmpeg_next::codec::Id::PCM_S16LE)
        .ok_or("PCM encoder not found")?;
    let mut ost = octx.add_stream(Some(pcm_codec))?;
    let stream_idx = ost.index();

    let mut encoder = ffmpeg_next::codec::context::Context::new_with_codec(pcm_codec)
        .encoder()
        .audio()?;
    encoder.set_rate(audio.sample_rate() as i32);
    encoder.set_channel_layout(ffmpeg_next::ChannelLayout::MONO);
    encoder.set_format(ffmpeg_next::format::Sample::I16(
        ffmpeg_next::format::sample::Type::Packed,
    ));
    encoder.set_time_base(ffmpeg_next::Rational(1, audio.sample_rate() as i32));

    let mut encoder = encoder.open_as(pcm_codec)?;
    ost.set_parameters(&encoder);

    let enc_time_base = encoder.time_base();

    octx.write_header()?;
    let ost_time_base = octx.stream(stream_idx).unwrap().time_base();

    let mut pts: i64 = 0;
    for chunk in audio.samples().chunks(ENCODE_FRAME_SIZE) {
        let mut frame = ffmpeg_next::util::frame::audio::Audio::new(
            ffmpeg_next::format::Sample::I16(ffmpeg_next::format::sample::Type::Packed),
            chunk.len(),
            ffmpeg_next::ChannelLayout::MONO,
        );
        frame.set_rate(audio.sample_rate());
        frame.set_pts(Some(pts));

        // Convert f32 [-1.0, 1.0] to interleaved i16 in the frame's data plane
        let dst = frame.data_mut(0);
        for (i, sample) in chunk.iter().enumerate() {
            let clamped = (sample.clamp(-1.0, 1.0) * i16::MAX as f32) as i16;
            dst[i * 2..i * 2 + 2].copy_from_slice(&clamped.to_le_bytes());
        }

        encoder.send_frame(&frame)?;
        flush_packets(&mut encoder, &mut octx, stream_idx, enc_time_base, ost_time_base)?;

        pts += chunk.len() as i64;
    }

    encoder.send_eof()?;
    flush_packets(&mut encoder, &mut octx, stream_idx, enc_time_base, ost_time_base)?;

    octx.write_trailer()?;
    Ok(())
}

fn flush_packets(
    encoder: &mut ffmpeg_next::codec::encoder::audio::Encoder,
    octx: &mut ffmpeg_next::format::context::Output,
    stream_idx: usize,
    enc_time_base: ffmpeg_next::Rational,
    ost_time_base: ffmpeg_next::Rational,
) -> Result<(), Box<dyn std::error::Error>> {
    let mut encoded = ffmpeg_next::Packet::empty();
    while encoder.receive_packet(&mut encoded).is_ok() {
        encoded.set_stream(stream_idx);
        encoded.rescale_ts(enc_time_base, ost_time_base);
        encoded.write_interleaved(octx)?;
    }
    Ok(())
}
