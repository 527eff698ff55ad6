use super::{AudioCodec, AudioSegment, CodecError};
use mp3lame_encoder::{Bitrate, Builder, FlushNoGap, MonoPcm, Quality};
use std::io::Cursor;
use symphonia::core::audio::SampleBuffer;
use symphonia::core::codecs::{DecoderOptions, CODEC_TYPE_NULL};
use symphonia::core::errors::Error as SymphoniaError;
use symphonia::core::formats::FormatOptions;
use symphonia::core::io::MediaSourceStream;
use symphonia::core::meta::MetadataOptions;
use symphonia::core::probe::Hint;

/// MP3 codec matching the provider's `audio-16khz-128kbitrate-mono-mp3` output
#[derive(Debug, Clone, Default)]
pub struct Mp3Codec;

impl Mp3Codec {
    pub fn new() -> Self {
        Self
    }
}

impl AudioCodec for Mp3Codec {
    fn decode(&self, bytes: &[u8]) -> Result<AudioSegment, CodecError> {
        let mss = MediaSourceStream::new(Box::new(Cursor::new(bytes.to_vec())), Default::default());

        let mut hint = Hint::new();
        hint.with_extension("mp3");

        let probed = symphonia::default::get_probe()
            .format(&hint, mss, &FormatOptions::default(), &MetadataOptions::default())
            .map_err(|e| CodecError::Decode(e.to_string()))?;
        let mut format = probed.format;

        let track = format
            .tracks()
            .iter()
            .find(|t| t.codec_params.codec != CODEC_TYPE_NULL)
            .ok_or_else(|| CodecError::Decode("no decodable audio track".to_string()))?;
        let track_id = track.id;

        let mut decoder = symphonia::default::get_codecs()
            .make(&track.codec_params, &DecoderOptions::default())
            .map_err(|e| CodecError::Decode(e.to_string()))?;

        let mut samples = Vec::new();
        let mut sample_rate = track.codec_params.sample_rate.unwrap_or(0);
        let mut channels = track
            .codec_params
            .channels
            .map(|c| c.count() as u16)
            .unwrap_or(0);

        loop {
            let packet = match format.next_packet() {
                Ok(packet) => packet,
                Err(SymphoniaError::IoError(e)) if e.kind() == std::io::ErrorKind::UnexpectedEof => break,
                Err(e) => return Err(CodecError::Decode(e.to_string())),
            };

            if packet.track_id() != track_id {
                continue;
            }

            match decoder.decode(&packet) {
                Ok(decoded) => {
                    let signal = *decoded.spec();
                    sample_rate = signal.rate;
                    channels = signal.channels.count() as u16;

                    let mut buffer = SampleBuffer::<i16>::new(decoded.capacity() as u64, signal);
                    buffer.copy_interleaved_ref(decoded);
                    samples.extend_from_slice(buffer.samples());
                }
                // A damaged frame is skipped, the rest of the stream is still usable
                Err(SymphoniaError::DecodeError(reason)) => {
                    tracing::debug!(reason = reason, "Skipping undecodable MP3 frame");
                }
                Err(e) => return Err(CodecError::Decode(e.to_string())),
            }
        }

        if samples.is_empty() || sample_rate == 0 || channels == 0 {
            return Err(CodecError::Empty);
        }

        Ok(AudioSegment::new(samples, sample_rate, channels))
    }

    fn encode(&self, segment: &AudioSegment) -> Result<Vec<u8>, CodecError> {
        if segment.channels != 1 {
            return Err(CodecError::Encode(format!(
                "only mono audio is supported, got {} channels",
                segment.channels
            )));
        }

        let mut builder =
            Builder::new().ok_or_else(|| CodecError::Encode("could not allocate LAME".to_string()))?;
        builder
            .set_num_channels(1)
            .map_err(|e| CodecError::Encode(format!("{:?}", e)))?;
        builder
            .set_sample_rate(segment.sample_rate)
            .map_err(|e| CodecError::Encode(format!("{:?}", e)))?;
        builder
            .set_brate(Bitrate::Kbps128)
            .map_err(|e| CodecError::Encode(format!("{:?}", e)))?;
        builder
            .set_quality(Quality::Best)
            .map_err(|e| CodecError::Encode(format!("{:?}", e)))?;
        let mut encoder = builder
            .build()
            .map_err(|e| CodecError::Encode(format!("{:?}", e)))?;

        let input = MonoPcm(segment.samples.as_slice());
        let mut output = Vec::new();
        output.reserve(mp3lame_encoder::max_required_buffer_size(segment.samples.len()));

        encoder
            .encode_to_vec(input, &mut output)
            .map_err(|e| CodecError::Encode(format!("{:?}", e)))?;
        encoder
            .flush_to_vec::<FlushNoGap>(&mut output)
            .map_err(|e| CodecError::Encode(format!("{:?}", e)))?;

        Ok(output)
    }

    fn extension(&self) -> &'static str {
        "mp3"
    }

    fn mime_type(&self) -> &'static str {
        "audio/mpeg"
    }
}
