use super::{AudioOutput, SAMPLE_RATE, Tone};
use crate::error::AudioError;
use rodio::buffer::SamplesBuffer;
use rodio::{OutputStream, OutputStreamHandle, Source};

/// Device output through rodio.
///
/// The output stream is opened on the first tone and reused for every cue
/// after that, so rapid repeated bursts share one device handle instead of
/// opening a new one each time. [`release`](AudioOutput::release) closes it.
#[derive(Default)]
pub struct RodioOutput {
    // Stream must outlive its handle.
    stream: Option<(OutputStream, OutputStreamHandle)>,
}

impl RodioOutput {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_open(&self) -> bool {
        self.stream.is_some()
    }

    fn handle(&mut self) -> Result<&OutputStreamHandle, AudioError> {
        if self.stream.is_none() {
            let opened = OutputStream::try_default().map_err(|e| AudioError::Unavailable(e.to_string()))?;
            log::debug!("opened audio output stream");
            self.stream = Some(opened);
        }
        match &self.stream {
            Some((_, handle)) => Ok(handle),
            None => Err(AudioError::Unavailable("output stream closed".into())),
        }
    }
}

impl AudioOutput for RodioOutput {
    fn play(&mut self, tone: &Tone) -> Result<(), AudioError> {
        let source = SamplesBuffer::new(1, SAMPLE_RATE, tone.samples(SAMPLE_RATE)).delay(tone.delay);
        self.handle()?
            .play_raw(source.convert_samples())
            .map_err(|e| AudioError::Playback(e.to_string()))
    }

    fn release(&mut self) {
        if self.stream.take().is_some() {
            log::debug!("released audio output stream");
        }
    }
}
