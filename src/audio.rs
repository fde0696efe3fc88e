//! Volume sources
//!
//! The simulation only ever sees one scalar volume per tick. Where it comes
//! from (microphone analyser, decoded file, a test script) is up to the
//! caller, so every source sits behind [`VolumeSource`].

/// Supplies one non-negative volume sample per tick
pub trait VolumeSource {
    /// Sample the current volume (same scale as the sensitivity threshold)
    fn sample_volume(&mut self) -> f32;
}

/// Clamp a raw sample to a usable volume (NaN and negatives become silence)
#[inline]
pub fn sanitize_volume(raw: f32) -> f32 {
    if raw.is_finite() && raw > 0.0 { raw } else { 0.0 }
}

/// Permanently silent source (microphone denied or unavailable)
#[derive(Debug, Clone, Copy, Default)]
pub struct Silence;

impl VolumeSource for Silence {
    fn sample_volume(&mut self) -> f32 {
        0.0
    }
}

/// A source that always reports the same volume
#[derive(Debug, Clone, Copy)]
pub struct ConstantVolume(pub f32);

impl VolumeSource for ConstantVolume {
    fn sample_volume(&mut self) -> f32 {
        sanitize_volume(self.0)
    }
}

/// Plays back a fixed list of samples, then holds the last one (or loops)
#[derive(Debug, Clone)]
pub struct ScriptedVolume {
    samples: Vec<f32>,
    cursor: usize,
    looping: bool,
}

impl ScriptedVolume {
    pub fn new(samples: Vec<f32>) -> Self {
        Self {
            samples,
            cursor: 0,
            looping: false,
        }
    }

    /// Restart from the first sample after the last one
    pub fn looping(mut self) -> Self {
        self.looping = true;
        self
    }

    /// Build a script from `(volume, ticks)` runs
    pub fn from_runs(runs: &[(f32, usize)]) -> Self {
        let samples = runs
            .iter()
            .flat_map(|&(volume, ticks)| std::iter::repeat_n(volume, ticks))
            .collect();
        Self::new(samples)
    }
}

impl VolumeSource for ScriptedVolume {
    fn sample_volume(&mut self) -> f32 {
        if self.samples.is_empty() {
            return 0.0;
        }
        if self.cursor >= self.samples.len() {
            if self.looping {
                self.cursor = 0;
            } else {
                return sanitize_volume(self.samples[self.samples.len() - 1]);
            }
        }
        let sample = self.samples[self.cursor];
        self.cursor += 1;
        sanitize_volume(sample)
    }
}

/// Average of a Web Audio analyser's byte frequency bins (0..=255 scale)
#[cfg(target_arch = "wasm32")]
pub struct AnalyserVolume {
    analyser: web_sys::AnalyserNode,
    bins: Vec<u8>,
}

#[cfg(target_arch = "wasm32")]
impl AnalyserVolume {
    pub fn new(analyser: web_sys::AnalyserNode) -> Self {
        let bins = vec![0u8; analyser.frequency_bin_count() as usize];
        Self { analyser, bins }
    }
}

#[cfg(target_arch = "wasm32")]
impl VolumeSource for AnalyserVolume {
    fn sample_volume(&mut self) -> f32 {
        if self.bins.is_empty() {
            return 0.0;
        }
        self.analyser.get_byte_frequency_data(&mut self.bins);
        let sum: u32 = self.bins.iter().map(|&b| b as u32).sum();
        sum as f32 / self.bins.len() as f32
    }
}
