//! WASM bindings for comping-core
//!
//! Plain-Rust view builders live here so they can be tested natively; the
//! `#[wasm_bindgen]` wrappers only serialize them for the browser.

use crate::ear_training::{Question, QuestionGenerator};
use crate::standards;
use crate::types::chord::ChordSymbol;
use crate::types::progression::Progression;
use crate::types::voice_leading::{analyze_song, SongAnalysis};
use anyhow::Result;

#[cfg(feature = "wasm")]
use wasm_bindgen::prelude::*;

/// A progression as the front end displays it
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ProgressionView {
    pub title: String,
    pub key: String,
    pub chords: Vec<String>,
    /// Pitch set per chord, ready for playback
    pub tones: Vec<Vec<i32>>,
}

impl From<&Progression> for ProgressionView {
    fn from(prog: &Progression) -> Self {
        ProgressionView {
            title: prog.title().to_string(),
            key: prog.key().to_string(),
            chords: prog.symbols(),
            tones: prog.chord_tones(),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ChordView {
    pub symbol: String,
    pub root: String,
    pub quality: String,
    pub description: String,
    pub pitches: Vec<i32>,
    pub names: Vec<String>,
}

impl From<&ChordSymbol> for ChordView {
    fn from(chord: &ChordSymbol) -> Self {
        let quality = chord.quality();
        ChordView {
            symbol: chord.to_string(),
            root: chord.root().to_string(),
            quality: quality.identifier().to_string(),
            description: quality.description().to_string(),
            pitches: chord.tones(),
            names: chord.tone_names(),
        }
    }
}

/// Outcome wrapper so the browser can tell failures from data
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ViewResult<T> {
    pub success: bool,
    pub data: Option<T>,
    pub error: Option<String>,
}

impl<T> From<Result<T>> for ViewResult<T> {
    fn from(result: Result<T>) -> Self {
        match result {
            Ok(data) => ViewResult {
                success: true,
                data: Some(data),
                error: None,
            },
            Err(e) => ViewResult {
                success: false,
                data: None,
                error: Some(e.to_string()),
            },
        }
    }
}

pub fn standards_view() -> Result<Vec<ProgressionView>> {
    Ok(standards::progressions()?
        .iter()
        .map(ProgressionView::from)
        .collect())
}

pub fn transposed_view(title: &str, key: &str) -> Result<ProgressionView> {
    let prog = standards::find(title)?;
    let key: crate::types::note::SpelledNote = key.parse()?;
    Ok(ProgressionView::from(&prog.transpose(key)))
}

pub fn chord_view(symbol: &str) -> ChordView {
    ChordView::from(&ChordSymbol::parse(symbol))
}

pub fn song_analysis_view(title: &str) -> Result<SongAnalysis> {
    Ok(analyze_song(&standards::find_song(title)?))
}

pub fn seeded_interval_question(seed: u64) -> Question {
    QuestionGenerator::seeded(seed).interval_question()
}

pub fn seeded_chord_question(seed: u64) -> Question {
    QuestionGenerator::seeded(seed).chord_question()
}

#[cfg(feature = "wasm")]
fn to_js<T: serde::Serialize>(value: &T) -> JsValue {
    serde_wasm_bindgen::to_value(value).unwrap_or(JsValue::NULL)
}

#[cfg(feature = "wasm")]
fn seed_or_random(seed: Option<u32>) -> u64 {
    seed.map(u64::from)
        .unwrap_or_else(|| (js_sys::Math::random() * u32::MAX as f64) as u64)
}

/// Route `log` output to the browser console
#[cfg(feature = "wasm")]
#[wasm_bindgen]
pub fn init() {
    // A second call finds the logger already set; nothing to do
    let _ = console_log::init_with_level(log::Level::Debug);
}

#[cfg(feature = "wasm")]
#[wasm_bindgen]
pub fn list_standards() -> JsValue {
    to_js(&ViewResult::from(standards_view()))
}

#[cfg(feature = "wasm")]
#[wasm_bindgen]
pub fn transpose_progression(title: &str, key: &str) -> JsValue {
    to_js(&ViewResult::from(transposed_view(title, key)))
}

#[cfg(feature = "wasm")]
#[wasm_bindgen]
pub fn chord_tones_for(symbol: &str) -> JsValue {
    to_js(&chord_view(symbol))
}

#[cfg(feature = "wasm")]
#[wasm_bindgen]
pub fn analyze_standard_song(title: &str) -> JsValue {
    to_js(&ViewResult::from(song_analysis_view(title)))
}

/// Random interval question; pass a seed for a reproducible one
#[cfg(feature = "wasm")]
#[wasm_bindgen]
pub fn interval_question(seed: Option<u32>) -> JsValue {
    to_js(&seeded_interval_question(seed_or_random(seed)))
}

#[cfg(feature = "wasm")]
#[wasm_bindgen]
pub fn chord_question(seed: Option<u32>) -> JsValue {
    to_js(&seeded_chord_question(seed_or_random(seed)))
}
