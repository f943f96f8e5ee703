//! Installed-font detection by text width
//!
//! A test string is measured under each generic family, then under
//! `"<candidate>", <generic>`. If the candidate is installed the browser
//! uses it instead of the generic fallback and at least one width changes.

use super::dom;
use super::ProbeError;

/// Generic families used as measurement baselines.
pub const BASE_FONTS: [&str; 3] = ["monospace", "sans-serif", "serif"];

/// Fixed candidate list. Detected fonts are reported in this order.
pub const FONT_CANDIDATES: [&str; 12] = [
    "Arial",
    "Verdana",
    "Times New Roman",
    "Courier New",
    "Georgia",
    "Palatino",
    "Garamond",
    "Bookman",
    "Comic Sans MS",
    "Trebuchet MS",
    "Arial Black",
    "Impact",
];

pub const FONT_TEST_STRING: &str = "mmmmmmmmmmlli";
pub const FONT_TEST_SIZE: &str = "72px";

pub fn probe_fonts() -> Result<Vec<String>, ProbeError> {
    let canvas = dom::create_canvas(1, 1)?;
    let ctx = dom::context_2d(&canvas)?;

    detect_fonts(|font| {
        ctx.set_font(&format!("{} {}", FONT_TEST_SIZE, font));
        Ok(ctx.measure_text(FONT_TEST_STRING)?.width())
    })
}

/// Run the width comparison with an injected `measure(font_family_list)`.
///
/// A failing baseline measurement fails the whole probe; a failing
/// candidate measurement only marks that candidate as not detected.
pub fn detect_fonts<F>(mut measure: F) -> Result<Vec<String>, ProbeError>
where
    F: FnMut(&str) -> Result<f64, ProbeError>,
{
    let mut baselines = [0.0f64; BASE_FONTS.len()];
    for (slot, base) in baselines.iter_mut().zip(BASE_FONTS) {
        *slot = measure(base)?;
    }

    let detected = FONT_CANDIDATES
        .iter()
        .filter(|candidate| {
            BASE_FONTS.iter().zip(baselines).any(|(base, baseline)| {
                match measure(&format!("\"{}\", {}", candidate, base)) {
                    Ok(width) => width != baseline,
                    Err(_) => false,
                }
            })
        })
        .map(|candidate| candidate.to_string())
        .collect();

    Ok(detected)
}
