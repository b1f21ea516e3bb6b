//! Köppen climate classification from the two seasonal temperature and
//! precipitation fields.
//!
//! Seasons are resolved locally: the warmer season is that cell's summer,
//! which keeps southern-hemisphere dry-summer/dry-winter tests correct.
//! Seasonal precipitation values are treated as monthly rates; annual
//! precipitation extrapolates both across six months each.

use serde::{Deserialize, Serialize};

use crate::climate::precip::to_mm_month;
use crate::climate::temperature::to_celsius;
use crate::mesh::SphereMesh;
use crate::planet::Seasonal;

/// Köppen class per region. `Ocean` covers every cell at or below sea level.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[allow(clippy::upper_case_acronyms)]
pub enum KoppenClass {
    Ocean,
    Af,
    Am,
    Aw,
    As,
    BWh,
    BWk,
    BSh,
    BSk,
    Cfa,
    Cfb,
    Cfc,
    Cwa,
    Cwb,
    Cwc,
    Csa,
    Csb,
    Csc,
    Dfa,
    Dfb,
    Dfc,
    Dfd,
    Dwa,
    Dwb,
    Dwc,
    Dwd,
    Dsa,
    Dsb,
    Dsc,
    Dsd,
    ET,
    EF,
}

impl KoppenClass {
    pub fn code(self) -> &'static str {
        use KoppenClass::*;
        match self {
            Ocean => "Ocean",
            Af => "Af",
            Am => "Am",
            Aw => "Aw",
            As => "As",
            BWh => "BWh",
            BWk => "BWk",
            BSh => "BSh",
            BSk => "BSk",
            Cfa => "Cfa",
            Cfb => "Cfb",
            Cfc => "Cfc",
            Cwa => "Cwa",
            Cwb => "Cwb",
            Cwc => "Cwc",
            Csa => "Csa",
            Csb => "Csb",
            Csc => "Csc",
            Dfa => "Dfa",
            Dfb => "Dfb",
            Dfc => "Dfc",
            Dfd => "Dfd",
            Dwa => "Dwa",
            Dwb => "Dwb",
            Dwc => "Dwc",
            Dwd => "Dwd",
            Dsa => "Dsa",
            Dsb => "Dsb",
            Dsc => "Dsc",
            Dsd => "Dsd",
            ET => "ET",
            EF => "EF",
        }
    }
}

/// Classify every region from the normalized seasonal fields.
pub fn classify(
    mesh: &SphereMesh,
    elevation: &[f32],
    temperature: &Seasonal<Vec<f32>>,
    precipitation: &Seasonal<Vec<f32>>,
) -> Vec<KoppenClass> {
    (0..mesh.n_regions())
        .map(|r| {
            if elevation[r] <= 0.0 {
                return KoppenClass::Ocean;
            }
            let t_a = to_celsius(temperature.summer[r]);
            let t_b = to_celsius(temperature.winter[r]);
            let p_a = to_mm_month(precipitation.summer[r]);
            let p_b = to_mm_month(precipitation.winter[r]);
            // Local summer is whichever season is warmer here.
            if t_a >= t_b {
                classify_cell(t_a, t_b, p_a, p_b)
            } else {
                classify_cell(t_b, t_a, p_b, p_a)
            }
        })
        .collect()
}

/// Classify one cell. `t_hot`/`p_summer` belong to the local summer.
/// Temperatures in °C, precipitation in mm/month.
pub fn classify_cell(t_hot: f32, t_cold: f32, p_summer: f32, p_winter: f32) -> KoppenClass {
    use KoppenClass::*;

    let p_ann = (p_summer + p_winter) * 6.0; // mm/yr
    let mat = (t_hot + t_cold) / 2.0;
    let summer_frac = if p_summer + p_winter > 1e-6 {
        p_summer / (p_summer + p_winter)
    } else {
        0.5
    };

    // Aridity: standard threshold keyed to the summer share of the rain.
    let p_thresh = if summer_frac >= 0.7 {
        20.0 * mat + 280.0
    } else if summer_frac >= 0.3 {
        20.0 * mat + 140.0
    } else {
        20.0 * mat
    };
    if p_ann < p_thresh.max(0.0) && t_hot >= 10.0 {
        let hot = mat >= 18.0;
        return if p_ann < p_thresh * 0.5 {
            if hot { BWh } else { BWk }
        } else if hot {
            BSh
        } else {
            BSk
        };
    }

    if t_hot < 10.0 {
        return if t_hot < 0.0 { EF } else { ET };
    }

    let p_dry = p_summer.min(p_winter);

    if t_cold >= 18.0 {
        // Tropical: monthly dryness decides the subtype.
        if p_dry >= 60.0 {
            return Af;
        }
        if p_dry >= 100.0 - p_ann / 25.0 {
            return Am;
        }
        return if p_summer < p_winter { As } else { Aw };
    }

    let dry_summer = p_summer < 30.0 && p_summer < p_winter / 3.0;
    let dry_winter = p_winter < p_summer / 10.0;
    let t_shoulder = t_hot - (t_hot - t_cold) * 2.0 / 6.0;

    let letter = if t_hot >= 22.0 {
        b'a'
    } else if t_shoulder >= 10.0 {
        b'b'
    } else if t_cold < -38.0 {
        b'd'
    } else {
        b'c'
    };

    if t_cold > -3.0 {
        match (dry_summer, dry_winter, letter) {
            (true, _, b'a') => Csa,
            (true, _, b'b') => Csb,
            (true, _, _) => Csc,
            (false, true, b'a') => Cwa,
            (false, true, b'b') => Cwb,
            (false, true, _) => Cwc,
            (false, false, b'a') => Cfa,
            (false, false, b'b') => Cfb,
            (false, false, _) => Cfc,
        }
    } else {
        match (dry_summer, dry_winter, letter) {
            (true, _, b'a') => Dsa,
            (true, _, b'b') => Dsb,
            (true, _, b'd') => Dsd,
            (true, _, _) => Dsc,
            (false, true, b'a') => Dwa,
            (false, true, b'b') => Dwb,
            (false, true, b'd') => Dwd,
            (false, true, _) => Dwc,
            (false, false, b'a') => Dfa,
            (false, false, b'b') => Dfb,
            (false, false, b'd') => Dfd,
            (false, false, _) => Dfc,
        }
    }
}
