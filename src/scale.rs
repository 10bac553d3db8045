use std::fmt;
use std::str::FromStr;

use crate::view::JoinedRecord;

/// Value range shared by the map and its legend
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ColorScale {
    pub min: i64,
    pub max: i64,
}

impl ColorScale {
    /// Bounds over the given records, `None` when there are none.
    ///
    /// Pass the region-unfiltered view so a single county keeps the colours
    /// it has on the full map.
    pub fn from_records(records: &[JoinedRecord<'_>]) -> Option<Self> {
        let min = records.iter().map(|r| r.natural_increase_total).min()?;
        let max = records.iter().map(|r| r.natural_increase_total).max()?;
        Some(Self { min, max })
    }

    /// Position of `value` within the scale, clamped to [0, 1]
    pub fn normalize(&self, value: i64) -> f64 {
        if self.max == self.min {
            return 0.5;
        }
        let t = (value - self.min) as f64 / (self.max - self.min) as f64;
        t.clamp(0.0, 1.0)
    }
}

/// Named colour maps offered in the colour-scale selector
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Palette {
    #[default]
    Viridis,
    Plasma,
    Inferno,
    Magma,
    Cividis,
    Coolwarm,
}

type Rgb = (u8, u8, u8);

impl Palette {
    pub const ALL: [Palette; 6] = [
        Palette::Viridis,
        Palette::Plasma,
        Palette::Inferno,
        Palette::Magma,
        Palette::Cividis,
        Palette::Coolwarm,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Palette::Viridis => "viridis",
            Palette::Plasma => "plasma",
            Palette::Inferno => "inferno",
            Palette::Magma => "magma",
            Palette::Cividis => "cividis",
            Palette::Coolwarm => "coolwarm",
        }
    }

    // Evenly spaced samples of the matplotlib maps
    fn stops(self) -> &'static [Rgb; 5] {
        match self {
            Palette::Viridis => &[
                (68, 1, 84),
                (59, 82, 139),
                (33, 145, 140),
                (94, 201, 98),
                (253, 231, 37),
            ],
            Palette::Plasma => &[
                (13, 8, 135),
                (126, 3, 168),
                (204, 71, 120),
                (248, 149, 64),
                (240, 249, 33),
            ],
            Palette::Inferno => &[
                (0, 0, 4),
                (87, 16, 110),
                (188, 55, 84),
                (249, 142, 9),
                (252, 255, 164),
            ],
            Palette::Magma => &[
                (0, 0, 4),
                (81, 18, 124),
                (183, 55, 121),
                (252, 137, 97),
                (252, 253, 191),
            ],
            Palette::Cividis => &[
                (0, 34, 78),
                (65, 77, 108),
                (124, 123, 120),
                (187, 175, 113),
                (254, 232, 56),
            ],
            Palette::Coolwarm => &[
                (59, 76, 192),
                (141, 176, 254),
                (221, 221, 221),
                (244, 154, 123),
                (180, 4, 38),
            ],
        }
    }

    /// Interpolated colour at `t` in [0, 1]
    pub fn color_at(self, t: f64) -> Rgb {
        let stops = self.stops();
        let scaled = t.clamp(0.0, 1.0) * (stops.len() - 1) as f64;
        let lower = (scaled.floor() as usize).min(stops.len() - 2);
        let frac = scaled - lower as f64;

        let (a, b) = (stops[lower], stops[lower + 1]);
        let mix = |x: u8, y: u8| (x as f64 + (y as f64 - x as f64) * frac).round() as u8;
        (mix(a.0, b.0), mix(a.1, b.1), mix(a.2, b.2))
    }
}

impl fmt::Display for Palette {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

impl FromStr for Palette {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Palette::ALL
            .into_iter()
            .find(|p| p.name().eq_ignore_ascii_case(s))
            .ok_or_else(|| format!("unknown palette '{}'", s))
    }
}
