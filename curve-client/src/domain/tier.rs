use std::fmt;

/// The three sources a load curve can be read from, highest priority first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Tier {
    /// Pre-aggregated, already reconciled curve.
    Primary,
    /// Fine-grained curve for the general tariff period.
    SecondaryGeneral,
    /// Fine-grained curve for the peak tariff period only.
    SecondaryPeak,
}

/// Tariff type marker of peak rows in the `tg_p1` table.
pub const PEAK_CURVE_TYPE: &str = "p";

impl Tier {
    pub fn table(self) -> &'static str {
        match self {
            Tier::Primary => "tg_cchfact",
            Tier::SecondaryGeneral => "tg_f1",
            Tier::SecondaryPeak => "tg_p1",
        }
    }

    /// Extra `type` filter the tier applies on top of point and window.
    pub fn curve_type(self) -> Option<&'static str> {
        match self {
            Tier::SecondaryPeak => Some(PEAK_CURVE_TYPE),
            Tier::Primary | Tier::SecondaryGeneral => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Tier::Primary => "primary",
            Tier::SecondaryGeneral => "secondary_general",
            Tier::SecondaryPeak => "secondary_peak",
        }
    }
}

impl fmt::Display for Tier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
