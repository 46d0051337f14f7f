//! Catalog of C-PAC preconfigured pipelines.

use crate::error::ValidationError;
use std::fmt;
use std::str::FromStr;

/// A named C-PAC preconfig, passed as `--preconfig NAME`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Preset {
    AbcdOptions,
    AbcdPrep,
    AnatOnly,
    BenchmarkFnirt,
    Blank,
    CcsOptions,
    #[default]
    Default,
    DefaultDeprecated,
    FmriprepOptions,
    FxOptions,
    Monkey,
    Ndmg,
    NhpMacaque,
    Preproc,
    RbcOptions,
    Rodent,
}

impl Preset {
    /// Every preconfig shipped with C-PAC, in catalog order.
    pub const ALL: [Preset; 16] = [
        Preset::AbcdOptions,
        Preset::AbcdPrep,
        Preset::AnatOnly,
        Preset::BenchmarkFnirt,
        Preset::Blank,
        Preset::CcsOptions,
        Preset::Default,
        Preset::DefaultDeprecated,
        Preset::FmriprepOptions,
        Preset::FxOptions,
        Preset::Monkey,
        Preset::Ndmg,
        Preset::NhpMacaque,
        Preset::Preproc,
        Preset::RbcOptions,
        Preset::Rodent,
    ];

    /// Name as understood by C-PAC.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::AbcdOptions => "abcd-options",
            Self::AbcdPrep => "abcd-prep",
            Self::AnatOnly => "anat-only",
            Self::BenchmarkFnirt => "benchmark-FNIRT",
            Self::Blank => "blank",
            Self::CcsOptions => "ccs-options",
            Self::Default => "default",
            Self::DefaultDeprecated => "default-deprecated",
            Self::FmriprepOptions => "fmriprep-options",
            Self::FxOptions => "fx-options",
            Self::Monkey => "monkey",
            Self::Ndmg => "ndmg",
            Self::NhpMacaque => "nhp-macaque",
            Self::Preproc => "preproc",
            Self::RbcOptions => "rbc-options",
            Self::Rodent => "rodent",
        }
    }
}

impl fmt::Display for Preset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Preset {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|preset| preset.as_str() == s)
            .ok_or_else(|| ValidationError::UnknownPreset(s.to_string()))
    }
}
