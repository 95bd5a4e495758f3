use polars::prelude::DataFrame;
use std::fmt;

/// Canadian provinces and territories that publish a listing extract.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Region {
    Alberta,
    BritishColumbia,
    Manitoba,
    NewBrunswick,
    NewfoundlandAndLabrador,
    NovaScotia,
    NorthwestTerritories,
    Ontario,
    PrinceEdwardIsland,
    Saskatchewan,
    Yukon,
}

impl Region {
    /// Every region, in the order extracts are concatenated.
    pub const ALL: [Region; 11] = [
        Region::Alberta,
        Region::BritishColumbia,
        Region::Manitoba,
        Region::NewBrunswick,
        Region::NewfoundlandAndLabrador,
        Region::NovaScotia,
        Region::NorthwestTerritories,
        Region::Ontario,
        Region::PrinceEdwardIsland,
        Region::Saskatchewan,
        Region::Yukon,
    ];

    pub fn code(&self) -> &'static str {
        match self {
            Region::Alberta => "ab",
            Region::BritishColumbia => "bc",
            Region::Manitoba => "mb",
            Region::NewBrunswick => "nb",
            Region::NewfoundlandAndLabrador => "nl",
            Region::NovaScotia => "ns",
            Region::NorthwestTerritories => "nt",
            Region::Ontario => "on",
            Region::PrinceEdwardIsland => "pe",
            Region::Saskatchewan => "sk",
            Region::Yukon => "yt",
        }
    }

    pub fn file_name(&self) -> String {
        format!("data_{}.csv", self.code())
    }
}

impl fmt::Display for Region {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

/// One region's raw table, exactly as read from disk.
#[derive(Debug, Clone)]
pub struct RegionExtract {
    pub region: Region,
    pub frame: DataFrame,
}

impl RegionExtract {
    pub fn new(region: Region, frame: DataFrame) -> Self {
        RegionExtract { region, frame }
    }

    pub fn height(&self) -> usize {
        self.frame.height()
    }
}
