//! Source and canonical column names.

pub const STREET_ADDRESS: &str = "streetAddress";
pub const ADDRESS_LOCALITY: &str = "addressLocality";
pub const ADDRESS_REGION: &str = "addressRegion";
pub const PRICE: &str = "price";
pub const LATITUDE: &str = "latitude";
pub const LONGITUDE: &str = "longitude";

pub const SQUARE_FOOTAGE: &str = "Square Footage";
pub const PROPERTY_SQFT: &str = "property-sqft";
pub const ACREAGE: &str = "Acreage";
pub const PROPERTY_BATHS: &str = "property-baths";
pub const BATH: &str = "Bath";
pub const PROPERTY_BEDS: &str = "property-beds";
pub const VIEW: &str = "View";

pub const BEDROOMS: &str = "Bedrooms";
pub const BATHROOMS: &str = "Bathrooms";

/// Rows missing any of these never leave the structural cleaner.
pub const REQUIRED_FIELDS: [&str; 4] = [STREET_ADDRESS, ADDRESS_LOCALITY, ADDRESS_REGION, PRICE];

/// (source, canonical) pairs applied by the canonicalizer.
pub const CANONICAL_RENAMES: [(&str, &str); 5] = [
    (PRICE, "Price"),
    (ADDRESS_REGION, "Province"),
    (ADDRESS_LOCALITY, "City"),
    (LATITUDE, "Latitude"),
    (LONGITUDE, "Longitude"),
];

/// Columns every snapshot carries; anything else is passed through.
pub const CANONICAL_COLUMNS: [&str; 10] = [
    STREET_ADDRESS,
    "City",
    "Province",
    "Price",
    BEDROOMS,
    BATHROOMS,
    SQUARE_FOOTAGE,
    ACREAGE,
    "Latitude",
    "Longitude",
];
