use std::fmt;

/// Column names of the exported CSV, in output order
pub const CSV_HEADER: [&str; 11] = [
    "address",
    "bedrooms",
    "bathrooms",
    "year_built",
    "heating_type",
    "square_footage",
    "lot_size",
    "price",
    "mls_number",
    "school_ratings",
    "zillow_url",
];

/// Login credentials for the listing site
#[derive(Clone)]
pub struct Credentials {
    pub username: String,
    pub password: String,
}

impl Credentials {
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
        }
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .finish()
    }
}

/// One saved property, scraped from its detail page.
///
/// Fields that were not present on the page are empty strings.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ListingRecord {
    pub address: String,
    pub bedrooms: String,
    pub bathrooms: String,
    pub year_built: String,
    pub heating_type: String,
    pub square_footage: String,
    pub lot_size: String,
    pub price: String,
    pub mls_number: String,
    /// Zillow's internal property id ("zpid")
    pub zillow_id: String,
    pub school_ratings: String,
    pub zillow_url: String,
}

impl ListingRecord {
    /// Field values in `CSV_HEADER` order
    pub fn to_row(&self) -> [&str; 11] {
        [
            &self.address,
            &self.bedrooms,
            &self.bathrooms,
            &self.year_built,
            &self.heating_type,
            &self.square_footage,
            &self.lot_size,
            &self.price,
            &self.mls_number,
            &self.school_ratings,
            &self.zillow_url,
        ]
    }
}

/// Canonical listing URL for a Zillow property id
pub fn zillow_url(host: &str, zillow_id: &str) -> String {
    format!("http://{}/homedetails/{}_zpid/", host, zillow_id)
}
