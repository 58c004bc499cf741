use crate::error::{ExportError, Result};
use crate::models::{zillow_url, ListingRecord};
use crate::scrapers::page::{clean_text, selector, Page};
use regex::Regex;
use scraper::{ElementRef, Selector};
use tracing::debug;

const ADDRESS: &str = "h1.prop-addr";
const PRICE: &str = "h2.prop-value-price";

/// Which fact list on the detail page a value lives in
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum FactRegion {
    Main,
    Other,
}

/// Labelled facts read from the detail page's fact lists
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Fact {
    Bedrooms,
    Bathrooms,
    YearBuilt,
    HeatingType,
    SquareFootage,
    LotSize,
    MlsNumber,
    ZillowId,
}

impl Fact {
    pub const ALL: [Fact; 8] = [
        Fact::Bedrooms,
        Fact::Bathrooms,
        Fact::YearBuilt,
        Fact::HeatingType,
        Fact::SquareFootage,
        Fact::LotSize,
        Fact::MlsNumber,
        Fact::ZillowId,
    ];

    /// Pattern matched against the list item's text
    pub fn label(self) -> &'static str {
        match self {
            Fact::Bedrooms => "Bedrooms:",
            Fact::Bathrooms => "Bathrooms",
            Fact::YearBuilt => "Year Built",
            Fact::HeatingType => "Heating Type",
            // The square footage is listed on the property type line
            Fact::SquareFootage => "Single Family",
            Fact::LotSize => "Lot",
            Fact::MlsNumber => "MLS",
            Fact::ZillowId => "Zillow",
        }
    }

    fn region(self) -> FactRegion {
        match self {
            Fact::MlsNumber | Fact::ZillowId => FactRegion::Other,
            _ => FactRegion::Main,
        }
    }
}

/// Pulls a `ListingRecord` out of a property detail page
pub struct DetailExtractor {
    canonical_host: String,
    address: Selector,
    price: Selector,
    facts: Selector,
    facts_other: Selector,
    fact_value: Selector,
    schools: Selector,
    school_rating: Selector,
    school_grades: Selector,
    labels: Vec<(Fact, Regex)>,
}

impl DetailExtractor {
    pub fn new(canonical_host: impl Into<String>) -> Result<Self> {
        let labels = Fact::ALL
            .iter()
            .map(|&fact| {
                Regex::new(fact.label())
                    .map(|re| (fact, re))
                    .map_err(|e| ExportError::Selector {
                        pattern: fact.label().to_string(),
                        reason: e.to_string(),
                    })
            })
            .collect::<Result<Vec<_>>>()?;

        Ok(Self {
            canonical_host: canonical_host.into(),
            address: selector(ADDRESS)?,
            price: selector(PRICE)?,
            facts: selector(".prop-facts li")?,
            facts_other: selector(".prop-facts-other li")?,
            fact_value: selector("span")?,
            schools: selector(".nearby-schools-list li.nearby-school")?,
            school_rating: selector(".gs-rating-number")?,
            school_grades: selector(".nearby-schools-grades")?,
            labels,
        })
    }

    /// Extract every field from a fetched detail page.
    ///
    /// Fails only when the address heading is missing; any other absent
    /// field becomes an empty string.
    pub fn extract(&self, page: &Page) -> Result<ListingRecord> {
        let document = page.document();

        let address = document
            .select(&self.address)
            .next()
            .map(|h| clean_text(h.text()))
            .ok_or_else(|| ExportError::Structural {
                url: page.url.to_string(),
                selector: ADDRESS.to_string(),
            })?;

        let price = document
            .select(&self.price)
            .next()
            .map(|h| clean_text(h.text()))
            .unwrap_or_default();

        let facts: Vec<ElementRef> = document.select(&self.facts).collect();
        let facts_other: Vec<ElementRef> = document.select(&self.facts_other).collect();

        let fact = |f: Fact| {
            let items = match f.region() {
                FactRegion::Main => &facts,
                FactRegion::Other => &facts_other,
            };
            self.find_fact(items, f)
        };

        let school_ratings = document
            .select(&self.schools)
            .map(|school| {
                let rating = clean_text(school.select(&self.school_rating).flat_map(|e| e.text()));
                let grade = clean_text(school.select(&self.school_grades).flat_map(|e| e.text()));
                format!("{}: {}", grade, rating)
            })
            .collect::<Vec<_>>()
            .join("; ");

        let zillow_id = fact(Fact::ZillowId);
        let record = ListingRecord {
            bedrooms: fact(Fact::Bedrooms),
            bathrooms: fact(Fact::Bathrooms),
            year_built: fact(Fact::YearBuilt),
            heating_type: fact(Fact::HeatingType),
            square_footage: fact(Fact::SquareFootage),
            lot_size: fact(Fact::LotSize),
            mls_number: fact(Fact::MlsNumber),
            zillow_url: zillow_url(&self.canonical_host, &zillow_id),
            zillow_id,
            address,
            price,
            school_ratings,
        };

        debug!("Extracted {} ({}), zpid {:?}", record.address, record.price, record.zillow_id);

        Ok(record)
    }

    /// Value of the first list item whose text matches the fact's label
    fn find_fact(&self, items: &[ElementRef], fact: Fact) -> String {
        let Some((_, label)) = self.labels.iter().find(|(f, _)| *f == fact) else {
            return String::new();
        };

        items
            .iter()
            .find(|item| label.is_match(&item.text().collect::<String>()))
            .map(|item| clean_text(item.select(&self.fact_value).flat_map(|s| s.text())))
            .unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use url::Url;

    const DETAIL: &str = r#"<html><body>
        <h1 class="prop-addr">
            1428 Elm St,
            Springwood, OH 44101
        </h1>
        <h2 class="prop-value-price">$412,500</h2>
        <ul class="prop-facts">
            <li>Single Family: <span>2,140 sq ft</span></li>
            <li>Bedrooms: <span>4</span></li>
            <li>Bathrooms: <span>2.5</span></li>
            <li>Lot: <span>0.25 acres</span></li>
            <li>Year Built: <span>1984</span></li>
            <li>Heating Type: <span>Forced air</span></li>
        </ul>
        <ul class="prop-facts-other">
            <li>MLS #: <span>11029384</span></li>
            <li>Zillow Home ID: <span>48749425</span></li>
        </ul>
        <ul class="nearby-schools-list">
            <li class="nearby-school">
                <span class="gs-rating-number">7</span>
                <span class="nearby-schools-grades">K-5</span>
            </li>
            <li class="nearby-school">
                <span class="gs-rating-number">9</span>
                <span class="nearby-schools-grades">9-12</span>
            </li>
        </ul>
    </body></html>"#;

    fn page(body: &str) -> Page {
        Page::new(
            Url::parse("https://www.zillow.com/homedetails/1428-Elm-St/48749425_zpid/").unwrap(),
            body,
        )
    }

    fn extractor() -> DetailExtractor {
        DetailExtractor::new("www.zillow.com").unwrap()
    }

    #[test]
    fn extracts_all_fields() {
        let record = extractor().extract(&page(DETAIL)).unwrap();

        assert_eq!(record.address, "1428 Elm St, Springwood, OH 44101");
        assert_eq!(record.price, "$412,500");
        assert_eq!(record.bedrooms, "4");
        assert_eq!(record.bathrooms, "2.5");
        assert_eq!(record.year_built, "1984");
        assert_eq!(record.heating_type, "Forced air");
        assert_eq!(record.square_footage, "2,140 sq ft");
        assert_eq!(record.lot_size, "0.25 acres");
        assert_eq!(record.mls_number, "11029384");
        assert_eq!(record.zillow_id, "48749425");
        assert_eq!(record.school_ratings, "K-5: 7; 9-12: 9");
        assert_eq!(
            record.zillow_url,
            "http://www.zillow.com/homedetails/48749425_zpid/"
        );
    }

    #[test]
    fn facts_are_read_from_their_own_region() {
        // "MLS" only appears in the main list here, so it must not be picked up
        let body = r#"<html><body>
            <h1 class="prop-addr">1 Test Rd</h1>
            <ul class="prop-facts"><li>MLS #: <span>wrong</span></li></ul>
        </body></html>"#;

        let record = extractor().extract(&page(body)).unwrap();
        assert_eq!(record.mls_number, "");
    }

    #[test]
    fn first_matching_item_wins() {
        let body = r#"<html><body>
            <h1 class="prop-addr">1 Test Rd</h1>
            <ul class="prop-facts">
                <li>Lot: <span>1 acre</span></li>
                <li>Lot depth: <span>200 ft</span></li>
            </ul>
        </body></html>"#;

        let record = extractor().extract(&page(body)).unwrap();
        assert_eq!(record.lot_size, "1 acre");
    }

    #[test]
    fn missing_facts_degrade_to_empty() {
        let body = r#"<html><body><h1 class="prop-addr">9 Bare Ln</h1></body></html>"#;

        let record = extractor().extract(&page(body)).unwrap();

        assert_eq!(record.address, "9 Bare Ln");
        for value in [
            &record.price,
            &record.bedrooms,
            &record.bathrooms,
            &record.year_built,
            &record.heating_type,
            &record.square_footage,
            &record.lot_size,
            &record.mls_number,
            &record.zillow_id,
            &record.school_ratings,
        ] {
            assert_eq!(value, "");
        }
        assert_eq!(record.zillow_url, "http://www.zillow.com/homedetails/_zpid/");
    }

    #[test]
    fn missing_address_is_structural_error() {
        let body = r#"<html><body><h2 class="prop-value-price">$1</h2></body></html>"#;

        let err = extractor().extract(&page(body)).unwrap_err();
        match err {
            ExportError::Structural { selector, url } => {
                assert_eq!(selector, ADDRESS);
                assert!(url.contains("48749425_zpid"));
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn canonical_host_is_configurable() {
        let body = r#"<html><body>
            <h1 class="prop-addr">1 Test Rd</h1>
            <ul class="prop-facts-other"><li>Zillow Home ID: <span>77</span></li></ul>
        </body></html>"#;

        let record = DetailExtractor::new("listings.test")
            .unwrap()
            .extract(&page(body))
            .unwrap();
        assert_eq!(record.zillow_url, "http://listings.test/homedetails/77_zpid/");
    }
}
