//! Static list of selectable places.
//!
//! Every entry is a Nigerian state (or the Federal Capital Territory), looked
//! up by its capital and tagged with its ISO 3166-2 code.

use serde::Serialize;

/// A selectable place. Identity is the region code.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct Location {
    pub display_name: &'static str,
    pub lookup_name: &'static str,
    pub region_code: &'static str,
}

impl Location {
    pub const fn new(
        display_name: &'static str,
        lookup_name: &'static str,
        region_code: &'static str,
    ) -> Self {
        Self {
            display_name,
            lookup_name,
            region_code,
        }
    }

    pub fn same_region(&self, other: &Location) -> bool {
        self.region_code.eq_ignore_ascii_case(other.region_code)
    }
}

impl PartialEq for Location {
    fn eq(&self, other: &Self) -> bool {
        self.same_region(other)
    }
}

impl Eq for Location {}

impl std::fmt::Display for Location {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}, {}", self.lookup_name, self.display_name)
    }
}

const LOCATIONS: [Location; 37] = [
    Location::new("Abia", "Umuahia", "NG-AB"),
    Location::new("Adamawa", "Yola", "NG-AD"),
    Location::new("Akwa Ibom", "Uyo", "NG-AK"),
    Location::new("Anambra", "Awka", "NG-AN"),
    Location::new("Bauchi", "Bauchi", "NG-BA"),
    Location::new("Bayelsa", "Yenagoa", "NG-BY"),
    Location::new("Benue", "Makurdi", "NG-BE"),
    Location::new("Borno", "Maiduguri", "NG-BO"),
    Location::new("Cross River", "Calabar", "NG-CR"),
    Location::new("Delta", "Asaba", "NG-DE"),
    Location::new("Ebonyi", "Abakaliki", "NG-EB"),
    Location::new("Edo", "Benin City", "NG-ED"),
    Location::new("Ekiti", "Ado Ekiti", "NG-EK"),
    Location::new("Enugu", "Enugu", "NG-EN"),
    Location::new("Gombe", "Gombe", "NG-GO"),
    Location::new("Imo", "Owerri", "NG-IM"),
    Location::new("Jigawa", "Dutse", "NG-JI"),
    Location::new("Kaduna", "Kaduna", "NG-KD"),
    Location::new("Kano", "Kano", "NG-KN"),
    Location::new("Katsina", "Katsina", "NG-KT"),
    Location::new("Kebbi", "Birnin Kebbi", "NG-KE"),
    Location::new("Kogi", "Lokoja", "NG-KO"),
    Location::new("Kwara", "Ilorin", "NG-KW"),
    Location::new("Lagos", "Ikeja", "NG-LA"),
    Location::new("Nasarawa", "Lafia", "NG-NA"),
    Location::new("Niger", "Minna", "NG-NI"),
    Location::new("Ogun", "Abeokuta", "NG-OG"),
    Location::new("Ondo", "Akure", "NG-ON"),
    Location::new("Osun", "Oshogbo", "NG-OS"),
    Location::new("Oyo", "Ibadan", "NG-OY"),
    Location::new("Plateau", "Jos", "NG-PL"),
    Location::new("Rivers", "Port Harcourt", "NG-RI"),
    Location::new("Sokoto", "Sokoto", "NG-SO"),
    Location::new("Taraba", "Jalingo", "NG-TA"),
    Location::new("Yobe", "Damaturu", "NG-YO"),
    Location::new("Zamfara", "Gusau", "NG-ZA"),
    Location::new("Federal Capital Territory", "Abuja", "NG-FC"),
];

pub const DEFAULT_REGION: &str = "NG-LA";

pub fn all() -> &'static [Location] {
    &LOCATIONS
}

pub fn find_by_code(code: &str) -> Option<Location> {
    let code = code.trim();
    LOCATIONS
        .iter()
        .find(|loc| loc.region_code.eq_ignore_ascii_case(code))
        .copied()
}

/// Case-insensitive substring match on display name or capital.
pub fn search(term: &str) -> Vec<Location> {
    let needle = term.trim().to_lowercase();
    LOCATIONS
        .iter()
        .filter(|loc| {
            needle.is_empty()
                || loc.display_name.to_lowercase().contains(&needle)
                || loc.lookup_name.to_lowercase().contains(&needle)
        })
        .copied()
        .collect()
}

/// Resolve free text typed by a user: a region code first, then an exact
/// name or capital, then a unique substring match.
pub fn resolve(input: &str) -> Option<Location> {
    if let Some(loc) = find_by_code(input) {
        return Some(loc);
    }

    let wanted = input.trim();
    if let Some(loc) = LOCATIONS.iter().find(|loc| {
        loc.display_name.eq_ignore_ascii_case(wanted) || loc.lookup_name.eq_ignore_ascii_case(wanted)
    }) {
        return Some(*loc);
    }

    match search(wanted).as_slice() {
        [only] => Some(*only),
        _ => None,
    }
}

pub fn default_location() -> Location {
    // LOCATIONS is a fixed table that always contains Lagos.
    find_by_code(DEFAULT_REGION).unwrap_or(LOCATIONS[23])
}
