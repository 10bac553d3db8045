//! County names, codes and the canonical-name rule used as the join key.

/// Administrative-unit suffixes removed from display names.
pub const REGION_SUFFIXES: &[&str] = &[" maakond", " county"];

/// Region selector sentinel meaning "no region filter".
pub const ALL_REGIONS_LABEL: &str = "Kõik maakonnad";

/// EHAK code and canonical name of every county the dashboard requests
pub const COUNTIES: &[(&str, &str)] = &[
    ("37", "Harju"),
    ("39", "Hiiu"),
    ("44", "Ida-Viru"),
    ("49", "Jõgeva"),
    ("51", "Järva"),
    ("57", "Lääne"),
    ("59", "Lääne-Viru"),
    ("65", "Põlva"),
    ("67", "Pärnu"),
    ("70", "Rapla"),
    ("74", "Saare"),
    ("78", "Tartu"),
    ("82", "Valga"),
    ("84", "Viljandi"),
    ("86", "Võru"),
];

/// Strip the administrative-unit suffix from a region name.
///
/// Matching is literal and case-sensitive. Suffixes are removed until none
/// remains, so normalizing a canonical name returns it unchanged. Both the
/// geometry loader and the joiner go through this function.
pub fn normalize_region_name(name: &str) -> &str {
    let mut current = name;
    loop {
        let stripped = REGION_SUFFIXES
            .iter()
            .find_map(|suffix| current.strip_suffix(suffix));
        match stripped {
            Some(rest) => current = rest,
            None => return current,
        }
    }
}

/// Look up the EHAK code for a (possibly suffixed) county name
pub fn region_code_for(name: &str) -> Option<&'static str> {
    let canonical = normalize_region_name(name);
    COUNTIES
        .iter()
        .find(|(_, county)| *county == canonical)
        .map(|(code, _)| *code)
}

/// All county codes in request order
pub fn county_codes() -> impl Iterator<Item = &'static str> {
    COUNTIES.iter().map(|(code, _)| *code)
}
