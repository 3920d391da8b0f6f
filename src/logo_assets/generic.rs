//! Generic category posters
//!
//! When no show-specific poster exists, a programme gets a stock image chosen
//! from its categories. The table is fixed at compile time.

/// Poster used when nothing else matches
pub const GENERIC_UNKNOWN: &str = "generic_unknown.png";

/// Lowercase category label to generic poster file name
const GENERIC_CATEGORY_TABLE: &[(&str, &str)] = &[
    // News / Info
    ("news", "generic_news.png"),
    ("newsmagazine", "generic_news.png"),
    ("weather", "generic_weather.png"),
    ("politics", "generic_news.png"),
    ("public affairs", "generic_publicaccess.png"),
    // Religion / Spiritual
    ("religious", "generic_religious.png"),
    ("religion", "generic_religious.png"),
    ("gospel", "generic_religious.png"),
    ("astrological guidance", "generic_religious.png"),
    // Infomercials / Shopping
    ("shopping", "generic_infomercial.png"),
    ("infomercial", "generic_infomercial.png"),
    ("consumer", "generic_infomercial.png"),
    ("paid programming", "generic_paidprogramming.png"),
    ("auction", "generic_infomercial.png"),
    // Community / Local
    ("community", "generic_publicaccess.png"),
    ("fundraiser", "generic_publicaccess.png"),
    ("local event", "generic_publicaccess.png"),
    ("parade", "generic_publicaccess.png"),
    ("town hall", "generic_publicaccess.png"),
    // Off-air / Unknown
    ("off air", GENERIC_UNKNOWN),
    ("tba", GENERIC_UNKNOWN),
    ("special", GENERIC_UNKNOWN),
    ("event", GENERIC_UNKNOWN),
];

/// Read-only lookup from category label to generic poster
#[derive(Debug, Clone, Copy, Default)]
pub struct GenericPosterMap;

impl GenericPosterMap {
    /// Poster for a single, already normalized, category label
    pub fn get(&self, category: &str) -> Option<&'static str> {
        GENERIC_CATEGORY_TABLE
            .iter()
            .find(|(label, _)| *label == category)
            .map(|(_, file)| *file)
    }

    /// Poster for the first category, in the given order, that has one
    pub fn match_categories<I, S>(&self, categories: I) -> Option<&'static str>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        categories
            .into_iter()
            .find_map(|category| self.get(category.as_ref()))
    }

    /// Unconditional fallback poster
    pub fn unknown(&self) -> &'static str {
        GENERIC_UNKNOWN
    }

    /// Every distinct poster file the table can produce, including the fallback
    pub fn asset_files(&self) -> Vec<&'static str> {
        let mut files: Vec<&'static str> = GENERIC_CATEGORY_TABLE
            .iter()
            .map(|(_, file)| *file)
            .chain(std::iter::once(GENERIC_UNKNOWN))
            .collect();
        files.sort_unstable();
        files.dedup();
        files
    }
}

/// Lowercase and trim a raw `<category>` label for matching
pub fn normalize_category(raw: &str) -> String {
    raw.trim().to_lowercase()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("news", Some("generic_news.png"))]
    #[case("weather", Some("generic_weather.png"))]
    #[case("parade", Some("generic_publicaccess.png"))]
    #[case("paid programming", Some("generic_paidprogramming.png"))]
    #[case("gospel", Some("generic_religious.png"))]
    #[case("tba", Some("generic_unknown.png"))]
    #[case("drama", None)]
    #[case("News", None)]
    fn test_get(#[case] category: &str, #[case] expected: Option<&str>) {
        assert_eq!(GenericPosterMap.get(category), expected);
    }

    #[test]
    fn test_first_matching_category_wins() {
        let map = GenericPosterMap;
        assert_eq!(
            map.match_categories(["news", "weather"]),
            Some("generic_news.png")
        );
        assert_eq!(
            map.match_categories(["weather", "news"]),
            Some("generic_weather.png")
        );
        assert_eq!(
            map.match_categories(["drama", "auction"]),
            Some("generic_infomercial.png")
        );
    }

    #[test]
    fn test_no_match() {
        let map = GenericPosterMap;
        assert_eq!(map.match_categories(["drama", "sitcom"]), None);
        assert_eq!(map.match_categories(Vec::<String>::new()), None);
    }

    #[test]
    fn test_normalize_category() {
        assert_eq!(normalize_category("  Paid Programming \n"), "paid programming");
        assert_eq!(
            GenericPosterMap.match_categories(
                [" NEWS ", "Weather"].iter().map(|c| normalize_category(c))
            ),
            Some("generic_news.png")
        );
    }

    #[test]
    fn test_asset_files_are_distinct() {
        let files = GenericPosterMap.asset_files();
        assert_eq!(
            files,
            vec![
                "generic_infomercial.png",
                "generic_news.png",
                "generic_paidprogramming.png",
                "generic_publicaccess.png",
                "generic_religious.png",
                "generic_unknown.png",
                "generic_weather.png",
            ]
        );
    }
}
